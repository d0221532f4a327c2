//! Tests for the bootcamp service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureGeocoder, MockBootcampRepository, MockCourseRepository, MockGeocoder, MockPhotoStore,
};
use crate::domain::{
    Career, CourseDraft, CourseId, ErrorCode, GeoPoint, Location, MinimumSkill, Role, UserId,
};
use crate::test_support::{MutableClock, fixture_timestamp};

const MAX_PHOTO: usize = 1_000;

fn boston() -> Location {
    FixtureGeocoder::location_at(
        GeoPoint::new(-71.0589, 42.3601).expect("valid point"),
        "Boston",
        "02118",
    )
}

fn draft(name: &str) -> BootcampDraft {
    BootcampDraft {
        name: name.to_owned(),
        description: "Full stack web development".to_owned(),
        website: None,
        phone: None,
        email: None,
        address: "233 Bay State Rd Boston MA 02215".to_owned(),
        careers: vec![Career::WebDevelopment],
        housing: false,
        job_assistance: true,
        job_guarantee: false,
        accept_gi: true,
    }
}

fn stored(owner: UserId) -> Bootcamp {
    Bootcamp::create(
        BootcampId::random(),
        owner,
        draft("Devworks Bootcamp"),
        boston(),
        fixture_timestamp(),
    )
}

fn principal(role: Role) -> Principal {
    Principal {
        id: UserId::random(),
        role,
    }
}

struct Ports {
    bootcamps: MockBootcampRepository,
    courses: MockCourseRepository,
    geocoder: Arc<dyn Geocoder>,
    photos: MockPhotoStore,
}

impl Ports {
    fn into_service(self) -> BootcampServiceImpl {
        BootcampServiceImpl::new(
            Arc::new(self.bootcamps),
            Arc::new(self.courses),
            self.geocoder,
            Arc::new(self.photos),
            Arc::new(MutableClock::at_fixture()),
            MAX_PHOTO,
        )
    }
}

#[fixture]
fn ports() -> Ports {
    Ports {
        bootcamps: MockBootcampRepository::new(),
        courses: MockCourseRepository::new(),
        geocoder: Arc::new(FixtureGeocoder::new().with_fallback(boston())),
        photos: MockPhotoStore::new(),
    }
}

#[rstest]
#[tokio::test]
async fn create_geocodes_address_and_stamps_owner(mut ports: Ports) {
    let publisher = principal(Role::Publisher);
    ports
        .bootcamps
        .expect_find_by_owner()
        .with(eq(publisher.id))
        .times(1)
        .return_once(|_| Ok(None));
    ports
        .bootcamps
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(()));

    let created = ports
        .into_service()
        .create(&publisher, draft("Devworks Bootcamp"))
        .await
        .expect("create succeeds");

    assert_eq!(created.user, publisher.id);
    assert_eq!(created.slug, "devworks-bootcamp");
    assert_eq!(created.location.city, "Boston");
    assert_eq!(created.created_at, fixture_timestamp());
    assert_eq!(created.average_cost, None);
}

#[rstest]
#[tokio::test]
async fn second_bootcamp_for_publisher_conflicts(mut ports: Ports) {
    let publisher = principal(Role::Publisher);
    let existing = stored(publisher.id);
    ports
        .bootcamps
        .expect_find_by_owner()
        .return_once(move |_| Ok(Some(existing)));
    ports.bootcamps.expect_insert().never();

    let error = ports
        .into_service()
        .create(&publisher, draft("Second Camp"))
        .await
        .expect_err("second bootcamp rejected");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn admin_may_publish_several_bootcamps(mut ports: Ports) {
    ports.bootcamps.expect_find_by_owner().never();
    ports.bootcamps.expect_insert().times(1).return_once(|_| Ok(()));

    ports
        .into_service()
        .create(&principal(Role::Admin), draft("Another Camp"))
        .await
        .expect("admin create succeeds");
}

#[rstest]
#[tokio::test]
async fn plain_users_cannot_publish(mut ports: Ports) {
    ports.bootcamps.expect_find_by_owner().never();

    let error = ports
        .into_service()
        .create(&principal(Role::User), draft("Nope"))
        .await
        .expect_err("role gate");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn unknown_address_is_a_validation_error(mut ports: Ports) {
    ports.geocoder = Arc::new(FixtureGeocoder::new());
    ports.bootcamps.expect_find_by_owner().return_once(|_| Ok(None));
    ports.bootcamps.expect_insert().never();

    let error = ports
        .into_service()
        .create(&principal(Role::Publisher), draft("Lost Camp"))
        .await
        .expect_err("no geocoding match");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn non_owner_update_is_forbidden_whatever_the_payload(mut ports: Ports) {
    let existing = stored(UserId::random());
    let id = existing.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(existing)));
    ports.bootcamps.expect_update().never();

    let input = BootcampInput {
        name: Some("   ".to_owned()),
        website: Some("not a url".to_owned()),
        ..BootcampInput::default()
    };
    let error = ports
        .into_service()
        .update(&principal(Role::Publisher), id, input)
        .await
        .expect_err("ownership gate");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn missing_bootcamp_is_reported_before_ownership(mut ports: Ports) {
    ports.bootcamps.expect_find_by_id().return_once(|_| Ok(None));

    let error = ports
        .into_service()
        .delete(&principal(Role::Publisher), BootcampId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_rederives_slug_and_regeocodes(mut ports: Ports) {
    let owner = principal(Role::Publisher);
    let existing = stored(owner.id);
    let id = existing.id;
    let denver = FixtureGeocoder::location_at(
        GeoPoint::new(-104.9903, 39.7392).expect("valid point"),
        "Denver",
        "80202",
    );
    let mut geocoder = MockGeocoder::new();
    let resolved = denver.clone();
    geocoder
        .expect_geocode()
        .withf(|query| query == "1 Main St Denver")
        .times(1)
        .return_once(move |_| Ok(resolved));
    ports.geocoder = Arc::new(geocoder);
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports
        .bootcamps
        .expect_update()
        .withf(|bootcamp| bootcamp.slug == "mile-high-code" && bootcamp.location.city == "Denver")
        .times(1)
        .return_once(|_| Ok(true));

    let input = BootcampInput {
        name: Some("Mile High Code".to_owned()),
        address: Some("1 Main St Denver".to_owned()),
        ..BootcampInput::default()
    };
    let updated = ports
        .into_service()
        .update(&owner, id, input)
        .await
        .expect("owner update succeeds");
    assert_eq!(updated.location, denver);
}

#[rstest]
#[tokio::test]
async fn admin_deletes_foreign_bootcamp(mut ports: Ports) {
    let existing = stored(UserId::random());
    let id = existing.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports
        .bootcamps
        .expect_delete()
        .with(eq(id))
        .times(1)
        .return_once(|_| Ok(true));

    ports
        .into_service()
        .delete(&principal(Role::Admin), id)
        .await
        .expect("admin delete succeeds");
}

#[rstest]
#[tokio::test]
async fn get_embeds_courses(mut ports: Ports) {
    let existing = stored(UserId::random());
    let id = existing.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports
        .courses
        .expect_list_for_bootcamp()
        .with(eq(id))
        .return_once(|_| Ok(Vec::new()));

    let detail = ports.into_service().get(id).await.expect("found");
    assert_eq!(detail.bootcamp.id, id);
    assert!(detail.courses.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_embeds_each_bootcamps_courses(mut ports: Ports) {
    let with_course = stored(UserId::random());
    let without = stored(UserId::random());
    let ids = vec![with_course.id, without.id];
    let course = Course::create(
        CourseId::random(),
        with_course.id,
        with_course.user,
        CourseDraft {
            title: "Front End Web Development".to_owned(),
            description: "HTML, CSS and JavaScript".to_owned(),
            weeks: "8".to_owned(),
            tuition: 8000,
            minimum_skill: MinimumSkill::Beginner,
            scholarship_available: false,
        },
        fixture_timestamp(),
    );
    let listed = vec![with_course.clone(), without.clone()];
    ports.bootcamps.expect_list().return_once(move |query| {
        Ok(Page {
            items: listed,
            total: 2,
            request: query.page,
        })
    });
    ports
        .courses
        .expect_list_for_bootcamps()
        .withf(move |requested| requested == ids.as_slice())
        .times(1)
        .return_once(move |_| Ok(vec![course]));

    let page = ports
        .into_service()
        .list(BootcampListQuery::default())
        .await
        .expect("listing");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].bootcamp.id, with_course.id);
    assert_eq!(page.items[0].courses.len(), 1);
    assert_eq!(page.items[1].bootcamp.id, without.id);
    assert!(page.items[1].courses.is_empty());
}

#[rstest]
#[tokio::test]
async fn radius_search_builds_cap_around_zipcode(mut ports: Ports) {
    ports
        .bootcamps
        .expect_within()
        .withf(|cap| {
            (cap.center().lat() - 42.3601).abs() < 1e-9
                && (cap.radius() - 10.0 / crate::domain::EARTH_RADIUS_MILES).abs() < 1e-12
        })
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let found = ports
        .into_service()
        .within_radius("02118", 10.0)
        .await
        .expect("radius query");
    assert!(found.is_empty());
}

#[rstest]
#[case(0.0)]
#[case(-3.0)]
#[case(f64::NAN)]
#[tokio::test]
async fn radius_search_rejects_bad_distance(mut ports: Ports, #[case] distance: f64) {
    ports.bootcamps.expect_within().never();

    let error = ports
        .into_service()
        .within_radius("02118", distance)
        .await
        .expect_err("bad distance");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

fn upload(content_type: &str, file_name: Option<&str>, size: usize) -> PhotoUpload {
    PhotoUpload {
        content_type: content_type.to_owned(),
        file_name: file_name.map(str::to_owned),
        bytes: vec![7; size],
    }
}

#[rstest]
#[case(upload("image/png", None, 10), "png")]
#[case(upload("image/jpeg", Some("me.JPG"), 10), "jpg")]
#[case(upload("image/webp; q=1", None, 10), "webp")]
#[tokio::test]
async fn photo_name_uses_bootcamp_id_and_extension(
    mut ports: Ports,
    #[case] photo: PhotoUpload,
    #[case] ext: &str,
) {
    let owner = principal(Role::Publisher);
    let existing = stored(owner.id);
    let id = existing.id;
    let expected = format!("photo_{id}.{ext}");
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    let stored_name = expected.clone();
    ports
        .photos
        .expect_store()
        .withf(move |name, bytes| name == stored_name && bytes.len() == 10)
        .times(1)
        .return_once(|_, _| Ok(()));
    let recorded_name = expected.clone();
    ports
        .bootcamps
        .expect_set_photo()
        .withf(move |_, name| name == recorded_name)
        .times(1)
        .return_once(|_, _| Ok(true));

    let name = ports
        .into_service()
        .upload_photo(&owner, id, photo)
        .await
        .expect("upload succeeds");
    assert_eq!(name, expected);
}

#[rstest]
#[case(upload("text/plain", None, 10), ErrorCode::InvalidRequest)]
#[case(upload("image/png", None, 0), ErrorCode::InvalidRequest)]
#[case(upload("image/png", None, MAX_PHOTO + 1), ErrorCode::PayloadTooLarge)]
#[tokio::test]
async fn photo_upload_rejects_bad_files(
    mut ports: Ports,
    #[case] photo: PhotoUpload,
    #[case] expected: ErrorCode,
) {
    let owner = principal(Role::Publisher);
    let existing = stored(owner.id);
    let id = existing.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports.photos.expect_store().never();

    let error = ports
        .into_service()
        .upload_photo(&owner, id, photo)
        .await
        .expect_err("rejected upload");
    assert_eq!(error.code(), expected);
}
