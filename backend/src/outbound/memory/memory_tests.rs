//! Behaviour of the in-memory repositories.

use super::*;
use crate::domain::ports::FixtureGeocoder;
use crate::domain::{
    BootcampDraft, BootcampFilter, Career, CourseDraft, GeoPoint, MinimumSkill, ReviewDraft,
    parse_sort,
};
use crate::test_support::fixture_timestamp;
use chrono::Duration;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::new()
}

fn bootcamp(name: &str, lng: f64, lat: f64, age_minutes: i64) -> Bootcamp {
    let point = GeoPoint::new(lng, lat).expect("valid point");
    Bootcamp::create(
        BootcampId::random(),
        UserId::random(),
        BootcampDraft {
            name: name.into(),
            description: "desc".into(),
            website: None,
            phone: None,
            email: None,
            address: "somewhere".into(),
            careers: vec![Career::WebDevelopment],
            housing: false,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
        },
        FixtureGeocoder::location_at(point, "Boston", "02215"),
        fixture_timestamp() - Duration::minutes(age_minutes),
    )
}

fn course(parent: &Bootcamp, tuition: u32) -> Course {
    Course::create(
        CourseId::random(),
        parent.id,
        parent.user,
        CourseDraft {
            title: format!("course {tuition}"),
            description: "d".into(),
            weeks: "8".into(),
            tuition,
            minimum_skill: MinimumSkill::Beginner,
            scholarship_available: false,
        },
        fixture_timestamp(),
    )
}

fn review(parent: &Bootcamp, author: UserId, rating: i64) -> Review {
    Review::create(
        ReviewId::random(),
        parent.id,
        author,
        ReviewDraft {
            title: "Great".into(),
            text: "Learned a lot".into(),
            rating: Rating::new(rating).expect("valid rating"),
        },
        fixture_timestamp(),
    )
}

#[rstest]
#[tokio::test]
async fn duplicate_bootcamp_names_conflict(store: MemoryStore) {
    BootcampRepository::insert(&store, &bootcamp("Devworks", 0.0, 0.0, 0))
        .await
        .expect("first insert");
    let err = BootcampRepository::insert(&store, &bootcamp("Devworks", 1.0, 1.0, 0))
        .await
        .expect_err("duplicate name");
    assert!(matches!(err, BootcampRepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn update_preserves_aggregates_and_photo(store: MemoryStore) {
    let mut stored = bootcamp("Devworks", 0.0, 0.0, 0);
    BootcampRepository::insert(&store, &stored).await.expect("insert");
    store
        .set_average_cost(&stored.id, Some(150))
        .await
        .expect("cost");
    store.set_photo(&stored.id, "photo_x.jpg").await.expect("photo");

    stored.description = "updated".into();
    assert!(BootcampRepository::update(&store, &stored).await.expect("update"));

    let found = BootcampRepository::find_by_id(&store, &stored.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.description, "updated");
    assert_eq!(found.average_cost, Some(150));
    assert_eq!(found.photo, "photo_x.jpg");
}

#[rstest]
#[tokio::test]
async fn deleting_a_bootcamp_cascades(store: MemoryStore) {
    let parent = bootcamp("Devworks", 0.0, 0.0, 0);
    BootcampRepository::insert(&store, &parent).await.expect("insert");
    CourseRepository::insert(&store, &course(&parent, 100))
        .await
        .expect("course");
    ReviewRepository::insert(&store, &review(&parent, UserId::random(), 7))
        .await
        .expect("review");

    assert!(BootcampRepository::delete(&store, &parent.id).await.expect("delete"));
    assert!(store.tuitions_for_bootcamp(&parent.id).await.expect("tuitions").is_empty());
    assert!(store.ratings_for_bootcamp(&parent.id).await.expect("ratings").is_empty());
}

#[rstest]
#[tokio::test]
async fn one_review_per_author_and_bootcamp(store: MemoryStore) {
    let parent = bootcamp("Devworks", 0.0, 0.0, 0);
    BootcampRepository::insert(&store, &parent).await.expect("insert");
    let author = UserId::random();
    ReviewRepository::insert(&store, &review(&parent, author, 8))
        .await
        .expect("first review");
    let err = ReviewRepository::insert(&store, &review(&parent, author, 3))
        .await
        .expect_err("second review");
    assert!(matches!(err, ReviewRepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn children_require_an_existing_parent(store: MemoryStore) {
    let orphan = bootcamp("Ghost", 0.0, 0.0, 0);
    let err = CourseRepository::insert(&store, &course(&orphan, 100))
        .await
        .expect_err("missing parent");
    assert!(matches!(err, CourseRepositoryError::Query { .. }));
}

#[rstest]
#[tokio::test]
async fn list_filters_sorts_and_pages(store: MemoryStore) {
    for (index, name) in ["Alpha", "Bravo", "Charlie"].into_iter().enumerate() {
        let age = i64::try_from(index).expect("small index");
        BootcampRepository::insert(&store, &bootcamp(name, 0.0, 0.0, age))
            .await
            .expect("insert");
    }
    let query = BootcampListQuery {
        page: PageRequest::new(1, 2).expect("valid window"),
        sort: parse_sort(Some("name")).expect("valid sort"),
        filter: BootcampFilter::default(),
    };

    let page = BootcampRepository::list(&store, &query).await.expect("list");
    let names: Vec<_> = page.items.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
    assert_eq!(page.total, 3);
    assert!(page.links().next.is_some());
}

#[rstest]
#[tokio::test]
async fn within_returns_only_bootcamps_inside_the_cap(store: MemoryStore) {
    let boston = bootcamp("Boston", -71.0589, 42.3601, 0);
    let cambridge = bootcamp("Cambridge", -71.1097, 42.3736, 0);
    let new_york = bootcamp("New York", -74.0060, 40.7128, 0);
    for camp in [&boston, &cambridge, &new_york] {
        BootcampRepository::insert(&store, camp).await.expect("insert");
    }
    let cap = SphericalCap::from_miles(boston.location.point, 10.0).expect("valid cap");

    let found = store.within(&cap).await.expect("within");
    let mut names: Vec<_> = found.iter().map(|b| b.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Boston", "Cambridge"]);
}

#[rstest]
#[tokio::test]
async fn reset_tokens_must_be_live(store: MemoryStore) {
    use crate::domain::{EmailAddress, PasswordHash, ResetTicket, Role, UserName};

    let account = UserAccount {
        user: User {
            id: UserId::random(),
            name: UserName::new("Ada").expect("valid name"),
            email: EmailAddress::new("ada@example.com").expect("valid email"),
            role: Role::User,
            created_at: fixture_timestamp(),
        },
        password_hash: PasswordHash::new("digest"),
        reset: Some(ResetTicket {
            token_hash: "abc".into(),
            expires_at: fixture_timestamp() + Duration::minutes(10),
        }),
    };
    UserRepository::insert(&store, &account).await.expect("insert");

    let live = store
        .find_by_reset_token("abc", fixture_timestamp())
        .await
        .expect("lookup");
    assert!(live.is_some());
    let expired = store
        .find_by_reset_token("abc", fixture_timestamp() + Duration::minutes(11))
        .await
        .expect("lookup");
    assert!(expired.is_none());
}
