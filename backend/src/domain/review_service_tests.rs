//! Tests for the review service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureGeocoder, MockBootcampRepository, MockCourseRepository, MockReviewRepository,
    ReviewRepositoryError,
};
use crate::domain::{
    Bootcamp, BootcampDraft, Career, ErrorCode, GeoPoint, Rating, Role, UserId,
};
use crate::test_support::{MutableClock, fixture_timestamp};

fn parent() -> Bootcamp {
    let draft = BootcampDraft {
        name: "ModernTech Bootcamp".to_owned(),
        description: "Mobile first".to_owned(),
        website: None,
        phone: None,
        email: None,
        address: "Boston".to_owned(),
        careers: vec![Career::MobileDevelopment],
        housing: false,
        job_assistance: false,
        job_guarantee: false,
        accept_gi: false,
    };
    let location = FixtureGeocoder::location_at(
        GeoPoint::new(-71.0589, 42.3601).expect("valid point"),
        "Boston",
        "02118",
    );
    Bootcamp::create(
        BootcampId::random(),
        UserId::random(),
        draft,
        location,
        fixture_timestamp(),
    )
}

fn rating(raw: i64) -> Rating {
    Rating::new(raw).expect("valid rating")
}

fn draft(score: i64) -> ReviewDraft {
    ReviewDraft {
        title: "Learned a ton".to_owned(),
        text: "Great instructors".to_owned(),
        rating: rating(score),
    }
}

fn reviewer() -> Principal {
    Principal {
        id: UserId::random(),
        role: Role::User,
    }
}

struct Ports {
    bootcamps: MockBootcampRepository,
    reviews: MockReviewRepository,
    aggregate_bootcamps: MockBootcampRepository,
    aggregate_reviews: MockReviewRepository,
}

impl Ports {
    fn into_service(self) -> ReviewServiceImpl {
        let refresher = AggregateRefresher::new(
            Arc::new(self.aggregate_bootcamps),
            Arc::new(MockCourseRepository::new()),
            Arc::new(self.aggregate_reviews),
        );
        ReviewServiceImpl::new(
            Arc::new(self.bootcamps),
            Arc::new(self.reviews),
            refresher,
            Arc::new(MutableClock::at_fixture()),
        )
    }

    fn expect_refresh(&mut self, bootcamp: BootcampId, ratings: Vec<Rating>, expected: Option<f64>) {
        self.aggregate_reviews
            .expect_ratings_for_bootcamp()
            .with(eq(bootcamp))
            .times(1)
            .return_once(move |_| Ok(ratings));
        self.aggregate_bootcamps
            .expect_set_average_rating()
            .with(eq(bootcamp), eq(expected))
            .times(1)
            .return_once(|_, _| Ok(true));
    }
}

#[fixture]
fn ports() -> Ports {
    Ports {
        bootcamps: MockBootcampRepository::new(),
        reviews: MockReviewRepository::new(),
        aggregate_bootcamps: MockBootcampRepository::new(),
        aggregate_reviews: MockReviewRepository::new(),
    }
}

#[rstest]
#[tokio::test]
async fn create_refreshes_exact_mean(mut ports: Ports) {
    let bootcamp = parent();
    let id = bootcamp.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(bootcamp)));
    ports.reviews.expect_insert().times(1).return_once(|_| Ok(()));
    ports.expect_refresh(id, vec![rating(7), rating(8)], Some(7.5));

    let author = reviewer();
    let review = ports
        .into_service()
        .create(&author, id, draft(8))
        .await
        .expect("create succeeds");
    assert_eq!(review.user, author.id);
    assert_eq!(review.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn second_review_by_same_author_conflicts(mut ports: Ports) {
    let bootcamp = parent();
    let id = bootcamp.id;
    ports
        .bootcamps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(bootcamp)));
    ports
        .reviews
        .expect_insert()
        .return_once(|_| Err(ReviewRepositoryError::conflict("duplicate")));
    ports.aggregate_reviews.expect_ratings_for_bootcamp().never();

    let error = ports
        .into_service()
        .create(&reviewer(), id, draft(5))
        .await
        .expect_err("duplicate review");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn publishers_cannot_review(mut ports: Ports) {
    ports.bootcamps.expect_find_by_id().never();

    let error = ports
        .into_service()
        .create(
            &Principal {
                id: UserId::random(),
                role: Role::Publisher,
            },
            BootcampId::random(),
            draft(5),
        )
        .await
        .expect_err("role gate");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn rating_update_refreshes_mean(mut ports: Ports) {
    let author = reviewer();
    let bootcamp = BootcampId::random();
    let existing = Review::create(ReviewId::random(), bootcamp, author.id, draft(4), fixture_timestamp());
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .with(eq(id))
        .return_once(move |_| Ok(Some(existing)));
    ports.reviews.expect_update().return_once(|_| Ok(true));
    ports.expect_refresh(bootcamp, vec![rating(10)], Some(10.0));

    let input = ReviewInput {
        rating: Some(10),
        ..ReviewInput::default()
    };
    let updated = ports
        .into_service()
        .update(&author, id, input)
        .await
        .expect("update succeeds");
    assert_eq!(updated.rating.value(), 10);
}

#[rstest]
#[tokio::test]
async fn title_update_skips_refresh(mut ports: Ports) {
    let author = reviewer();
    let existing = Review::create(
        ReviewId::random(),
        BootcampId::random(),
        author.id,
        draft(4),
        fixture_timestamp(),
    );
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports.reviews.expect_update().return_once(|_| Ok(true));
    ports.aggregate_reviews.expect_ratings_for_bootcamp().never();

    let input = ReviewInput {
        title: Some("Updated".to_owned()),
        ..ReviewInput::default()
    };
    ports
        .into_service()
        .update(&author, id, input)
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn other_users_cannot_edit_even_with_a_bad_rating(mut ports: Ports) {
    let existing = Review::create(
        ReviewId::random(),
        BootcampId::random(),
        UserId::random(),
        draft(4),
        fixture_timestamp(),
    );
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports.reviews.expect_update().never();

    let error = ports
        .into_service()
        .update(
            &reviewer(),
            id,
            ReviewInput {
                rating: Some(42),
                ..ReviewInput::default()
            },
        )
        .await
        .expect_err("ownership gate");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn other_users_cannot_delete(mut ports: Ports) {
    let existing = Review::create(
        ReviewId::random(),
        BootcampId::random(),
        UserId::random(),
        draft(4),
        fixture_timestamp(),
    );
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports.reviews.expect_delete().never();

    let error = ports
        .into_service()
        .delete(&reviewer(), id)
        .await
        .expect_err("ownership gate");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_refreshes_and_resets_when_empty(mut ports: Ports) {
    let author = reviewer();
    let bootcamp = BootcampId::random();
    let existing = Review::create(ReviewId::random(), bootcamp, author.id, draft(9), fixture_timestamp());
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports.reviews.expect_delete().return_once(|_| Ok(true));
    ports.expect_refresh(bootcamp, Vec::new(), None);

    ports
        .into_service()
        .delete(&author, id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn get_embeds_parent_summary(mut ports: Ports) {
    let bootcamp = parent();
    let summary = bootcamp.summary();
    let existing = Review::create(
        ReviewId::random(),
        bootcamp.id,
        UserId::random(),
        draft(6),
        fixture_timestamp(),
    );
    let id = existing.id;
    ports
        .reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    ports
        .bootcamps
        .expect_summaries()
        .return_once(move |_| Ok(vec![summary]));

    let detail = ports.into_service().get(id).await.expect("found");
    assert_eq!(
        detail.bootcamp.map(|summary| summary.name),
        Some("ModernTech Bootcamp".to_owned())
    );
}
