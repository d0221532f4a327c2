//! Derived bootcamp aggregates: `averageCost` and `averageRating`.
//!
//! Services call the refresher after every child write, keyed on the parent
//! the child belonged to at the time. Refreshing is best effort: failures are
//! logged and never fail the triggering operation.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::{BootcampRepository, CourseRepository, ReviewRepository};
use super::{BootcampId, Rating};

/// Mean tuition rounded up to the next multiple of ten.
///
/// Returns `None` for an empty set.
///
/// # Examples
/// ```
/// use bootcamp_directory::domain::average_cost;
///
/// assert_eq!(average_cost(&[100, 200]), Some(150));
/// assert_eq!(average_cost(&[101]), Some(110));
/// assert_eq!(average_cost(&[]), None);
/// ```
pub fn average_cost(tuitions: &[u32]) -> Option<u32> {
    if tuitions.is_empty() {
        return None;
    }
    let total: u64 = tuitions.iter().map(|&tuition| u64::from(tuition)).sum();
    let count = tuitions.len() as u64;
    // ceil(total / count / 10) * 10 computed in integers.
    let tens = total.div_ceil(count * 10);
    u32::try_from(tens * 10).ok()
}

/// Exact mean rating, or `None` for an empty set.
pub fn average_rating(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: u32 = ratings.iter().map(|rating| u32::from(rating.value())).sum();
    Some(f64::from(total) / ratings.len() as f64)
}

/// Recomputes aggregates and writes them back onto the parent bootcamp.
#[derive(Clone)]
pub struct AggregateRefresher {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl AggregateRefresher {
    /// Create a refresher over the three repositories.
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        courses: Arc<dyn CourseRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            bootcamps,
            courses,
            reviews,
        }
    }

    /// Recompute `averageCost` for `bootcamp`.
    pub async fn refresh_average_cost(&self, bootcamp: &BootcampId) {
        let tuitions = match self.courses.tuitions_for_bootcamp(bootcamp).await {
            Ok(tuitions) => tuitions,
            Err(error) => {
                warn!(bootcamp_id = %bootcamp, %error, "failed to load tuitions for average cost");
                return;
            }
        };
        let value = average_cost(&tuitions);
        match self.bootcamps.set_average_cost(bootcamp, value).await {
            Ok(true) => debug!(bootcamp_id = %bootcamp, ?value, "average cost refreshed"),
            Ok(false) => warn!(bootcamp_id = %bootcamp, "average cost target bootcamp missing"),
            Err(error) => warn!(bootcamp_id = %bootcamp, %error, "failed to store average cost"),
        }
    }

    /// Recompute `averageRating` for `bootcamp`.
    pub async fn refresh_average_rating(&self, bootcamp: &BootcampId) {
        let ratings = match self.reviews.ratings_for_bootcamp(bootcamp).await {
            Ok(ratings) => ratings,
            Err(error) => {
                warn!(bootcamp_id = %bootcamp, %error, "failed to load ratings for average rating");
                return;
            }
        };
        let value = average_rating(&ratings);
        match self.bootcamps.set_average_rating(bootcamp, value).await {
            Ok(true) => debug!(bootcamp_id = %bootcamp, ?value, "average rating refreshed"),
            Ok(false) => warn!(bootcamp_id = %bootcamp, "average rating target bootcamp missing"),
            Err(error) => warn!(bootcamp_id = %bootcamp, %error, "failed to store average rating"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        BootcampRepositoryError, CourseRepositoryError, MockBootcampRepository,
        MockCourseRepository, MockReviewRepository,
    };
    use mockall::predicate::eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[100, 200], Some(150))]
    #[case(&[100], Some(100))]
    #[case(&[101, 102], Some(110))]
    #[case(&[0], Some(0))]
    #[case(&[10_000, 12_000, 8_001], Some(10_010))]
    #[case(&[], None)]
    fn cost_rounds_up_to_tens(#[case] tuitions: &[u32], #[case] expected: Option<u32>) {
        assert_eq!(average_cost(tuitions), expected);
    }

    #[rstest]
    fn largest_tuitions_average_within_an_integer_column() {
        let cost = average_cost(&[crate::domain::MAX_TUITION, crate::domain::MAX_TUITION - 1])
            .expect("non-empty");
        assert_eq!(cost, 2_147_483_640);
        assert!(i32::try_from(cost).is_ok());
    }

    #[rstest]
    fn rating_is_exact_mean() {
        let ratings: Vec<Rating> = [7, 8, 10]
            .into_iter()
            .map(|raw| Rating::new(raw).expect("valid rating"))
            .collect();
        let mean = average_rating(&ratings).expect("non-empty");
        assert!((mean - 25.0 / 3.0).abs() < 1e-12);
        assert_eq!(average_rating(&[]), None);
    }

    fn refresher(
        bootcamps: MockBootcampRepository,
        courses: MockCourseRepository,
        reviews: MockReviewRepository,
    ) -> AggregateRefresher {
        AggregateRefresher::new(Arc::new(bootcamps), Arc::new(courses), Arc::new(reviews))
    }

    #[rstest]
    #[tokio::test]
    async fn writes_rounded_cost_back() {
        let id = BootcampId::random();
        let mut courses = MockCourseRepository::new();
        courses
            .expect_tuitions_for_bootcamp()
            .with(eq(id))
            .times(1)
            .return_once(|_| Ok(vec![100, 200]));
        let mut bootcamps = MockBootcampRepository::new();
        bootcamps
            .expect_set_average_cost()
            .with(eq(id), eq(Some(150)))
            .times(1)
            .return_once(|_, _| Ok(true));

        refresher(bootcamps, courses, MockReviewRepository::new())
            .refresh_average_cost(&id)
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn empty_child_set_resets_to_null() {
        let id = BootcampId::random();
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_ratings_for_bootcamp()
            .return_once(|_| Ok(Vec::new()));
        let mut bootcamps = MockBootcampRepository::new();
        bootcamps
            .expect_set_average_rating()
            .with(eq(id), eq(None))
            .times(1)
            .return_once(|_, _| Ok(true));

        refresher(bootcamps, MockCourseRepository::new(), reviews)
            .refresh_average_rating(&id)
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_failure_skips_write() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_tuitions_for_bootcamp()
            .return_once(|_| Err(CourseRepositoryError::connection("down")));
        let mut bootcamps = MockBootcampRepository::new();
        bootcamps.expect_set_average_cost().never();

        refresher(bootcamps, courses, MockReviewRepository::new())
            .refresh_average_cost(&BootcampId::random())
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn write_failure_is_swallowed() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_tuitions_for_bootcamp()
            .return_once(|_| Ok(vec![500]));
        let mut bootcamps = MockBootcampRepository::new();
        bootcamps
            .expect_set_average_cost()
            .return_once(|_, _| Err(BootcampRepositoryError::query("boom")));

        refresher(bootcamps, courses, MockReviewRepository::new())
            .refresh_average_cost(&BootcampId::random())
            .await;
    }
}
