//! Review orchestration with `averageRating` refresh after every write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::info;

use super::authorization::{REVIEWER_ROLES, ensure_can_mutate, ensure_role};
use super::ports::{BootcampRepository, ReviewRepository, ReviewService};
use super::repository_errors::{bootcamp_store, review_store};
use super::{
    AggregateRefresher, BootcampId, BootcampSummary, Error, Principal, Review, ReviewDetail,
    ReviewDraft, ReviewId, ReviewInput, ReviewListQuery, ReviewPatch,
};

/// Concrete implementation of [`ReviewService`].
#[derive(Clone)]
pub struct ReviewServiceImpl {
    bootcamps: Arc<dyn BootcampRepository>,
    reviews: Arc<dyn ReviewRepository>,
    aggregates: AggregateRefresher,
    clock: Arc<dyn Clock>,
}

impl ReviewServiceImpl {
    /// Create a service over the given ports.
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        reviews: Arc<dyn ReviewRepository>,
        aggregates: AggregateRefresher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bootcamps,
            reviews,
            aggregates,
            clock,
        }
    }

    async fn find(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(review_store)?
            .ok_or_else(|| not_found(id))
    }

    async fn summaries(
        &self,
        ids: &[BootcampId],
    ) -> Result<HashMap<BootcampId, BootcampSummary>, Error> {
        let summaries = self.bootcamps.summaries(ids).await.map_err(bootcamp_store)?;
        Ok(summaries
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect())
    }
}

fn not_found(id: &ReviewId) -> Error {
    Error::not_found(format!("no review found with the id of {id}"))
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    async fn list(&self, query: ReviewListQuery) -> Result<Page<ReviewDetail>, Error> {
        let page = self.reviews.list(&query).await.map_err(review_store)?;
        let mut parents: Vec<BootcampId> = page.items.iter().map(|review| review.bootcamp).collect();
        parents.sort_unstable();
        parents.dedup();
        let summaries = self.summaries(&parents).await?;
        Ok(page.map(|review| {
            let summary = summaries.get(&review.bootcamp).cloned();
            ReviewDetail::new(review, summary)
        }))
    }

    async fn list_for_bootcamp(&self, bootcamp: BootcampId) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_for_bootcamp(&bootcamp)
            .await
            .map_err(review_store)
    }

    async fn get(&self, id: ReviewId) -> Result<ReviewDetail, Error> {
        let review = self.find(&id).await?;
        let summary = self.summaries(&[review.bootcamp]).await?.remove(&review.bootcamp);
        Ok(ReviewDetail::new(review, summary))
    }

    async fn create(
        &self,
        principal: &Principal,
        bootcamp: BootcampId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        ensure_role(principal, REVIEWER_ROLES)?;
        if self
            .bootcamps
            .find_by_id(&bootcamp)
            .await
            .map_err(bootcamp_store)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "no bootcamp with the id of {bootcamp}"
            )));
        }
        let review = Review::create(
            ReviewId::random(),
            bootcamp,
            principal.id,
            draft,
            self.clock.utc(),
        );
        self.reviews.insert(&review).await.map_err(review_store)?;
        info!(review_id = %review.id, bootcamp_id = %bootcamp, "review created");
        self.aggregates.refresh_average_rating(&bootcamp).await;
        Ok(review)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: ReviewId,
        input: ReviewInput,
    ) -> Result<Review, Error> {
        ensure_role(principal, REVIEWER_ROLES)?;
        let mut review = self.find(&id).await?;
        ensure_can_mutate(&review.user, principal, "review")?;
        let patch = ReviewPatch::try_from(input)?;
        let rating_changed = patch.changes_rating();
        review.apply(patch);
        if !self.reviews.update(&review).await.map_err(review_store)? {
            return Err(not_found(&id));
        }
        if rating_changed {
            self.aggregates.refresh_average_rating(&review.bootcamp).await;
        }
        Ok(review)
    }

    async fn delete(&self, principal: &Principal, id: ReviewId) -> Result<(), Error> {
        ensure_role(principal, REVIEWER_ROLES)?;
        let review = self.find(&id).await?;
        ensure_can_mutate(&review.user, principal, "review")?;
        if !self.reviews.delete(&id).await.map_err(review_store)? {
            return Err(not_found(&id));
        }
        info!(review_id = %id, bootcamp_id = %review.bootcamp, "review deleted");
        self.aggregates.refresh_average_rating(&review.bootcamp).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
