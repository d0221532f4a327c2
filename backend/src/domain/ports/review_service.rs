//! Driving port for reviews.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    BootcampId, Error, Principal, Review, ReviewDetail, ReviewDraft, ReviewId, ReviewInput,
    ReviewListQuery,
};

/// Driving port for review CRUD. Every write refreshes the parent's
/// `averageRating`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// One sorted page of reviews with parent summaries.
    async fn list(&self, query: ReviewListQuery) -> Result<Page<ReviewDetail>, Error>;

    /// Every review of one bootcamp.
    async fn list_for_bootcamp(&self, bootcamp: BootcampId) -> Result<Vec<Review>, Error>;

    /// A review with its parent summary.
    async fn get(&self, id: ReviewId) -> Result<ReviewDetail, Error>;

    /// Review a bootcamp; one review per author and bootcamp.
    async fn create(
        &self,
        principal: &Principal,
        bootcamp: BootcampId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Validate and apply a partial update. Ownership is checked before the
    /// input is validated.
    async fn update(
        &self,
        principal: &Principal,
        id: ReviewId,
        input: ReviewInput,
    ) -> Result<Review, Error>;

    /// Delete a review.
    async fn delete(&self, principal: &Principal, id: ReviewId) -> Result<(), Error>;
}
