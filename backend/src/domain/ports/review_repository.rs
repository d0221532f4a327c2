//! Port for review persistence.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{BootcampId, Rating, Review, ReviewId, ReviewListQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
        /// The author already reviewed this bootcamp.
        Conflict { message: String } =>
            "review repository conflict: {message}",
    }
}

/// Port for reading and writing reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review, failing with `Conflict` on a second review of the
    /// same bootcamp by the same author.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Persist editable fields; `false` when the review no longer exists.
    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError>;

    /// Find a review by id.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// One sorted page of reviews across all bootcamps.
    async fn list(&self, query: &ReviewListQuery) -> Result<Page<Review>, ReviewRepositoryError>;

    /// Every review of `bootcamp`, oldest first.
    async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Rating of every review of `bootcamp`.
    async fn ratings_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Rating>, ReviewRepositoryError>;

    /// Delete a review; `false` when it did not exist.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError>;
}
