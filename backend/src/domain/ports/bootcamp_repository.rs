//! Port for bootcamp persistence, aggregate write-back and radius search.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Bootcamp, BootcampId, BootcampListQuery, BootcampSummary, SphericalCap, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bootcamp repository adapters.
    pub enum BootcampRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "bootcamp repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bootcamp repository query failed: {message}",
        /// A uniqueness constraint (bootcamp name) was violated.
        Conflict { message: String } =>
            "bootcamp repository conflict: {message}",
    }
}

/// Port for reading and writing bootcamps.
///
/// Mutations that address a single row return `false` when the row does not
/// exist so callers can distinguish "missing" from failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BootcampRepository: Send + Sync {
    /// Insert a new bootcamp.
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), BootcampRepositoryError>;

    /// Persist editable fields. Aggregates and photo are left untouched.
    async fn update(&self, bootcamp: &Bootcamp) -> Result<bool, BootcampRepositoryError>;

    /// Find a bootcamp by id.
    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, BootcampRepositoryError>;

    /// Find any bootcamp owned by `owner`.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, BootcampRepositoryError>;

    /// Summaries for the given ids; unknown ids are skipped.
    async fn summaries(
        &self,
        ids: &[BootcampId],
    ) -> Result<Vec<BootcampSummary>, BootcampRepositoryError>;

    /// One filtered, sorted page of bootcamps.
    async fn list(&self, query: &BootcampListQuery) -> Result<Page<Bootcamp>, BootcampRepositoryError>;

    /// Every bootcamp whose location lies inside `cap`.
    async fn within(&self, cap: &SphericalCap) -> Result<Vec<Bootcamp>, BootcampRepositoryError>;

    /// Delete a bootcamp together with its courses and reviews.
    async fn delete(&self, id: &BootcampId) -> Result<bool, BootcampRepositoryError>;

    /// Write the derived `averageCost`.
    async fn set_average_cost(
        &self,
        id: &BootcampId,
        average_cost: Option<u32>,
    ) -> Result<bool, BootcampRepositoryError>;

    /// Write the derived `averageRating`.
    async fn set_average_rating(
        &self,
        id: &BootcampId,
        average_rating: Option<f64>,
    ) -> Result<bool, BootcampRepositoryError>;

    /// Record the stored photo file name.
    async fn set_photo(&self, id: &BootcampId, photo: &str) -> Result<bool, BootcampRepositoryError>;
}
