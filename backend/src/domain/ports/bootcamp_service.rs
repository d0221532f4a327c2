//! Driving port for bootcamp listings.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    Bootcamp, BootcampDetail, BootcampDraft, BootcampId, BootcampInput, BootcampListQuery, Error,
    Principal,
};

/// Raw photo upload as received by the inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Declared MIME type; must be `image/*`.
    pub content_type: String,
    /// Client-side file name, used only for its extension.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Driving port for bootcamp CRUD, radius search and photo upload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BootcampService: Send + Sync {
    /// One filtered, sorted page of bootcamps, each with its courses.
    async fn list(&self, query: BootcampListQuery) -> Result<Page<BootcampDetail>, Error>;

    /// A bootcamp with its courses embedded.
    async fn get(&self, id: BootcampId) -> Result<BootcampDetail, Error>;

    /// Bootcamps within `distance_miles` of the zipcode's location.
    async fn within_radius(&self, zipcode: &str, distance_miles: f64) -> Result<Vec<Bootcamp>, Error>;

    /// Create a bootcamp owned by the principal.
    async fn create(&self, principal: &Principal, draft: BootcampDraft) -> Result<Bootcamp, Error>;

    /// Validate and apply a partial update. Ownership is checked before the
    /// input is validated.
    async fn update(
        &self,
        principal: &Principal,
        id: BootcampId,
        input: BootcampInput,
    ) -> Result<Bootcamp, Error>;

    /// Delete a bootcamp and its children.
    async fn delete(&self, principal: &Principal, id: BootcampId) -> Result<(), Error>;

    /// Store a photo and return its file name.
    async fn upload_photo(
        &self,
        principal: &Principal,
        id: BootcampId,
        upload: PhotoUpload,
    ) -> Result<String, Error>;
}
