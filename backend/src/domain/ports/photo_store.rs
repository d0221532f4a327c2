//! Port for persisting uploaded bootcamp photos.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo store adapters.
    pub enum PhotoStoreError {
        /// The file could not be written.
        Io { message: String } =>
            "photo store write failed: {message}",
        /// The requested file name is not a plain file name.
        InvalidName { name: String } =>
            "photo file name {name} is not allowed",
    }
}

/// Port for the photo sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Write `bytes` under `file_name`, replacing any previous file.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<(), PhotoStoreError>;
}
