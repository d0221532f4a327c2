//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use bootcamp_directory::outbound::persistence::DbPool;
use bootcamp_directory::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) settings: AppSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration listening on `bind_addr` with in-memory storage.
    #[must_use]
    pub fn new(settings: AppSettings, bind_addr: SocketAddr) -> Self {
        Self {
            settings,
            bind_addr,
            db_pool: None,
        }
    }

    /// Store records in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
