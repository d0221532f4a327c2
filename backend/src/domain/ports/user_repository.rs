//! Port for account persistence, including credentials and reset tickets.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::Page;

use crate::domain::{User, UserAccount, UserId, UserListQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The email address is already registered.
        Conflict { message: String } =>
            "user repository conflict: {message}",
    }
}

/// Port for reading and writing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; `Conflict` when the email is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Overwrite profile, credentials and reset ticket of an existing account.
    async fn update(&self, account: &UserAccount) -> Result<bool, UserRepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Find an account by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Find the account holding a reset ticket with `token_hash` that is
    /// still live at `now`.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// One sorted page of public account views.
    async fn list(&self, query: &UserListQuery) -> Result<Page<User>, UserRepositoryError>;

    /// Delete an account; `false` when it did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
