//! Driving port for account administration.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    EmailAddress, Error, Password, Principal, Role, User, UserId, UserListQuery, UserName,
};

/// Account created by an administrator. Any role may be assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
}

/// Administrative partial update of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
}

/// Driving port for admin-only account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminService: Send + Sync {
    /// One sorted page of accounts.
    async fn list(&self, principal: &Principal, query: UserListQuery) -> Result<Page<User>, Error>;

    /// A single account.
    async fn get(&self, principal: &Principal, id: UserId) -> Result<User, Error>;

    /// Create an account.
    async fn create(&self, principal: &Principal, account: NewAccount) -> Result<User, Error>;

    /// Change name, email or role.
    async fn update(
        &self,
        principal: &Principal,
        id: UserId,
        update: UserUpdate,
    ) -> Result<User, Error>;

    /// Delete an account.
    async fn delete(&self, principal: &Principal, id: UserId) -> Result<(), Error>;
}
