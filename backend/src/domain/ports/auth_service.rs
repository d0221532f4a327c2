//! Driving port for registration, login and credential management.
//!
//! Inbound adapters call this port to obtain tokens and resolve principals
//! without knowing how passwords are hashed or tokens are signed.

use async_trait::async_trait;

use crate::domain::{
    AuthToken, EmailAddress, Error, LoginCredentials, Password, Principal, Registration, User,
    UserName,
};

/// Account plus the token issued for it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: AuthToken,
}

/// Profile fields a caller may change on their own account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
}

/// Password-reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    /// Address of the account to reset.
    pub email: String,
    /// Absolute URL prefix; the raw token is appended to it.
    pub reset_url_base: String,
}

/// Driving port for authentication flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and sign the account in.
    ///
    /// Unknown email and wrong password fail identically.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Resolve a bearer token to the current principal.
    async fn authenticate(&self, token: &str) -> Result<Principal, Error>;

    /// Public view of the caller's account.
    async fn current_user(&self, principal: &Principal) -> Result<User, Error>;

    /// Change the caller's name and/or email.
    async fn update_details(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> Result<User, Error>;

    /// Change the caller's password after re-checking the current one.
    async fn update_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: Password,
    ) -> Result<AuthSession, Error>;

    /// Issue a reset ticket and email the reset link.
    async fn forgot_password(&self, request: ResetRequest) -> Result<(), Error>;

    /// Redeem a reset token, set the new password and sign in.
    async fn reset_password(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<AuthSession, Error>;
}
