//! Port for signing and verifying bearer tokens.

use crate::domain::{AuthToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token issuer adapters.
    pub enum TokenIssuerError {
        /// Signing failed.
        Signing { message: String } =>
            "token signing failed: {message}",
        /// The token is malformed, tampered with or expired.
        Invalid { message: String } =>
            "token rejected: {message}",
    }
}

/// Port for stateless session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token whose subject is `user`.
    fn issue(&self, user: &UserId) -> Result<AuthToken, TokenIssuerError>;

    /// Verify `token` and return its subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError>;
}
