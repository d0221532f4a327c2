//! Port for password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hasher adapters.
    pub enum CredentialHasherError {
        /// Hashing failed.
        Hash { message: String } =>
            "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } =>
            "stored password digest is malformed: {message}",
    }
}

/// Port for salted password digests.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError>;

    /// Check `password` against a stored digest.
    fn verify(&self, password: &str, digest: &PasswordHash) -> Result<bool, CredentialHasherError>;
}
