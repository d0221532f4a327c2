//! Argon2id password hashing.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash as EncodedHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// `CredentialHasher` producing PHC-encoded Argon2id digests.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher with the crate's default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| PasswordHash::new(digest.to_string()))
            .map_err(|error| CredentialHasherError::hash(error.to_string()))
    }

    fn verify(&self, password: &str, digest: &PasswordHash) -> Result<bool, CredentialHasherError> {
        let parsed = EncodedHash::new(digest.as_str())
            .map_err(|error| CredentialHasherError::malformed_digest(error.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(CredentialHasherError::hash(error.to_string())),
        }
    }
}
