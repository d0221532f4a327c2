//! Password-reset tokens.
//!
//! The raw token is mailed to the account holder; only its SHA-256 digest is
//! stored so a leaked row cannot be redeemed.

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random bytes in a raw token.
pub const RESET_TOKEN_BYTES: usize = 20;

/// Fresh raw token: [`RESET_TOKEN_BYTES`] random bytes, hex encoded.
pub fn generate() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0_u8; RESET_TOKEN_BYTES]);
    rand::thread_rng().fill_bytes(bytes.as_mut());
    Zeroizing::new(hex::encode(bytes.as_ref()))
}

/// Lowercase hex SHA-256 digest of a raw token.
///
/// # Examples
/// ```
/// use bootcamp_directory::domain::reset_token::digest;
///
/// assert_eq!(digest("abc").len(), 64);
/// assert_eq!(digest("abc"), digest("abc"));
/// ```
pub fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_tokens_are_hex_and_distinct() {
        let first = generate();
        let second = generate();
        assert_eq!(first.len(), RESET_TOKEN_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(*first, *second);
    }

    #[rstest]
    fn digest_matches_known_vector() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
