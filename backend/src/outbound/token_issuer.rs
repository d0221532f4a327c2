//! HS256 JSON Web Token issuer.
//!
//! Expiry is checked against the injected clock rather than the system
//! clock so token lifetimes are testable.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::{AuthToken, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Issuer whose tokens live for `lifetime_days`.
    pub fn new(secret: &[u8], lifetime_days: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::days(i64::from(lifetime_days)),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &UserId) -> Result<AuthToken, TokenIssuerError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AuthToken::new)
            .map_err(|error| TokenIssuerError::signing(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|error| TokenIssuerError::invalid(error.to_string()))?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenIssuerError::invalid("token expired"));
        }
        UserId::new(&data.claims.sub).map_err(|error| TokenIssuerError::invalid(error.to_string()))
    }
}
