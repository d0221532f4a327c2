//! Registration, login, token resolution and password management.
//!
//! Passwords never leave this module in clear text: they are handed to the
//! credential hasher and dropped. Reset tokens are stored as digests only.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{info, warn};

use super::ports::{
    AuthService, AuthSession, CredentialHasher, CredentialHasherError, Mailer, OutgoingEmail,
    ProfileUpdate, ResetRequest, TokenIssuer, TokenIssuerError, UserRepository,
};
use super::repository_errors::user_store;
use super::{
    Error, LoginCredentials, Password, Principal, Registration, ResetTicket, User, UserAccount,
    UserId, reset_token,
};

/// Minutes a password-reset token stays redeemable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

const RESET_SUBJECT: &str = "Password reset token";

/// Concrete implementation of [`AuthService`].
#[derive(Clone)]
pub struct AuthServiceImpl {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl AuthServiceImpl {
    /// Create a service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            mailer,
            clock,
        }
    }

    async fn account(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(user_store)?
            .ok_or_else(|| Error::not_found(format!("no user with the id of {id}")))
    }

    async fn save(&self, account: &UserAccount) -> Result<(), Error> {
        if self.users.update(account).await.map_err(user_store)? {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "no user with the id of {}",
                account.user.id
            )))
        }
    }

    fn session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id).map_err(map_token_error)?;
        Ok(AuthSession { user, token })
    }

    fn check_password(&self, account: &UserAccount, candidate: &str) -> Result<bool, Error> {
        self.hasher
            .verify(candidate, &account.password_hash)
            .map_err(map_hasher_error)
    }
}

fn map_token_error(error: TokenIssuerError) -> Error {
    match error {
        TokenIssuerError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
        TokenIssuerError::Invalid { .. } => Error::unauthorized("not authorized to access this route"),
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

fn reset_body(url: &str) -> String {
    format!(
        "You are receiving this email because you (or someone else) has requested the reset \
         of a password. Please make a PUT request to: \n\n {url}"
    )
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            name,
            email,
            password,
            role,
        } = registration;
        let password_hash = self
            .hasher
            .hash(password.expose())
            .map_err(map_hasher_error)?;
        let account = UserAccount {
            user: User {
                id: UserId::random(),
                name,
                email,
                role,
                created_at: self.clock.utc(),
            },
            password_hash,
            reset: None,
        };
        self.users.insert(&account).await.map_err(user_store)?;
        info!(user_id = %account.user.id, role = %account.user.role, "account registered");
        self.session(account.user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(user_store)?
            .ok_or_else(Error::invalid_credentials)?;
        if !self.check_password(&account, credentials.password())? {
            return Err(Error::invalid_credentials());
        }
        self.session(account.user)
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, Error> {
        let id = self.tokens.verify(token).map_err(map_token_error)?;
        let account = self
            .users
            .find_by_id(&id)
            .await
            .map_err(user_store)?
            .ok_or_else(|| Error::unauthorized("not authorized to access this route"))?;
        Ok(Principal {
            id,
            role: account.user.role,
        })
    }

    async fn current_user(&self, principal: &Principal) -> Result<User, Error> {
        Ok(self.account(&principal.id).await?.user)
    }

    async fn update_details(
        &self,
        principal: &Principal,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        let mut account = self.account(&principal.id).await?;
        if let Some(name) = update.name {
            account.user.name = name;
        }
        if let Some(email) = update.email {
            account.user.email = email;
        }
        self.save(&account).await?;
        Ok(account.user)
    }

    async fn update_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: Password,
    ) -> Result<AuthSession, Error> {
        let mut account = self.account(&principal.id).await?;
        if !self.check_password(&account, current_password)? {
            return Err(Error::invalid_credentials());
        }
        account.password_hash = self
            .hasher
            .hash(new_password.expose())
            .map_err(map_hasher_error)?;
        self.save(&account).await?;
        info!(user_id = %principal.id, "password changed");
        self.session(account.user)
    }

    async fn forgot_password(&self, request: ResetRequest) -> Result<(), Error> {
        let mut account = self
            .users
            .find_by_email(request.email.trim())
            .await
            .map_err(user_store)?
            .ok_or_else(|| Error::not_found("there is no user with that email"))?;
        let raw = reset_token::generate();
        account.reset = Some(ResetTicket {
            token_hash: reset_token::digest(&raw),
            expires_at: self.clock.utc() + TimeDelta::minutes(RESET_TOKEN_TTL_MINUTES),
        });
        self.save(&account).await?;

        let url = format!("{}/{}", request.reset_url_base.trim_end_matches('/'), *raw);
        let email = OutgoingEmail {
            to: account.user.email.to_string(),
            subject: RESET_SUBJECT.to_owned(),
            text: reset_body(&url),
        };
        if let Err(error) = self.mailer.send(&email).await {
            warn!(user_id = %account.user.id, %error, "reset email failed; clearing ticket");
            account.reset = None;
            self.save(&account).await?;
            return Err(Error::upstream_failure("email could not be sent"));
        }
        info!(user_id = %account.user.id, "reset email sent");
        Ok(())
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: Password,
    ) -> Result<AuthSession, Error> {
        let mut account = self
            .users
            .find_by_reset_token(&reset_token::digest(token), self.clock.utc())
            .await
            .map_err(user_store)?
            .ok_or_else(|| Error::invalid_request("invalid token"))?;
        account.password_hash = self
            .hasher
            .hash(new_password.expose())
            .map_err(map_hasher_error)?;
        account.reset = None;
        self.save(&account).await?;
        info!(user_id = %account.user.id, "password reset");
        self.session(account.user)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
