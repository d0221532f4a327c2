//! Authentication primitives: credentials, passwords, principals and tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Role, UserId, UserName, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Email was missing or blank once trimmed.
    #[error("please provide an email and password")]
    EmptyEmail,
    /// Password was blank.
    #[error("please provide an email and password")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// Self-registration cannot grant the admin role.
    #[error("the admin role cannot be self-assigned")]
    AdminNotAllowed,
    /// Name, email or role failed account validation.
    #[error(transparent)]
    Account(#[from] UserValidationError),
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved.
///
/// # Examples
/// ```
/// use bootcamp_directory::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// New password satisfying the minimum length rule.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a candidate password.
    pub fn new(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plain-text value handed to the hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
}

impl Registration {
    /// Validate raw registration inputs. The role defaults to [`Role::User`].
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        let role = match role {
            Some(raw) => raw.parse::<Role>()?,
            None => Role::User,
        };
        if role == Role::Admin {
            return Err(AuthValidationError::AdminNotAllowed);
        }
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
            role,
        })
    }
}

/// Authenticated caller as seen by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    /// Whether the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Signed bearer token issued after authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

impl From<AuthToken> for String {
    fn from(value: AuthToken) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", AuthValidationError::EmptyEmail)]
    #[case("   ", "pw", AuthValidationError::EmptyEmail)]
    #[case("ada@example.com", "", AuthValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_trim_email() {
        let creds = LoginCredentials::try_from_parts("  ada@example.com ", " secret ")
            .expect("valid inputs");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password(), " secret ");
    }

    #[rstest]
    fn short_passwords_are_rejected() {
        let err = Password::new("12345").expect_err("too short");
        assert_eq!(err, AuthValidationError::PasswordTooShort { min: 6 });
    }

    #[rstest]
    #[case(None, Role::User)]
    #[case(Some("user"), Role::User)]
    #[case(Some("publisher"), Role::Publisher)]
    fn registration_assigns_role(#[case] role: Option<&str>, #[case] expected: Role) {
        let registration =
            Registration::try_from_parts("Ada", "ada@example.com", "123456", role)
                .expect("valid registration");
        assert_eq!(registration.role, expected);
    }

    #[rstest]
    fn registration_refuses_admin() {
        let err = Registration::try_from_parts("Ada", "ada@example.com", "123456", Some("admin"))
            .expect_err("admin is not self-assignable");
        assert_eq!(err, AuthValidationError::AdminNotAllowed);
    }

    #[rstest]
    fn registration_rejects_unknown_role() {
        let err = Registration::try_from_parts("Ada", "ada@example.com", "123456", Some("root"))
            .expect_err("unknown role");
        assert_eq!(
            err,
            AuthValidationError::Account(UserValidationError::UnknownRole)
        );
    }
}
