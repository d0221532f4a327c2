//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{AuthValidationError, Error, InvalidId, UserValidationError};

/// Parse a path identifier. Malformed ids are reported as missing
/// resources, matching what a lookup of an unknown id returns.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = InvalidId>,
{
    raw.parse()
        .map_err(|_| Error::not_found(format!("Resource not found with id of {raw}")))
}

fn field_for_account(error: &UserValidationError) -> &'static str {
    match error {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::InvalidEmail => "email",
        UserValidationError::UnknownRole => "role",
    }
}

/// Map account field errors to a 400 naming the field.
pub(crate) fn account_error(error: UserValidationError) -> Error {
    let field = field_for_account(&error);
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Map credential payload errors to a 400 naming the field.
pub(crate) fn auth_error(error: AuthValidationError) -> Error {
    let field = match &error {
        AuthValidationError::EmptyEmail => "email",
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordTooShort { .. } => {
            "password"
        }
        AuthValidationError::AdminNotAllowed => "role",
        AuthValidationError::Account(inner) => field_for_account(inner),
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}
