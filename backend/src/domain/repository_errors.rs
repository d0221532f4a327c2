//! Translation of driven-port failures into API errors.
//!
//! Connection failures mean the store is unavailable; anything else that
//! escapes a query is reported as an upstream failure. Uniqueness conflicts
//! keep their message so callers learn which value clashed.

use super::Error;
use super::ports::{
    BootcampRepositoryError, CourseRepositoryError, GeocoderError, PhotoStoreError,
    ReviewRepositoryError, UserRepositoryError,
};

pub(crate) fn bootcamp_store(error: BootcampRepositoryError) -> Error {
    match error {
        BootcampRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bootcamp store unavailable: {message}"))
        }
        BootcampRepositoryError::Query { message } => {
            Error::upstream_failure(format!("bootcamp store error: {message}"))
        }
        BootcampRepositoryError::Conflict { message } => Error::conflict(message),
    }
}

pub(crate) fn course_store(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("course store unavailable: {message}"))
        }
        CourseRepositoryError::Query { message } => {
            Error::upstream_failure(format!("course store error: {message}"))
        }
    }
}

pub(crate) fn review_store(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::upstream_failure(format!("review store error: {message}"))
        }
        ReviewRepositoryError::Conflict { .. } => {
            Error::conflict("user has already submitted a review for this bootcamp")
        }
    }
}

pub(crate) fn user_store(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::upstream_failure(format!("user store error: {message}"))
        }
        UserRepositoryError::Conflict { .. } => Error::conflict("email is already registered"),
    }
}

/// A query the geocoder cannot place is the caller's fault; transport and
/// decode failures are not.
pub(crate) fn geocoder(field: &'static str, error: GeocoderError) -> Error {
    match error {
        GeocoderError::NoMatch { query } => {
            Error::invalid_request(format!("no location found for {query}"))
                .with_details(serde_json::json!({ "field": field, "code": "invalid" }))
        }
        GeocoderError::Transport { message } | GeocoderError::Decode { message } => {
            Error::upstream_failure(format!("geocoding failed: {message}"))
        }
    }
}

pub(crate) fn photo_store(error: PhotoStoreError) -> Error {
    match error {
        PhotoStoreError::Io { message } => {
            Error::upstream_failure(format!("problem with file upload: {message}"))
        }
        PhotoStoreError::InvalidName { name } => {
            Error::invalid_request(format!("file name {name} is not allowed"))
        }
    }
}
