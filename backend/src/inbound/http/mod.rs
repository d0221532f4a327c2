//! HTTP inbound adapter exposing the REST API.

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod envelope;
pub mod error;
pub mod health;
pub mod list_params;
pub mod reviews;
pub mod routes;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
