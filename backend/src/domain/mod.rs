//! Domain primitives, services and ports.
//!
//! Purpose: define the bootcamp directory's entities, the rules that govern
//! them and the services that orchestrate them over driven ports. Nothing in
//! here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Bootcamp, Course, Review, User: stored entities and their wire shapes.
//! - `*ServiceImpl`: driving port implementations used by the HTTP adapter.

pub mod aggregates;
pub mod auth;
pub mod authorization;
mod auth_service;
pub mod bootcamp;
mod bootcamp_service;
pub mod course;
mod course_service;
pub mod error;
pub mod geo;
pub mod ids;
pub mod listing;
pub mod ports;
mod repository_errors;
pub mod reset_token;
pub mod review;
mod review_service;
pub mod slug;
pub mod trace_id;
pub mod user;
mod user_admin_service;
pub mod validation;

pub use self::aggregates::{AggregateRefresher, average_cost, average_rating};
pub use self::auth::{
    AuthToken, AuthValidationError, LoginCredentials, PASSWORD_MIN_LEN, Password, Principal,
    Registration,
};
pub use self::auth_service::{AuthServiceImpl, RESET_TOKEN_TTL_MINUTES};
pub use self::bootcamp::{
    Bootcamp, BootcampDetail, BootcampDraft, BootcampInput, BootcampPatch, BootcampSummary,
    Career, DEFAULT_PHOTO,
};
pub use self::bootcamp_service::BootcampServiceImpl;
pub use self::course::{
    Course, CourseDetail, CourseDraft, CourseInput, CoursePatch, MAX_TUITION, MinimumSkill,
};
pub use self::course_service::CourseServiceImpl;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{
    EARTH_RADIUS_MILES, GeoPoint, GeoValidationError, Location, LocationDto, SphericalCap,
};
pub use self::ids::{BootcampId, CourseId, InvalidId, ReviewId, UserId};
pub use self::listing::{
    BootcampFilter, BootcampListQuery, BootcampSortField, CourseFilter, CourseListQuery,
    CourseSortField, ListQuery, ReviewListQuery, ReviewSortField, SortDirection, SortField,
    SortKey, UserListQuery, UserSortField, order_by, parse_sort,
};
pub use self::review::{Rating, Review, ReviewDetail, ReviewDraft, ReviewInput, ReviewPatch};
pub use self::review_service::ReviewServiceImpl;
pub use self::slug::slugify;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PasswordHash, ResetTicket, Role, User, UserAccount, UserName,
    UserValidationError,
};
pub use self::user_admin_service::UserAdminServiceImpl;
pub use self::validation::FieldError;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bootcamp_directory::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
