//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, geocoder, mailer, photo store, token issuer,
//! credential hasher) are implemented by outbound adapters. Driving ports
//! (`*Service`) are implemented by domain services and consumed by the HTTP
//! adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod bootcamp_repository;
mod bootcamp_service;
mod course_repository;
mod course_service;
mod credential_hasher;
mod geocoder;
mod mailer;
mod photo_store;
mod review_repository;
mod review_service;
mod token_issuer;
mod user_admin_service;
mod user_repository;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, AuthSession, ProfileUpdate, ResetRequest};
#[cfg(test)]
pub use bootcamp_repository::MockBootcampRepository;
pub use bootcamp_repository::{BootcampRepository, BootcampRepositoryError};
#[cfg(test)]
pub use bootcamp_service::MockBootcampService;
pub use bootcamp_service::{BootcampService, PhotoUpload};
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CourseRepository, CourseRepositoryError};
#[cfg(test)]
pub use course_service::MockCourseService;
pub use course_service::CourseService;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, Geocoder, GeocoderError};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{FixtureMailer, Mailer, MailerError, OutgoingEmail};
#[cfg(test)]
pub use photo_store::MockPhotoStore;
pub use photo_store::{PhotoStore, PhotoStoreError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use review_service::MockReviewService;
pub use review_service::ReviewService;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenIssuer, TokenIssuerError};
#[cfg(test)]
pub use user_admin_service::MockUserAdminService;
pub use user_admin_service::{NewAccount, UserAdminService, UserUpdate};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
