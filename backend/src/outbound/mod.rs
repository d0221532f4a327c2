//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used when no database is configured
//! - **geocoder**: HTTP geocoding provider
//! - **mailer**: HTTP mail relay and a log-only fallback
//! - **photo_store**: upload directory accessed through `cap_std`
//! - **token_issuer** / **credential_hasher**: JWT signing and Argon2 digests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod credential_hasher;
pub mod geocoder;
pub mod mailer;
pub mod memory;
pub mod persistence;
pub mod photo_store;
pub mod token_issuer;
