//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain types. Validation and authorization stay in the
//!   domain services.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map to the port
//!   error of each repository; unique violations map to `Conflict`.
//!
//! # Example
//!
//! ```ignore
//! use bootcamp_directory::outbound::persistence::{DbPool, DieselBootcampRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bootcamps")).await?;
//! let bootcamps = DieselBootcampRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_bootcamp_repository;
mod diesel_course_repository;
mod diesel_helpers;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bootcamp_repository::DieselBootcampRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
