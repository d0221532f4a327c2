//! Port for course persistence.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{BootcampId, Course, CourseId, CourseListQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "course repository query failed: {message}",
    }
}

/// Port for reading and writing courses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course.
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Persist editable fields; `false` when the course no longer exists.
    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError>;

    /// Find a course by id.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// One filtered, sorted page of courses across all bootcamps.
    async fn list(&self, query: &CourseListQuery) -> Result<Page<Course>, CourseRepositoryError>;

    /// Every course of `bootcamp`, oldest first.
    async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Every course of any of `bootcamps`, oldest first.
    async fn list_for_bootcamps(
        &self,
        bootcamps: &[BootcampId],
    ) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Tuition of every course of `bootcamp`.
    async fn tuitions_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<u32>, CourseRepositoryError>;

    /// Delete a course; `false` when it did not exist.
    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError>;
}
