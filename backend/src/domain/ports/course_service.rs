//! Driving port for courses.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    BootcampId, Course, CourseDetail, CourseDraft, CourseId, CourseInput, CourseListQuery, Error,
    Principal,
};

/// Driving port for course CRUD. Every write refreshes the parent's
/// `averageCost`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseService: Send + Sync {
    /// One filtered, sorted page of courses with parent summaries.
    async fn list(&self, query: CourseListQuery) -> Result<Page<CourseDetail>, Error>;

    /// Every course of one bootcamp.
    async fn list_for_bootcamp(&self, bootcamp: BootcampId) -> Result<Vec<Course>, Error>;

    /// A course with its parent summary.
    async fn get(&self, id: CourseId) -> Result<CourseDetail, Error>;

    /// Add a course to a bootcamp the principal owns.
    async fn create(
        &self,
        principal: &Principal,
        bootcamp: BootcampId,
        draft: CourseDraft,
    ) -> Result<Course, Error>;

    /// Validate and apply a partial update. Ownership is checked before the
    /// input is validated.
    async fn update(
        &self,
        principal: &Principal,
        id: CourseId,
        input: CourseInput,
    ) -> Result<Course, Error>;

    /// Delete a course.
    async fn delete(&self, principal: &Principal, id: CourseId) -> Result<(), Error>;
}
