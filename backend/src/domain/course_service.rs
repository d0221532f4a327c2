//! Course orchestration with `averageCost` refresh after every write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::info;

use super::authorization::{PUBLISHER_ROLES, ensure_can_mutate, ensure_role};
use super::ports::{BootcampRepository, CourseRepository, CourseService};
use super::repository_errors::{bootcamp_store, course_store};
use super::{
    AggregateRefresher, BootcampId, BootcampSummary, Course, CourseDetail, CourseDraft, CourseId,
    CourseInput, CourseListQuery, CoursePatch, Error, Principal,
};

/// Concrete implementation of [`CourseService`].
#[derive(Clone)]
pub struct CourseServiceImpl {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    aggregates: AggregateRefresher,
    clock: Arc<dyn Clock>,
}

impl CourseServiceImpl {
    /// Create a service over the given ports.
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        courses: Arc<dyn CourseRepository>,
        aggregates: AggregateRefresher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bootcamps,
            courses,
            aggregates,
            clock,
        }
    }

    async fn find(&self, id: &CourseId) -> Result<Course, Error> {
        self.courses
            .find_by_id(id)
            .await
            .map_err(course_store)?
            .ok_or_else(|| not_found(id))
    }

    async fn summaries(
        &self,
        ids: &[BootcampId],
    ) -> Result<HashMap<BootcampId, BootcampSummary>, Error> {
        let summaries = self.bootcamps.summaries(ids).await.map_err(bootcamp_store)?;
        Ok(summaries
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect())
    }
}

fn not_found(id: &CourseId) -> Error {
    Error::not_found(format!("no course with the id of {id}"))
}

#[async_trait]
impl CourseService for CourseServiceImpl {
    async fn list(&self, query: CourseListQuery) -> Result<Page<CourseDetail>, Error> {
        let page = self.courses.list(&query).await.map_err(course_store)?;
        let mut parents: Vec<BootcampId> = page.items.iter().map(|course| course.bootcamp).collect();
        parents.sort_unstable();
        parents.dedup();
        let summaries = self.summaries(&parents).await?;
        Ok(page.map(|course| {
            let summary = summaries.get(&course.bootcamp).cloned();
            CourseDetail::new(course, summary)
        }))
    }

    async fn list_for_bootcamp(&self, bootcamp: BootcampId) -> Result<Vec<Course>, Error> {
        self.courses
            .list_for_bootcamp(&bootcamp)
            .await
            .map_err(course_store)
    }

    async fn get(&self, id: CourseId) -> Result<CourseDetail, Error> {
        let course = self.find(&id).await?;
        let summary = self.summaries(&[course.bootcamp]).await?.remove(&course.bootcamp);
        Ok(CourseDetail::new(course, summary))
    }

    async fn create(
        &self,
        principal: &Principal,
        bootcamp: BootcampId,
        draft: CourseDraft,
    ) -> Result<Course, Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let parent = self
            .bootcamps
            .find_by_id(&bootcamp)
            .await
            .map_err(bootcamp_store)?
            .ok_or_else(|| Error::not_found(format!("no bootcamp with the id of {bootcamp}")))?;
        ensure_can_mutate(&parent.user, principal, "bootcamp")?;
        let course = Course::create(
            CourseId::random(),
            bootcamp,
            principal.id,
            draft,
            self.clock.utc(),
        );
        self.courses.insert(&course).await.map_err(course_store)?;
        info!(course_id = %course.id, bootcamp_id = %bootcamp, "course created");
        self.aggregates.refresh_average_cost(&bootcamp).await;
        Ok(course)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: CourseId,
        input: CourseInput,
    ) -> Result<Course, Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let mut course = self.find(&id).await?;
        ensure_can_mutate(&course.user, principal, "course")?;
        let patch = CoursePatch::try_from(input)?;
        let tuition_changed = patch.changes_tuition();
        course.apply(patch);
        if !self.courses.update(&course).await.map_err(course_store)? {
            return Err(not_found(&id));
        }
        if tuition_changed {
            self.aggregates.refresh_average_cost(&course.bootcamp).await;
        }
        Ok(course)
    }

    async fn delete(&self, principal: &Principal, id: CourseId) -> Result<(), Error> {
        ensure_role(principal, PUBLISHER_ROLES)?;
        let course = self.find(&id).await?;
        ensure_can_mutate(&course.user, principal, "course")?;
        if !self.courses.delete(&id).await.map_err(course_store)? {
            return Err(not_found(&id));
        }
        info!(course_id = %id, bootcamp_id = %course.bootcamp, "course deleted");
        self.aggregates.refresh_average_cost(&course.bootcamp).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
