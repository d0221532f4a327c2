//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::listing::{CourseSortField, SortDirection, SortKey};
use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{BootcampId, Course, CourseFilter, CourseId, CourseListQuery};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{collect_rows, page_bounds, total_from_count};
use super::models::{AmountOverflow, CourseChanges, CourseRow, InvalidRow, NewCourseRow, bound_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::courses;

/// Skill levels rank beginner < intermediate < advanced, not alphabetically.
const SKILL_RANK: &str =
    "CASE minimum_skill WHEN 'beginner' THEN 0 WHEN 'intermediate' THEN 1 ELSE 2 END";

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, CourseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

fn map_row_error(error: InvalidRow) -> CourseRepositoryError {
    CourseRepositoryError::query(error.to_string())
}

fn map_amount_error(error: AmountOverflow) -> CourseRepositoryError {
    CourseRepositoryError::query(error.to_string())
}

fn filtered(filter: &CourseFilter) -> courses::BoxedQuery<'static, Pg> {
    let mut query = courses::table.into_boxed();
    if let Some(skill) = filter.minimum_skill {
        query = query.filter(courses::minimum_skill.eq(skill.as_str()));
    }
    if let Some(max) = filter.tuition_lte {
        query = query.filter(courses::tuition.le(bound_to_db(max)));
    }
    if let Some(min) = filter.tuition_gte {
        query = query.filter(courses::tuition.ge(bound_to_db(min)));
    }
    query
}

fn sorted(
    mut query: courses::BoxedQuery<'static, Pg>,
    keys: &[SortKey<CourseSortField>],
) -> courses::BoxedQuery<'static, Pg> {
    for key in keys {
        let descending = key.direction == SortDirection::Desc;
        query = match (key.field, descending) {
            (CourseSortField::CreatedAt, false) => query.then_order_by(courses::created_at.asc()),
            (CourseSortField::CreatedAt, true) => query.then_order_by(courses::created_at.desc()),
            (CourseSortField::Title, false) => query.then_order_by(courses::title.asc()),
            (CourseSortField::Title, true) => query.then_order_by(courses::title.desc()),
            (CourseSortField::Tuition, false) => query.then_order_by(courses::tuition.asc()),
            (CourseSortField::Tuition, true) => query.then_order_by(courses::tuition.desc()),
            (CourseSortField::MinimumSkill, false) => {
                query.then_order_by(sql::<Integer>(SKILL_RANK).asc())
            }
            (CourseSortField::MinimumSkill, true) => {
                query.then_order_by(sql::<Integer>(SKILL_RANK).desc())
            }
        };
    }
    query.then_order_by(courses::id.asc())
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let row = NewCourseRow::try_from(course).map_err(map_amount_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(courses::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError> {
        let changes = CourseChanges::try_from(course).map_err(map_amount_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(courses::table.find(course.id.as_uuid()))
            .set(changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = courses::table
            .find(id.as_uuid())
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Course::try_from).transpose().map_err(map_row_error)
    }

    async fn list(&self, query: &CourseListQuery) -> Result<Page<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = filtered(&query.filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (limit, offset) = page_bounds(query.page);
        let rows: Vec<CourseRow> = sorted(filtered(&query.filter), &query.sort)
            .select(CourseRow::as_select())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page {
            items: collect_rows(rows, map_row_error)?,
            total: total_from_count(count),
            request: query.page,
        })
    }

    async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CourseRow> = courses::table
            .filter(courses::bootcamp_id.eq(bootcamp.as_uuid()))
            .order((courses::created_at.asc(), courses::id.asc()))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn list_for_bootcamps(
        &self,
        bootcamps: &[BootcampId],
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        if bootcamps.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let parents: Vec<_> = bootcamps.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<CourseRow> = courses::table
            .filter(courses::bootcamp_id.eq_any(parents))
            .order((courses::created_at.asc(), courses::id.asc()))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn tuitions_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<u32>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tuitions: Vec<i32> = courses::table
            .filter(courses::bootcamp_id.eq(bootcamp.as_uuid()))
            .select(courses::tuition)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        tuitions
            .into_iter()
            .map(|tuition| {
                u32::try_from(tuition)
                    .map_err(|_| CourseRepositoryError::query("stored tuition is negative"))
            })
            .collect()
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(courses::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
