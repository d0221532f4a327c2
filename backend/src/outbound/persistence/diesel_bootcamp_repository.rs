//! PostgreSQL-backed `BootcampRepository` implementation using Diesel ORM.
//!
//! Courses and reviews reference bootcamps with `ON DELETE CASCADE`, so a
//! single delete removes the whole listing. Radius search evaluates the
//! haversine central angle in SQL against the cap's angular radius.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Float8};
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::listing::{BootcampSortField, SortDirection, SortKey};
use crate::domain::ports::{BootcampRepository, BootcampRepositoryError};
use crate::domain::{
    Bootcamp, BootcampFilter, BootcampId, BootcampListQuery, BootcampSummary, SphericalCap, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_unique_diesel_error,
};
use super::diesel_helpers::{collect_rows, lower, page_bounds, total_from_count};
use super::models::{
    AmountOverflow, BootcampChanges, BootcampRow, BootcampSummaryRow, InvalidRow, NewBootcampRow,
    amount_to_db, bound_to_db,
};
use super::pool::{DbPool, PoolError};
use super::schema::bootcamps;

/// Diesel-backed implementation of the `BootcampRepository` port.
#[derive(Clone)]
pub struct DieselBootcampRepository {
    pool: DbPool,
}

impl DieselBootcampRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BootcampRepositoryError {
    map_basic_pool_error(error, BootcampRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BootcampRepositoryError {
    map_basic_diesel_error(
        error,
        BootcampRepositoryError::query,
        BootcampRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> BootcampRepositoryError {
    map_unique_diesel_error(
        error,
        BootcampRepositoryError::query,
        BootcampRepositoryError::connection,
        |_| BootcampRepositoryError::conflict("a bootcamp with that name already exists"),
    )
}

fn map_row_error(error: InvalidRow) -> BootcampRepositoryError {
    BootcampRepositoryError::query(error.to_string())
}

fn map_amount_error(error: AmountOverflow) -> BootcampRepositoryError {
    BootcampRepositoryError::query(error.to_string())
}

fn filtered(filter: &BootcampFilter) -> bootcamps::BoxedQuery<'static, Pg> {
    let mut query = bootcamps::table.into_boxed();
    if let Some(career) = filter.career {
        query = query.filter(bootcamps::careers.contains(vec![career.as_str()]));
    }
    if let Some(housing) = filter.housing {
        query = query.filter(bootcamps::housing.eq(housing));
    }
    if let Some(job_assistance) = filter.job_assistance {
        query = query.filter(bootcamps::job_assistance.eq(job_assistance));
    }
    if let Some(job_guarantee) = filter.job_guarantee {
        query = query.filter(bootcamps::job_guarantee.eq(job_guarantee));
    }
    if let Some(accept_gi) = filter.accept_gi {
        query = query.filter(bootcamps::accept_gi.eq(accept_gi));
    }
    if let Some(max) = filter.average_cost_lte {
        query = query.filter(bootcamps::average_cost.le(bound_to_db(max)));
    }
    if let Some(min) = filter.average_cost_gte {
        query = query.filter(bootcamps::average_cost.ge(bound_to_db(min)));
    }
    if let Some(min) = filter.average_rating_gte {
        query = query.filter(bootcamps::average_rating.ge(min));
    }
    if let Some(city) = filter.city.clone() {
        query = query.filter(lower(bootcamps::city).eq(lower(city)));
    }
    query
}

fn sorted(
    mut query: bootcamps::BoxedQuery<'static, Pg>,
    keys: &[SortKey<BootcampSortField>],
) -> bootcamps::BoxedQuery<'static, Pg> {
    for key in keys {
        query = match (key.field, key.direction) {
            (BootcampSortField::CreatedAt, SortDirection::Asc) => {
                query.then_order_by(bootcamps::created_at.asc())
            }
            (BootcampSortField::CreatedAt, SortDirection::Desc) => {
                query.then_order_by(bootcamps::created_at.desc())
            }
            (BootcampSortField::Name, SortDirection::Asc) => query.then_order_by(bootcamps::name.asc()),
            (BootcampSortField::Name, SortDirection::Desc) => {
                query.then_order_by(bootcamps::name.desc())
            }
            (BootcampSortField::AverageCost, SortDirection::Asc) => {
                query.then_order_by(bootcamps::average_cost.asc())
            }
            (BootcampSortField::AverageCost, SortDirection::Desc) => {
                query.then_order_by(bootcamps::average_cost.desc())
            }
            (BootcampSortField::AverageRating, SortDirection::Asc) => {
                query.then_order_by(bootcamps::average_rating.asc())
            }
            (BootcampSortField::AverageRating, SortDirection::Desc) => {
                query.then_order_by(bootcamps::average_rating.desc())
            }
        };
    }
    query.then_order_by(bootcamps::id.asc())
}

/// Rows whose haversine central angle to the cap centre is within the cap
/// radius.
fn within_cap(cap: &SphericalCap) -> bootcamps::BoxedQuery<'static, Pg> {
    let center = cap.center();
    bootcamps::table.into_boxed().filter(
        sql::<Bool>("2 * asin(least(1.0, sqrt(power(sin(radians(latitude - ")
            .bind::<Float8, _>(center.lat())
            .sql(") / 2), 2) + cos(radians(")
            .bind::<Float8, _>(center.lat())
            .sql(")) * cos(radians(latitude)) * power(sin(radians(longitude - ")
            .bind::<Float8, _>(center.lng())
            .sql(") / 2), 2)))) <= ")
            .bind::<Float8, _>(cap.radius()),
    )
}

#[async_trait]
impl BootcampRepository for DieselBootcampRepository {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), BootcampRepositoryError> {
        let row = NewBootcampRow::try_from(bootcamp).map_err(map_amount_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(bootcamps::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<bool, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bootcamps::table.find(bootcamp.id.as_uuid()))
            .set(BootcampChanges::from(bootcamp))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bootcamps::table
            .find(id.as_uuid())
            .select(BootcampRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Bootcamp::try_from).transpose().map_err(map_row_error)
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bootcamps::table
            .filter(bootcamps::user_id.eq(owner.as_uuid()))
            .select(BootcampRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Bootcamp::try_from).transpose().map_err(map_row_error)
    }

    async fn summaries(
        &self,
        ids: &[BootcampId],
    ) -> Result<Vec<BootcampSummary>, BootcampRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<_> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = bootcamps::table
            .filter(bootcamps::id.eq_any(uuids))
            .select(BootcampSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(BootcampSummary::from).collect())
    }

    async fn list(&self, query: &BootcampListQuery) -> Result<Page<Bootcamp>, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = filtered(&query.filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (limit, offset) = page_bounds(query.page);
        let rows: Vec<BootcampRow> = sorted(filtered(&query.filter), &query.sort)
            .select(BootcampRow::as_select())
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

    async fn within(&self, cap: &SphericalCap) -> Result<Vec<Bootcamp>, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BootcampRow> = within_cap(cap)
            .order(bootcamps::created_at.desc())
            .select(BootcampRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn delete(&self, id: &BootcampId) -> Result<bool, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(bootcamps::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn set_average_cost(
        &self,
        id: &BootcampId,
        average_cost: Option<u32>,
    ) -> Result<bool, BootcampRepositoryError> {
        let stored = average_cost
            .map(amount_to_db)
            .transpose()
            .map_err(map_amount_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bootcamps::table.find(id.as_uuid()))
            .set(bootcamps::average_cost.eq(stored))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_average_rating(
        &self,
        id: &BootcampId,
        average_rating: Option<f64>,
    ) -> Result<bool, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bootcamps::table.find(id.as_uuid()))
            .set(bootcamps::average_rating.eq(average_rating))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_photo(&self, id: &BootcampId, photo: &str) -> Result<bool, BootcampRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bootcamps::table.find(id.as_uuid()))
            .set(bootcamps::photo.eq(photo))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
