//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! One review per author and bootcamp is enforced by the
//! `reviews_bootcamp_user_key` constraint.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::listing::{ReviewSortField, SortDirection, SortKey};
use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{BootcampId, Rating, Review, ReviewId, ReviewListQuery};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_unique_diesel_error,
};
use super::diesel_helpers::{collect_rows, page_bounds, total_from_count};
use super::models::{InvalidRow, NewReviewRow, ReviewChanges, ReviewRow, rating_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn map_row_error(error: InvalidRow) -> ReviewRepositoryError {
    ReviewRepositoryError::query(error.to_string())
}

fn sorted(keys: &[SortKey<ReviewSortField>]) -> reviews::BoxedQuery<'static, Pg> {
    let mut query = reviews::table.into_boxed();
    for key in keys {
        let descending = key.direction == SortDirection::Desc;
        query = match (key.field, descending) {
            (ReviewSortField::CreatedAt, false) => query.then_order_by(reviews::created_at.asc()),
            (ReviewSortField::CreatedAt, true) => query.then_order_by(reviews::created_at.desc()),
            (ReviewSortField::Title, false) => query.then_order_by(reviews::title.asc()),
            (ReviewSortField::Title, true) => query.then_order_by(reviews::title.desc()),
            (ReviewSortField::Rating, false) => query.then_order_by(reviews::rating.asc()),
            (ReviewSortField::Rating, true) => query.then_order_by(reviews::rating.desc()),
        };
    }
    query.then_order_by(reviews::id.asc())
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reviews::table)
            .values(NewReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map_err(|error| {
                map_unique_diesel_error(
                    error,
                    ReviewRepositoryError::query,
                    ReviewRepositoryError::connection,
                    ReviewRepositoryError::conflict,
                )
            })?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(reviews::table.find(review.id.as_uuid()))
            .set(ReviewChanges::from(review))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = reviews::table
            .find(id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Review::try_from).transpose().map_err(map_row_error)
    }

    async fn list(&self, query: &ReviewListQuery) -> Result<Page<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = reviews::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (limit, offset) = page_bounds(query.page);
        let rows: Vec<ReviewRow> = sorted(&query.sort)
            .select(ReviewRow::as_select())
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
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::bootcamp_id.eq(bootcamp.as_uuid()))
            .order((reviews::created_at.asc(), reviews::id.asc()))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn ratings_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Rating>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(uuid::Uuid, i16)> = reviews::table
            .filter(reviews::bootcamp_id.eq(bootcamp.as_uuid()))
            .select((reviews::id, reviews::rating))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(id, rating)| rating_from_db(id, rating).map_err(map_row_error))
            .collect()
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
