//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Credentials and the pending reset ticket live on the account row. The
//! public listing selects only non-secret columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;
use tracing::debug;

use crate::domain::listing::{SortDirection, SortKey, UserSortField};
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserAccount, UserId, UserListQuery};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, map_unique_diesel_error,
};
use super::diesel_helpers::{collect_rows, page_bounds, total_from_count};
use super::models::{InvalidRow, PublicUserRow, UserRecord, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> UserRepositoryError {
    map_unique_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
        UserRepositoryError::conflict,
    )
}

fn map_row_error(error: InvalidRow) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

fn sorted(keys: &[SortKey<UserSortField>]) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    for key in keys {
        let descending = key.direction == SortDirection::Desc;
        query = match (key.field, descending) {
            (UserSortField::CreatedAt, false) => query.then_order_by(users::created_at.asc()),
            (UserSortField::CreatedAt, true) => query.then_order_by(users::created_at.desc()),
            (UserSortField::Name, false) => query.then_order_by(users::name.asc()),
            (UserSortField::Name, true) => query.then_order_by(users::name.desc()),
            (UserSortField::Email, false) => query.then_order_by(users::email.asc()),
            (UserSortField::Email, true) => query.then_order_by(users::email.desc()),
        };
    }
    query.then_order_by(users::id.asc())
}

fn into_account(row: Option<UserRow>) -> Result<Option<UserAccount>, UserRepositoryError> {
    row.map(UserAccount::try_from)
        .transpose()
        .map_err(map_row_error)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRecord::from(account))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        debug!(user_id = %account.user.id, "account row inserted");
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(account.user.id.as_uuid()))
            .set(UserRecord::from(account))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        into_account(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        into_account(row)
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::reset_token_hash.eq(token_hash))
            .filter(users::reset_expires_at.gt(now))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        into_account(row)
    }

    async fn list(&self, query: &UserListQuery) -> Result<Page<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (limit, offset) = page_bounds(query.page);
        let rows: Vec<PublicUserRow> = sorted(&query.sort)
            .select(PublicUserRow::as_select())
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

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
