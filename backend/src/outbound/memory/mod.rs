//! In-process persistence used when no database is configured.
//!
//! [`MemoryStore`] implements every repository port over one shared table
//! set guarded by an async `RwLock`. It mirrors the PostgreSQL schema's
//! constraints: unique bootcamp names and emails, one review per author and
//! bootcamp, and cascading delete from bootcamps to their children.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::ports::{
    BootcampRepository, BootcampRepositoryError, CourseRepository, CourseRepositoryError,
    ReviewRepository, ReviewRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Bootcamp, BootcampId, BootcampListQuery, BootcampSummary, Course, CourseId, CourseListQuery,
    Rating, Review, ReviewId, ReviewListQuery, SphericalCap, User, UserAccount, UserId,
    UserListQuery, order_by,
};

#[derive(Debug, Default)]
struct Tables {
    bootcamps: HashMap<BootcampId, Bootcamp>,
    courses: HashMap<CourseId, Course>,
    reviews: HashMap<ReviewId, Review>,
    users: HashMap<UserId, UserAccount>,
}

/// Shared in-memory implementation of the repository ports.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    Page {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total,
        request,
    }
}

fn oldest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| created_at(item));
}

#[async_trait]
impl BootcampRepository for MemoryStore {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.bootcamps.values().any(|other| other.name == bootcamp.name) {
            return Err(BootcampRepositoryError::conflict(
                "a bootcamp with that name already exists",
            ));
        }
        tables.bootcamps.insert(bootcamp.id, bootcamp.clone());
        Ok(())
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<bool, BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .bootcamps
            .values()
            .any(|other| other.id != bootcamp.id && other.name == bootcamp.name)
        {
            return Err(BootcampRepositoryError::conflict(
                "a bootcamp with that name already exists",
            ));
        }
        let Some(stored) = tables.bootcamps.get_mut(&bootcamp.id) else {
            return Ok(false);
        };
        // Aggregates and photo have their own writers.
        let mut next = bootcamp.clone();
        next.average_cost = stored.average_cost;
        next.average_rating = stored.average_rating;
        next.photo.clone_from(&stored.photo);
        *stored = next;
        Ok(true)
    }

    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, BootcampRepositoryError> {
        Ok(self.tables.read().await.bootcamps.get(id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, BootcampRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bootcamps
            .values()
            .find(|bootcamp| bootcamp.user == *owner)
            .cloned())
    }

    async fn summaries(
        &self,
        ids: &[BootcampId],
    ) -> Result<Vec<BootcampSummary>, BootcampRepositoryError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.bootcamps.get(id))
            .map(Bootcamp::summary)
            .collect())
    }

    async fn list(&self, query: &BootcampListQuery) -> Result<Page<Bootcamp>, BootcampRepositoryError> {
        let mut matches: Vec<_> = {
            let tables = self.tables.read().await;
            tables
                .bootcamps
                .values()
                .filter(|bootcamp| query.filter.matches(bootcamp))
                .cloned()
                .collect()
        };
        order_by(&mut matches, &query.sort, |a, b| a.id.cmp(&b.id));
        Ok(page_of(matches, query.page))
    }

    async fn within(&self, cap: &SphericalCap) -> Result<Vec<Bootcamp>, BootcampRepositoryError> {
        let tables = self.tables.read().await;
        let mut found: Vec<_> = tables
            .bootcamps
            .values()
            .filter(|bootcamp| cap.contains(&bootcamp.location.point))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, id: &BootcampId) -> Result<bool, BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.bootcamps.remove(id).is_none() {
            return Ok(false);
        }
        tables.courses.retain(|_, course| course.bootcamp != *id);
        tables.reviews.retain(|_, review| review.bootcamp != *id);
        Ok(true)
    }

    async fn set_average_cost(
        &self,
        id: &BootcampId,
        average_cost: Option<u32>,
    ) -> Result<bool, BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bootcamps
            .get_mut(id)
            .map(|bootcamp| bootcamp.average_cost = average_cost)
            .is_some())
    }

    async fn set_average_rating(
        &self,
        id: &BootcampId,
        average_rating: Option<f64>,
    ) -> Result<bool, BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bootcamps
            .get_mut(id)
            .map(|bootcamp| bootcamp.average_rating = average_rating)
            .is_some())
    }

    async fn set_photo(&self, id: &BootcampId, photo: &str) -> Result<bool, BootcampRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .bootcamps
            .get_mut(id)
            .map(|bootcamp| photo.clone_into(&mut bootcamp.photo))
            .is_some())
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.bootcamps.contains_key(&course.bootcamp) {
            return Err(CourseRepositoryError::query("parent bootcamp does not exist"));
        }
        tables.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<bool, CourseRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .courses
            .get_mut(&course.id)
            .map(|stored| stored.clone_from(course))
            .is_some())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        Ok(self.tables.read().await.courses.get(id).cloned())
    }

    async fn list(&self, query: &CourseListQuery) -> Result<Page<Course>, CourseRepositoryError> {
        let mut matches: Vec<_> = {
            let tables = self.tables.read().await;
            tables
                .courses
                .values()
                .filter(|course| query.filter.matches(course))
                .cloned()
                .collect()
        };
        order_by(&mut matches, &query.sort, |a, b| a.id.cmp(&b.id));
        Ok(page_of(matches, query.page))
    }

    async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        let tables = self.tables.read().await;
        let mut courses: Vec<_> = tables
            .courses
            .values()
            .filter(|course| course.bootcamp == *bootcamp)
            .cloned()
            .collect();
        oldest_first(&mut courses, |course| course.created_at);
        Ok(courses)
    }

    async fn list_for_bootcamps(
        &self,
        bootcamps: &[BootcampId],
    ) -> Result<Vec<Course>, CourseRepositoryError> {
        let tables = self.tables.read().await;
        let mut courses: Vec<_> = tables
            .courses
            .values()
            .filter(|course| bootcamps.contains(&course.bootcamp))
            .cloned()
            .collect();
        oldest_first(&mut courses, |course| course.created_at);
        Ok(courses)
    }

    async fn tuitions_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<u32>, CourseRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter(|course| course.bootcamp == *bootcamp)
            .map(|course| course.tuition)
            .collect())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError> {
        Ok(self.tables.write().await.courses.remove(id).is_some())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.bootcamps.contains_key(&review.bootcamp) {
            return Err(ReviewRepositoryError::query("parent bootcamp does not exist"));
        }
        if tables
            .reviews
            .values()
            .any(|other| other.bootcamp == review.bootcamp && other.user == review.user)
        {
            return Err(ReviewRepositoryError::conflict("reviews_bootcamp_user_key"));
        }
        tables.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .reviews
            .get_mut(&review.id)
            .map(|stored| stored.clone_from(review))
            .is_some())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(self.tables.read().await.reviews.get(id).cloned())
    }

    async fn list(&self, query: &ReviewListQuery) -> Result<Page<Review>, ReviewRepositoryError> {
        let mut all: Vec<_> = self.tables.read().await.reviews.values().cloned().collect();
        order_by(&mut all, &query.sort, |a, b| a.id.cmp(&b.id));
        Ok(page_of(all, query.page))
    }

    async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<_> = tables
            .reviews
            .values()
            .filter(|review| review.bootcamp == *bootcamp)
            .cloned()
            .collect();
        oldest_first(&mut reviews, |review| review.created_at);
        Ok(reviews)
    }

    async fn ratings_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Rating>, ReviewRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|review| review.bootcamp == *bootcamp)
            .map(|review| review.rating)
            .collect())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        Ok(self.tables.write().await.reviews.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.user.email == account.user.email)
        {
            return Err(UserRepositoryError::conflict("users_email_key"));
        }
        tables.users.insert(account.user.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.user.id != account.user.id && other.user.email == account.user.email)
        {
            return Err(UserRepositoryError::conflict("users_email_key"));
        }
        Ok(tables
            .users
            .get_mut(&account.user.id)
            .map(|stored| stored.clone_from(account))
            .is_some())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.email.as_ref() == email)
            .cloned())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|account| {
                account
                    .reset
                    .as_ref()
                    .is_some_and(|ticket| ticket.token_hash == token_hash && ticket.is_live_at(now))
            })
            .cloned())
    }

    async fn list(&self, query: &UserListQuery) -> Result<Page<User>, UserRepositoryError> {
        let mut all: Vec<User> = {
            let tables = self.tables.read().await;
            tables.users.values().map(|account| account.user.clone()).collect()
        };
        order_by(&mut all, &query.sort, |a, b| a.id.cmp(&b.id));
        Ok(page_of(all, query.page))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.tables.write().await.users.remove(id).is_some())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
