//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-validate
//! enum-like text columns so a hand-edited row surfaces as a query error
//! rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Bootcamp, BootcampId, BootcampSummary, Career, Course, CourseId, EmailAddress, GeoPoint,
    Location, MinimumSkill, PasswordHash, Rating, ResetTicket, Review, ReviewId, Role, User,
    UserAccount, UserId, UserName,
};

use super::schema::{bootcamps, courses, reviews, users};

/// A stored row that no longer satisfies domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct InvalidRow {
    table: &'static str,
    id: Uuid,
    reason: String,
}

impl InvalidRow {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

/// An amount past the range of an `INTEGER` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount {0} does not fit an INTEGER column")]
pub(crate) struct AmountOverflow(u32);

/// Store an unsigned amount in an `INTEGER` column.
pub(crate) fn amount_to_db(value: u32) -> Result<i32, AmountOverflow> {
    i32::try_from(value).map_err(|_| AmountOverflow(value))
}

/// Filter bound over an `INTEGER` column. Stored amounts never exceed
/// `i32::MAX`, so larger bounds saturate without changing the match set.
pub(crate) fn bound_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn amount_from_db(table: &'static str, id: Uuid, value: i32) -> Result<u32, InvalidRow> {
    u32::try_from(value).map_err(|_| InvalidRow::new(table, id, "negative amount"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub reset_token_hash: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Public columns of the users table, used by the admin listing.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PublicUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable and changeset struct for accounts.
///
/// `treat_none_as_null` lets an update clear a redeemed reset ticket.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
    pub reset_token_hash: Option<&'a str>,
    pub reset_expires_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a UserAccount> for UserRecord<'a> {
    fn from(account: &'a UserAccount) -> Self {
        Self {
            id: *account.user.id.as_uuid(),
            name: account.user.name.as_ref(),
            email: account.user.email.as_ref(),
            role: account.user.role.as_str(),
            password_hash: account.password_hash.as_str(),
            reset_token_hash: account.reset.as_ref().map(|ticket| ticket.token_hash.as_str()),
            reset_expires_at: account.reset.as_ref().map(|ticket| ticket.expires_at),
        }
    }
}

fn public_user(
    id: Uuid,
    name: String,
    email: String,
    role: &str,
    created_at: DateTime<Utc>,
) -> Result<User, InvalidRow> {
    Ok(User {
        id: UserId::from_uuid(id),
        name: UserName::new(name).map_err(|err| InvalidRow::new("users", id, err))?,
        email: EmailAddress::new(email).map_err(|err| InvalidRow::new("users", id, err))?,
        role: role.parse::<Role>().map_err(|err| InvalidRow::new("users", id, err))?,
        created_at,
    })
}

impl TryFrom<PublicUserRow> for User {
    type Error = InvalidRow;

    fn try_from(row: PublicUserRow) -> Result<Self, Self::Error> {
        public_user(row.id, row.name, row.email, &row.role, row.created_at)
    }
}

impl TryFrom<UserRow> for UserAccount {
    type Error = InvalidRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let reset = match (row.reset_token_hash, row.reset_expires_at) {
            (Some(token_hash), Some(expires_at)) => Some(ResetTicket {
                token_hash,
                expires_at,
            }),
            _ => None,
        };
        Ok(Self {
            user: public_user(row.id, row.name, row.email, &row.role, row.created_at)?,
            password_hash: PasswordHash::new(row.password_hash),
            reset,
        })
    }
}

// ---------------------------------------------------------------------------
// Bootcamps
// ---------------------------------------------------------------------------

/// Row struct for reading from the bootcamps table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bootcamps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BootcampRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub formatted_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_cost: Option<i32>,
    pub average_rating: Option<f64>,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// `{id, name, description}` projection used for embedding.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bootcamps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BootcampSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<BootcampSummaryRow> for BootcampSummary {
    fn from(row: BootcampSummaryRow) -> Self {
        Self {
            id: BootcampId::from_uuid(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

/// Insertable struct for new bootcamps.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bootcamps)]
pub(crate) struct NewBootcampRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    #[diesel(embed)]
    pub fields: BootcampChanges<'a>,
    pub average_cost: Option<i32>,
    pub average_rating: Option<f64>,
    pub photo: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Editable bootcamp columns. Aggregates and photo have their own writers.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = bootcamps)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BootcampChanges<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub website: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub longitude: f64,
    pub latitude: f64,
    pub formatted_address: &'a str,
    pub street: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub zipcode: &'a str,
    pub country: &'a str,
    pub careers: Vec<&'static str>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

impl<'a> From<&'a Bootcamp> for BootcampChanges<'a> {
    fn from(bootcamp: &'a Bootcamp) -> Self {
        let location = &bootcamp.location;
        Self {
            name: &bootcamp.name,
            slug: &bootcamp.slug,
            description: &bootcamp.description,
            website: bootcamp.website.as_deref(),
            phone: bootcamp.phone.as_deref(),
            email: bootcamp.email.as_ref().map(|email| email.as_ref()),
            longitude: location.point.lng(),
            latitude: location.point.lat(),
            formatted_address: &location.formatted_address,
            street: &location.street,
            city: &location.city,
            state: &location.state,
            zipcode: &location.zipcode,
            country: &location.country,
            careers: bootcamp.careers.iter().map(|career| career.as_str()).collect(),
            housing: bootcamp.housing,
            job_assistance: bootcamp.job_assistance,
            job_guarantee: bootcamp.job_guarantee,
            accept_gi: bootcamp.accept_gi,
        }
    }
}

impl<'a> TryFrom<&'a Bootcamp> for NewBootcampRow<'a> {
    type Error = AmountOverflow;

    fn try_from(bootcamp: &'a Bootcamp) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *bootcamp.id.as_uuid(),
            user_id: *bootcamp.user.as_uuid(),
            fields: BootcampChanges::from(bootcamp),
            average_cost: bootcamp.average_cost.map(amount_to_db).transpose()?,
            average_rating: bootcamp.average_rating,
            photo: &bootcamp.photo,
            created_at: bootcamp.created_at,
        })
    }
}

impl TryFrom<BootcampRow> for Bootcamp {
    type Error = InvalidRow;

    fn try_from(row: BootcampRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |reason: String| InvalidRow::new("bootcamps", id, reason);
        let point =
            GeoPoint::new(row.longitude, row.latitude).map_err(|err| invalid(err.to_string()))?;
        let careers = row
            .careers
            .iter()
            .map(|career| career.parse::<Career>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| invalid(err.to_string()))?;
        let email = row
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(|err| invalid(err.to_string()))?;
        let average_cost = row
            .average_cost
            .map(|cost| amount_from_db("bootcamps", id, cost))
            .transpose()?;
        Ok(Self {
            id: BootcampId::from_uuid(id),
            user: UserId::from_uuid(row.user_id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            website: row.website,
            phone: row.phone,
            email,
            location: Location {
                point,
                formatted_address: row.formatted_address,
                street: row.street,
                city: row.city,
                state: row.state,
                zipcode: row.zipcode,
                country: row.country,
            },
            careers,
            housing: row.housing,
            job_assistance: row.job_assistance,
            job_guarantee: row.job_guarantee,
            accept_gi: row.accept_gi,
            average_cost,
            average_rating: row.average_rating,
            photo: row.photo,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: i32,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new courses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub id: Uuid,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    #[diesel(embed)]
    pub fields: CourseChanges<'a>,
    pub created_at: DateTime<Utc>,
}

/// Editable course columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = courses)]
pub(crate) struct CourseChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub weeks: &'a str,
    pub tuition: i32,
    pub minimum_skill: &'static str,
    pub scholarship_available: bool,
}

impl<'a> TryFrom<&'a Course> for CourseChanges<'a> {
    type Error = AmountOverflow;

    fn try_from(course: &'a Course) -> Result<Self, Self::Error> {
        Ok(Self {
            title: &course.title,
            description: &course.description,
            weeks: &course.weeks,
            tuition: amount_to_db(course.tuition)?,
            minimum_skill: course.minimum_skill.as_str(),
            scholarship_available: course.scholarship_available,
        })
    }
}

impl<'a> TryFrom<&'a Course> for NewCourseRow<'a> {
    type Error = AmountOverflow;

    fn try_from(course: &'a Course) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *course.id.as_uuid(),
            bootcamp_id: *course.bootcamp.as_uuid(),
            user_id: *course.user.as_uuid(),
            fields: CourseChanges::try_from(course)?,
            created_at: course.created_at,
        })
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = InvalidRow;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let minimum_skill = row
            .minimum_skill
            .parse::<MinimumSkill>()
            .map_err(|err| InvalidRow::new("courses", row.id, err))?;
        Ok(Self {
            id: CourseId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            weeks: row.weeks,
            tuition: amount_from_db("courses", row.id, row.tuition)?,
            minimum_skill,
            scholarship_available: row.scholarship_available,
            created_at: row.created_at,
            bootcamp: BootcampId::from_uuid(row.bootcamp_id),
            user: UserId::from_uuid(row.user_id),
        })
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new reviews.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    #[diesel(embed)]
    pub fields: ReviewChanges<'a>,
    pub created_at: DateTime<Utc>,
}

/// Editable review columns.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewChanges<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub rating: i16,
}

impl<'a> From<&'a Review> for ReviewChanges<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            title: &review.title,
            text: &review.text,
            rating: i16::from(review.rating.value()),
        }
    }
}

impl<'a> From<&'a Review> for NewReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            id: *review.id.as_uuid(),
            bootcamp_id: *review.bootcamp.as_uuid(),
            user_id: *review.user.as_uuid(),
            fields: ReviewChanges::from(review),
            created_at: review.created_at,
        }
    }
}

/// Convert a stored `SMALLINT` rating.
pub(crate) fn rating_from_db(id: Uuid, raw: i16) -> Result<Rating, InvalidRow> {
    u8::try_from(raw)
        .map_err(|_| InvalidRow::new("reviews", id, "rating out of range"))
        .and_then(|value| Rating::try_from(value).map_err(|err| InvalidRow::new("reviews", id, err)))
}

impl TryFrom<ReviewRow> for Review {
    type Error = InvalidRow;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::from_uuid(row.id),
            title: row.title,
            text: row.text,
            rating: rating_from_db(row.id, row.rating)?,
            created_at: row.created_at,
            bootcamp: BootcampId::from_uuid(row.bootcamp_id),
            user: UserId::from_uuid(row.user_id),
        })
    }
}
