//! Bootcamp listings.
//!
//! A bootcamp belongs to exactly one account (`user`). Its `averageCost` and
//! `averageRating` are derived from child courses and reviews and are only
//! ever written by the aggregate refresher.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use super::slug::{is_valid_slug, slugify};
use super::validation::{FieldError, optional_text, required_text};
use super::{BootcampId, Course, EmailAddress, Location, LocationDto, UserId};

/// Maximum length of a bootcamp name.
pub const BOOTCAMP_NAME_MAX: usize = 50;
/// Maximum length of a bootcamp description.
pub const BOOTCAMP_DESCRIPTION_MAX: usize = 500;
/// Maximum length of a phone number.
pub const BOOTCAMP_PHONE_MAX: usize = 20;
/// Photo used until one is uploaded.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Career tracks a bootcamp prepares students for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Other")]
    Other,
}

impl Career {
    /// Every career in declaration order.
    pub const ALL: [Career; 6] = [
        Self::WebDevelopment,
        Self::MobileDevelopment,
        Self::UiUx,
        Self::DataScience,
        Self::Business,
        Self::Other,
    ];

    /// Human-readable wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::UiUx => "UI/UX",
            Self::DataScience => "Data Science",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Career {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|career| career.as_str() == s)
            .ok_or(FieldError::Invalid {
                field: "careers",
                reason: "contains an unknown career",
            })
    }
}

/// Stored bootcamp listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    #[schema(value_type = String)]
    pub id: BootcampId,
    #[schema(value_type = String)]
    pub user: UserId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub email: Option<EmailAddress>,
    #[schema(value_type = LocationDto)]
    pub location: Location,
    pub careers: Vec<Career>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_cost: Option<u32>,
    pub average_rating: Option<f64>,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

impl Bootcamp {
    /// Assemble a new listing from a validated draft and its geocoded address.
    pub fn create(
        id: BootcampId,
        owner: UserId,
        draft: BootcampDraft,
        location: Location,
        created_at: DateTime<Utc>,
    ) -> Self {
        let BootcampDraft {
            name,
            description,
            website,
            phone,
            email,
            address: _,
            careers,
            housing,
            job_assistance,
            job_guarantee,
            accept_gi,
        } = draft;
        Self {
            id,
            user: owner,
            slug: slugify(&name),
            name,
            description,
            website,
            phone,
            email,
            location,
            careers,
            housing,
            job_assistance,
            job_guarantee,
            accept_gi,
            average_cost: None,
            average_rating: None,
            photo: DEFAULT_PHOTO.to_owned(),
            created_at,
        }
    }

    /// Apply a validated partial update. The slug follows the name.
    ///
    /// `location` replaces the stored one when the patch carried an address.
    pub fn apply(&mut self, patch: BootcampPatch, location: Option<Location>) {
        if let Some(name) = patch.name {
            self.slug = slugify(&name);
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(careers) = patch.careers {
            self.careers = careers;
        }
        if let Some(housing) = patch.housing {
            self.housing = housing;
        }
        if let Some(job_assistance) = patch.job_assistance {
            self.job_assistance = job_assistance;
        }
        if let Some(job_guarantee) = patch.job_guarantee {
            self.job_guarantee = job_guarantee;
        }
        if let Some(accept_gi) = patch.accept_gi {
            self.accept_gi = accept_gi;
        }
        if let Some(location) = location {
            self.location = location;
        }
    }

    /// Short projection embedded in course and review payloads.
    pub fn summary(&self) -> BootcampSummary {
        BootcampSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// `{id, name, description}` projection of a bootcamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BootcampSummary {
    #[schema(value_type = String)]
    pub id: BootcampId,
    pub name: String,
    pub description: String,
}

/// Bootcamp together with its courses, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BootcampDetail {
    #[serde(flatten)]
    pub bootcamp: Bootcamp,
    pub courses: Vec<Course>,
}

/// Unvalidated create payload.
#[derive(Debug, Clone, Default)]
pub struct BootcampInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BootcampDraft {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
    pub address: String,
    pub careers: Vec<Career>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

impl TryFrom<BootcampInput> for BootcampDraft {
    type Error = FieldError;

    fn try_from(input: BootcampInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: validate_name(input.name.as_deref())?,
            description: required_text(
                "description",
                input.description.as_deref(),
                BOOTCAMP_DESCRIPTION_MAX,
            )?,
            website: validate_website(input.website.as_deref())?,
            phone: optional_text("phone", input.phone.as_deref(), BOOTCAMP_PHONE_MAX)?,
            email: validate_email(input.email.as_deref())?,
            address: required_text("address", input.address.as_deref(), usize::MAX)?,
            careers: validate_careers(input.careers)?,
            housing: input.housing.unwrap_or(false),
            job_assistance: input.job_assistance.unwrap_or(false),
            job_guarantee: input.job_guarantee.unwrap_or(false),
            accept_gi: input.accept_gi.unwrap_or(false),
        })
    }
}

/// Validated partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootcampPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
    pub address: Option<String>,
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl TryFrom<BootcampInput> for BootcampPatch {
    type Error = FieldError;

    fn try_from(input: BootcampInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: input
                .name
                .as_deref()
                .map(|name| validate_name(Some(name)))
                .transpose()?,
            description: input
                .description
                .as_deref()
                .map(|text| required_text("description", Some(text), BOOTCAMP_DESCRIPTION_MAX))
                .transpose()?,
            website: validate_website(input.website.as_deref())?,
            phone: optional_text("phone", input.phone.as_deref(), BOOTCAMP_PHONE_MAX)?,
            email: validate_email(input.email.as_deref())?,
            address: input
                .address
                .as_deref()
                .map(|address| required_text("address", Some(address), usize::MAX))
                .transpose()?,
            careers: input.careers.map(|careers| validate_careers(Some(careers))).transpose()?,
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
        })
    }
}

fn validate_name(raw: Option<&str>) -> Result<String, FieldError> {
    let name = required_text("name", raw, BOOTCAMP_NAME_MAX)?;
    if !is_valid_slug(&slugify(&name)) {
        return Err(FieldError::Invalid {
            field: "name",
            reason: "must contain at least one letter or digit",
        });
    }
    Ok(name)
}

fn validate_website(raw: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(candidate) = optional_text("website", raw, usize::MAX)? else {
        return Ok(None);
    };
    let invalid = FieldError::Invalid {
        field: "website",
        reason: "must be a valid URL with HTTP or HTTPS",
    };
    let url = Url::parse(&candidate).map_err(|_| invalid.clone())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid);
    }
    Ok(Some(candidate))
}

fn validate_email(raw: Option<&str>) -> Result<Option<EmailAddress>, FieldError> {
    optional_text("email", raw, usize::MAX)?
        .map(|email| {
            EmailAddress::new(email).map_err(|_| FieldError::Invalid {
                field: "email",
                reason: "must be a valid email",
            })
        })
        .transpose()
}

fn validate_careers(raw: Option<Vec<Career>>) -> Result<Vec<Career>, FieldError> {
    let mut careers = raw.unwrap_or_default();
    let mut seen = Vec::with_capacity(careers.len());
    careers.retain(|career| {
        if seen.contains(career) {
            false
        } else {
            seen.push(*career);
            true
        }
    });
    if careers.is_empty() {
        return Err(FieldError::Missing { field: "careers" });
    }
    Ok(careers)
}
