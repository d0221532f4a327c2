//! Reviews left by accounts on bootcamps.
//!
//! Each account may review a given bootcamp at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, required_text};
use super::{BootcampId, BootcampSummary, ReviewId, UserId};

/// Maximum length of a review title.
pub const REVIEW_TITLE_MAX: usize = 100;
/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 10;

/// Integer score between [`RATING_MIN`] and [`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw score.
    pub fn new(raw: i64) -> Result<Self, FieldError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (RATING_MIN..=RATING_MAX).contains(value))
            .map(Self)
            .ok_or(FieldError::Invalid {
                field: "rating",
                reason: "must be a whole number between 1 and 10",
            })
    }

    /// Raw score.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

/// Stored review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = String)]
    pub id: ReviewId,
    pub title: String,
    pub text: String,
    #[schema(value_type = u8, minimum = 1, maximum = 10)]
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub bootcamp: BootcampId,
    #[schema(value_type = String)]
    pub user: UserId,
}

impl Review {
    /// Assemble a review of `bootcamp` written by `author`.
    pub fn create(
        id: ReviewId,
        bootcamp: BootcampId,
        author: UserId,
        draft: ReviewDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            text: draft.text,
            rating: draft.rating,
            created_at,
            bootcamp,
            user: author,
        }
    }

    /// Apply a validated partial update.
    pub fn apply(&mut self, patch: ReviewPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}

/// Review with its parent bootcamp summary embedded.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetail {
    #[schema(value_type = String)]
    pub id: ReviewId,
    pub title: String,
    pub text: String,
    #[schema(value_type = u8)]
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
    pub bootcamp: Option<BootcampSummary>,
    #[schema(value_type = String)]
    pub user: UserId,
}

impl ReviewDetail {
    /// Pair a review with the summary of its parent.
    pub fn new(review: Review, bootcamp: Option<BootcampSummary>) -> Self {
        Self {
            id: review.id,
            title: review.title,
            text: review.text,
            rating: review.rating,
            created_at: review.created_at,
            bootcamp,
            user: review.user,
        }
    }
}

/// Unvalidated review payload.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i64>,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub title: String,
    pub text: String,
    pub rating: Rating,
}

impl TryFrom<ReviewInput> for ReviewDraft {
    type Error = FieldError;

    fn try_from(input: ReviewInput) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text("title", input.title.as_deref(), REVIEW_TITLE_MAX)?,
            text: required_text("text", input.text.as_deref(), usize::MAX)?,
            rating: Rating::new(input.rating.ok_or(FieldError::Missing { field: "rating" })?)?,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<Rating>,
}

impl ReviewPatch {
    /// Whether the patch touches the rating and therefore the aggregate.
    pub fn changes_rating(&self) -> bool {
        self.rating.is_some()
    }
}

impl TryFrom<ReviewInput> for ReviewPatch {
    type Error = FieldError;

    fn try_from(input: ReviewInput) -> Result<Self, Self::Error> {
        Ok(Self {
            title: input
                .title
                .as_deref()
                .map(|title| required_text("title", Some(title), REVIEW_TITLE_MAX))
                .transpose()?,
            text: input
                .text
                .as_deref()
                .map(|text| required_text("text", Some(text), usize::MAX))
                .transpose()?,
            rating: input.rating.map(Rating::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(10, true)]
    #[case(11, false)]
    #[case(-3, false)]
    fn rating_bounds(#[case] raw: i64, #[case] valid: bool) {
        assert_eq!(Rating::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn draft_requires_rating() {
        let err = ReviewDraft::try_from(ReviewInput {
            title: Some("Great".into()),
            text: Some("Learned a lot".into()),
            rating: None,
        })
        .expect_err("rating missing");
        assert_eq!(err, FieldError::Missing { field: "rating" });
    }

    #[rstest]
    fn rating_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Rating>("11").is_err());
        assert_eq!(serde_json::from_str::<Rating>("7").map(Rating::value).ok(), Some(7));
    }

    #[rstest]
    fn patch_reports_rating_change() {
        let patch = ReviewPatch::try_from(ReviewInput {
            rating: Some(4),
            ..ReviewInput::default()
        })
        .expect("valid patch");
        assert!(patch.changes_rating());
    }
}
