//! Courses offered by a bootcamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldError, required_text};
use super::{BootcampId, BootcampSummary, CourseId, UserId};

/// Maximum length of a course title.
pub const COURSE_TITLE_MAX: usize = 100;
/// Maximum length of a course description.
pub const COURSE_DESCRIPTION_MAX: usize = 1000;

/// Prior experience a course expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

impl MinimumSkill {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for MinimumSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MinimumSkill {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(FieldError::Invalid {
                field: "minimumSkill",
                reason: "must be beginner, intermediate or advanced",
            }),
        }
    }
}

/// Stored course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[schema(value_type = String)]
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: u32,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub bootcamp: BootcampId,
    #[schema(value_type = String)]
    pub user: UserId,
}

impl Course {
    /// Assemble a course under `bootcamp` owned by `owner`.
    pub fn create(
        id: CourseId,
        bootcamp: BootcampId,
        owner: UserId,
        draft: CourseDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            weeks: draft.weeks,
            tuition: draft.tuition,
            minimum_skill: draft.minimum_skill,
            scholarship_available: draft.scholarship_available,
            created_at,
            bootcamp,
            user: owner,
        }
    }

    /// Apply a validated partial update.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(weeks) = patch.weeks {
            self.weeks = weeks;
        }
        if let Some(tuition) = patch.tuition {
            self.tuition = tuition;
        }
        if let Some(minimum_skill) = patch.minimum_skill {
            self.minimum_skill = minimum_skill;
        }
        if let Some(scholarship_available) = patch.scholarship_available {
            self.scholarship_available = scholarship_available;
        }
    }
}

/// Course with its parent bootcamp summary embedded.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[schema(value_type = String)]
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: u32,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub created_at: DateTime<Utc>,
    /// Parent summary, or `null` when the parent disappeared concurrently.
    pub bootcamp: Option<BootcampSummary>,
    #[schema(value_type = String)]
    pub user: UserId,
}

impl CourseDetail {
    /// Pair a course with the summary of its parent.
    pub fn new(course: Course, bootcamp: Option<BootcampSummary>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            weeks: course.weeks,
            tuition: course.tuition,
            minimum_skill: course.minimum_skill,
            scholarship_available: course.scholarship_available,
            created_at: course.created_at,
            bootcamp,
            user: course.user,
        }
    }
}

/// Unvalidated course payload.
#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<i64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: u32,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
}

impl TryFrom<CourseInput> for CourseDraft {
    type Error = FieldError;

    fn try_from(input: CourseInput) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text("title", input.title.as_deref(), COURSE_TITLE_MAX)?,
            description: required_text(
                "description",
                input.description.as_deref(),
                COURSE_DESCRIPTION_MAX,
            )?,
            weeks: required_text("weeks", input.weeks.as_deref(), usize::MAX)?,
            tuition: validate_tuition(input.tuition.ok_or(FieldError::Missing { field: "tuition" })?)?,
            minimum_skill: input
                .minimum_skill
                .ok_or(FieldError::Missing { field: "minimumSkill" })?,
            scholarship_available: input.scholarship_available.unwrap_or(false),
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<u32>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl CoursePatch {
    /// Whether the patch touches tuition and therefore the cost aggregate.
    pub fn changes_tuition(&self) -> bool {
        self.tuition.is_some()
    }
}

impl TryFrom<CourseInput> for CoursePatch {
    type Error = FieldError;

    fn try_from(input: CourseInput) -> Result<Self, Self::Error> {
        Ok(Self {
            title: input
                .title
                .as_deref()
                .map(|title| required_text("title", Some(title), COURSE_TITLE_MAX))
                .transpose()?,
            description: input
                .description
                .as_deref()
                .map(|text| required_text("description", Some(text), COURSE_DESCRIPTION_MAX))
                .transpose()?,
            weeks: input
                .weeks
                .as_deref()
                .map(|weeks| required_text("weeks", Some(weeks), usize::MAX))
                .transpose()?,
            tuition: input.tuition.map(validate_tuition).transpose()?,
            minimum_skill: input.minimum_skill,
            scholarship_available: input.scholarship_available,
        })
    }
}

/// Highest accepted tuition. The mean of any set of tuitions, rounded up to
/// a multiple of ten, stays within an `INTEGER` column.
pub const MAX_TUITION: u32 = i32::MAX as u32 - 9;

fn validate_tuition(raw: i64) -> Result<u32, FieldError> {
    let tuition = u32::try_from(raw).map_err(|_| FieldError::Invalid {
        field: "tuition",
        reason: "must be a non-negative whole number",
    })?;
    if tuition > MAX_TUITION {
        return Err(FieldError::Invalid {
            field: "tuition",
            reason: "is too large",
        });
    }
    Ok(tuition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input() -> CourseInput {
        CourseInput {
            title: Some("Front End Web Development".into()),
            description: Some("HTML, CSS and JavaScript".into()),
            weeks: Some("8".into()),
            tuition: Some(8000),
            minimum_skill: Some(MinimumSkill::Beginner),
            scholarship_available: None,
        }
    }

    #[rstest]
    fn draft_accepts_complete_input() {
        let draft = CourseDraft::try_from(input()).expect("valid input");
        assert_eq!(draft.tuition, 8000);
        assert!(!draft.scholarship_available);
    }

    #[rstest]
    #[case::negative_tuition(CourseInput { tuition: Some(-1), ..input() }, "tuition")]
    #[case::tuition_past_cap(CourseInput { tuition: Some(i64::from(MAX_TUITION) + 1), ..input() }, "tuition")]
    #[case::tuition_past_u32(CourseInput { tuition: Some(4_294_967_295), ..input() }, "tuition")]
    #[case::missing_tuition(CourseInput { tuition: None, ..input() }, "tuition")]
    #[case::missing_skill(CourseInput { minimum_skill: None, ..input() }, "minimumSkill")]
    #[case::missing_weeks(CourseInput { weeks: None, ..input() }, "weeks")]
    #[case::long_title(CourseInput { title: Some("t".repeat(101)), ..input() }, "title")]
    fn draft_rejects_invalid_fields(#[case] input: CourseInput, #[case] field: &str) {
        let err = CourseDraft::try_from(input).expect_err("invalid input");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn patch_only_touches_supplied_fields() {
        let mut course = Course::create(
            CourseId::random(),
            BootcampId::random(),
            UserId::random(),
            CourseDraft::try_from(input()).expect("valid input"),
            Utc::now(),
        );
        let patch = CoursePatch::try_from(CourseInput {
            tuition: Some(9000),
            ..CourseInput::default()
        })
        .expect("valid patch");
        assert!(patch.changes_tuition());

        course.apply(patch);

        assert_eq!(course.tuition, 9000);
        assert_eq!(course.title, "Front End Web Development");
    }

    #[rstest]
    fn skills_parse_from_lowercase() {
        assert_eq!("advanced".parse::<MinimumSkill>(), Ok(MinimumSkill::Advanced));
        assert!("expert".parse::<MinimumSkill>().is_err());
    }
}
