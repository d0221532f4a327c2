//! Listing queries: sort keys, typed filters and page windows.
//!
//! Sort strings follow the `field,-other` convention where a leading `-`
//! means descending. Each resource exposes its own closed set of sortable
//! fields so unknown names fail validation instead of being ignored.

use std::cmp::Ordering;

use pagination::PageRequest;

use super::validation::FieldError;
use super::{Bootcamp, Career, Course, MinimumSkill, Review, User};

/// Ordering direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `field` + direction pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Closed set of sortable fields for one resource.
pub trait SortField: Copy + Sized {
    /// Record type the field belongs to.
    type Record;

    /// Resolve a camelCase wire name.
    fn from_wire(name: &str) -> Option<Self>;

    /// Field used for the default `-createdAt` order.
    fn created_at() -> Self;

    /// Compare two records ascending on this field. Missing values sort last.
    fn compare(self, a: &Self::Record, b: &Self::Record) -> Ordering;
}

/// Parse a comma-separated sort expression, defaulting to `-createdAt`.
///
/// # Examples
/// ```
/// use bootcamp_directory::domain::{BootcampSortField, SortDirection, parse_sort};
///
/// let keys = parse_sort::<BootcampSortField>(Some("name,-averageCost")).unwrap();
/// assert_eq!(keys[0].field, BootcampSortField::Name);
/// assert_eq!(keys[1].direction, SortDirection::Desc);
/// ```
pub fn parse_sort<F: SortField>(raw: Option<&str>) -> Result<Vec<SortKey<F>>, FieldError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(vec![SortKey {
            field: F::created_at(),
            direction: SortDirection::Desc,
        }]);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (direction, name) = match part.strip_prefix('-') {
                Some(name) => (SortDirection::Desc, name),
                None => (SortDirection::Asc, part),
            };
            F::from_wire(name)
                .map(|field| SortKey { field, direction })
                .ok_or(FieldError::Invalid {
                    field: "sort",
                    reason: "names an unknown field",
                })
        })
        .collect()
}

/// Sort `items` in place by `keys`, falling back to `tiebreak`.
pub fn order_by<F, T>(items: &mut [T], keys: &[SortKey<F>], tiebreak: impl Fn(&T, &T) -> Ordering)
where
    F: SortField<Record = T>,
{
    items.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = key.field.compare(a, b);
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| tiebreak(a, b))
    });
}

fn cmp_nullable<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sortable bootcamp fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootcampSortField {
    CreatedAt,
    Name,
    AverageCost,
    AverageRating,
}

impl SortField for BootcampSortField {
    type Record = Bootcamp;

    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "averageCost" => Some(Self::AverageCost),
            "averageRating" => Some(Self::AverageRating),
            _ => None,
        }
    }

    fn created_at() -> Self {
        Self::CreatedAt
    }

    fn compare(self, a: &Bootcamp, b: &Bootcamp) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Name => a.name.cmp(&b.name),
            Self::AverageCost => cmp_nullable(a.average_cost, b.average_cost),
            Self::AverageRating => cmp_nullable(a.average_rating, b.average_rating),
        }
    }
}

/// Sortable course fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSortField {
    CreatedAt,
    Title,
    Tuition,
    MinimumSkill,
}

impl SortField for CourseSortField {
    type Record = Course;

    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            "tuition" => Some(Self::Tuition),
            "minimumSkill" => Some(Self::MinimumSkill),
            _ => None,
        }
    }

    fn created_at() -> Self {
        Self::CreatedAt
    }

    fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Title => a.title.cmp(&b.title),
            Self::Tuition => a.tuition.cmp(&b.tuition),
            Self::MinimumSkill => a.minimum_skill.cmp(&b.minimum_skill),
        }
    }
}

/// Sortable review fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSortField {
    CreatedAt,
    Title,
    Rating,
}

impl SortField for ReviewSortField {
    type Record = Review;

    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    fn created_at() -> Self {
        Self::CreatedAt
    }

    fn compare(self, a: &Review, b: &Review) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Title => a.title.cmp(&b.title),
            Self::Rating => a.rating.cmp(&b.rating),
        }
    }
}

/// Sortable account fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    CreatedAt,
    Name,
    Email,
}

impl SortField for UserSortField {
    type Record = User;

    fn from_wire(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    fn created_at() -> Self {
        Self::CreatedAt
    }

    fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Name => a.name.as_ref().cmp(b.name.as_ref()),
            Self::Email => a.email.as_ref().cmp(b.email.as_ref()),
        }
    }
}

/// Typed bootcamp filters. Every present field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootcampFilter {
    pub career: Option<Career>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
    pub average_cost_lte: Option<u32>,
    pub average_cost_gte: Option<u32>,
    pub average_rating_gte: Option<f64>,
    pub city: Option<String>,
}

impl BootcampFilter {
    /// Whether `bootcamp` satisfies every present criterion.
    pub fn matches(&self, bootcamp: &Bootcamp) -> bool {
        let flag = |wanted: Option<bool>, actual: bool| wanted.is_none_or(|wanted| wanted == actual);
        self.career.is_none_or(|career| bootcamp.careers.contains(&career))
            && flag(self.housing, bootcamp.housing)
            && flag(self.job_assistance, bootcamp.job_assistance)
            && flag(self.job_guarantee, bootcamp.job_guarantee)
            && flag(self.accept_gi, bootcamp.accept_gi)
            && self
                .average_cost_lte
                .is_none_or(|max| bootcamp.average_cost.is_some_and(|cost| cost <= max))
            && self
                .average_cost_gte
                .is_none_or(|min| bootcamp.average_cost.is_some_and(|cost| cost >= min))
            && self
                .average_rating_gte
                .is_none_or(|min| bootcamp.average_rating.is_some_and(|rating| rating >= min))
            && self
                .city
                .as_deref()
                .is_none_or(|city| bootcamp.location.city.eq_ignore_ascii_case(city))
    }
}

/// Typed course filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub minimum_skill: Option<MinimumSkill>,
    pub tuition_lte: Option<u32>,
    pub tuition_gte: Option<u32>,
}

impl CourseFilter {
    /// Whether `course` satisfies every present criterion.
    pub fn matches(&self, course: &Course) -> bool {
        self.minimum_skill.is_none_or(|skill| course.minimum_skill == skill)
            && self.tuition_lte.is_none_or(|max| course.tuition <= max)
            && self.tuition_gte.is_none_or(|min| course.tuition >= min)
    }
}

/// Page window, sort keys and filter for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F, Q> {
    pub page: PageRequest,
    pub sort: Vec<SortKey<F>>,
    pub filter: Q,
}

impl<F: SortField, Q: Default> Default for ListQuery<F, Q> {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            sort: vec![SortKey {
                field: F::created_at(),
                direction: SortDirection::Desc,
            }],
            filter: Q::default(),
        }
    }
}

/// Bootcamp listing request.
pub type BootcampListQuery = ListQuery<BootcampSortField, BootcampFilter>;
/// Course listing request.
pub type CourseListQuery = ListQuery<CourseSortField, CourseFilter>;
/// Review listing request.
pub type ReviewListQuery = ListQuery<ReviewSortField, ()>;
/// Account listing request.
pub type UserListQuery = ListQuery<UserSortField, ()>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BootcampId, CourseDraft, CourseId, UserId};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    #[rstest]
    fn default_sort_is_newest_first() {
        let keys = parse_sort::<CourseSortField>(None).expect("default sort");
        assert_eq!(
            keys,
            vec![SortKey {
                field: CourseSortField::CreatedAt,
                direction: SortDirection::Desc
            }]
        );
    }

    #[rstest]
    #[case("price")]
    #[case("name,-bogus")]
    fn unknown_sort_fields_are_rejected(#[case] raw: &str) {
        let err = parse_sort::<BootcampSortField>(Some(raw)).expect_err("unknown field");
        assert_eq!(err.field(), "sort");
    }

    fn course(title: &str, tuition: u32, age_minutes: i64) -> Course {
        Course::create(
            CourseId::random(),
            BootcampId::random(),
            UserId::random(),
            CourseDraft {
                title: title.into(),
                description: "d".into(),
                weeks: "4".into(),
                tuition,
                minimum_skill: MinimumSkill::Beginner,
                scholarship_available: false,
            },
            Utc::now() - Duration::minutes(age_minutes),
        )
    }

    #[rstest]
    fn order_by_applies_keys_in_sequence() {
        let mut courses = vec![course("b", 100, 1), course("a", 200, 2), course("c", 100, 3)];
        let keys = parse_sort::<CourseSortField>(Some("tuition,-title")).expect("valid sort");

        order_by(&mut courses, &keys, |a, b| a.id.cmp(&b.id));

        let titles: Vec<_> = courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }

    #[rstest]
    fn missing_values_sort_last_ascending() {
        assert_eq!(cmp_nullable(Some(1), None), Ordering::Less);
        assert_eq!(cmp_nullable::<u32>(None, None), Ordering::Equal);
    }

    #[rstest]
    fn course_filter_bounds_tuition() {
        let filter = CourseFilter {
            tuition_gte: Some(150),
            tuition_lte: Some(250),
            ..CourseFilter::default()
        };
        assert!(filter.matches(&course("a", 200, 0)));
        assert!(!filter.matches(&course("b", 100, 0)));
    }
}
