//! Query-string parameters for listing endpoints.
//!
//! ```text
//! GET /api/v1/bootcamps?careers=Business&averageCost[lte]=10000&sort=-averageRating&page=2&limit=10
//! ```
//!
//! Filters use `field[op]` keys. `select=name,description` narrows each
//! listed item to the named fields plus `id`.

use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::IntoParams;

use crate::domain::{
    BootcampFilter, BootcampListQuery, Career, CourseFilter, CourseListQuery, Error, ListQuery,
    MinimumSkill, SortField, parse_sort,
};

fn window(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::from_optional(page, limit).map_err(|error| {
        let field = match error {
            PageRequestError::PageOutOfRange => "page",
            PageRequestError::LimitOutOfRange { .. } => "limit",
        };
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": field, "code": "out_of_range" }))
    })
}

fn list_query<F: SortField, Q>(
    page: Option<u32>,
    limit: Option<u32>,
    sort: Option<&str>,
    filter: Q,
) -> Result<ListQuery<F, Q>, Error> {
    Ok(ListQuery {
        page: window(page, limit)?,
        sort: parse_sort(sort)?,
        filter,
    })
}

/// Selectable bootcamp fields.
pub const BOOTCAMP_FIELDS: &[&str] = &[
    "user",
    "name",
    "slug",
    "description",
    "website",
    "phone",
    "email",
    "location",
    "careers",
    "housing",
    "jobAssistance",
    "jobGuarantee",
    "acceptGi",
    "averageCost",
    "averageRating",
    "photo",
    "createdAt",
    "courses",
];

/// Selectable course fields.
pub const COURSE_FIELDS: &[&str] = &[
    "title",
    "description",
    "weeks",
    "tuition",
    "minimumSkill",
    "scholarshipAvailable",
    "createdAt",
    "bootcamp",
    "user",
];

/// Selectable review fields.
pub const REVIEW_FIELDS: &[&str] = &["title", "text", "rating", "createdAt", "bootcamp", "user"];

/// Selectable account fields.
pub const USER_FIELDS: &[&str] = &["name", "email", "role", "createdAt"];

/// Field projection requested through `select`.
///
/// Names are separated by commas or spaces. Unknown names are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Option<Vec<String>>,
}

impl Projection {
    /// Parse `raw` against the resource's selectable `known` fields.
    pub fn parse(raw: Option<&str>, known: &[&str]) -> Result<Self, Error> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        let mut fields: Vec<String> = Vec::new();
        for name in raw.split([',', ' ']).map(str::trim).filter(|name| !name.is_empty()) {
            if !known.contains(&name) {
                return Err(Error::invalid_request(format!("cannot select unknown field {name}"))
                    .with_details(json!({ "field": "select", "code": "unknown_field" })));
            }
            if !fields.iter().any(|field| field == name) {
                fields.push(name.to_owned());
            }
        }
        if fields.is_empty() {
            return Err(Error::invalid_request("select must name at least one field")
                .with_details(json!({ "field": "select", "code": "missing" })));
        }
        Ok(Self {
            fields: Some(fields),
        })
    }

    /// Narrow every item of `page`.
    pub fn apply<T: Serialize>(&self, page: Page<T>) -> Result<Page<Value>, Error> {
        let Page {
            items,
            total,
            request,
        } = page;
        let items = items
            .into_iter()
            .map(|item| self.project(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            request,
        })
    }

    fn project<T: Serialize>(&self, item: T) -> Result<Value, Error> {
        let value =
            serde_json::to_value(item).map_err(|error| Error::internal(error.to_string()))?;
        match (&self.fields, value) {
            (Some(fields), Value::Object(mut object)) => {
                object.retain(|key, _| key == "id" || fields.iter().any(|field| field == key));
                Ok(Value::Object(object))
            }
            (_, value) => Ok(value),
        }
    }
}

/// Paging and sorting only; used by reviews and users.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub limit: Option<u32>,
    /// Comma-separated fields; `-` prefix sorts descending.
    pub sort: Option<String>,
    /// Comma-separated fields to keep on each item.
    pub select: Option<String>,
}

impl ListParams {
    /// Validate into a listing request.
    pub fn into_query<F: SortField>(self) -> Result<ListQuery<F, ()>, Error> {
        list_query(self.page, self.limit, self.sort.as_deref(), ())
    }
}

/// Bootcamp listing parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct BootcampParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub select: Option<String>,
    /// Bootcamps offering this career.
    #[param(value_type = Option<String>)]
    pub careers: Option<Career>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
    #[serde(rename = "averageCost[lte]")]
    pub average_cost_lte: Option<u32>,
    #[serde(rename = "averageCost[gte]")]
    pub average_cost_gte: Option<u32>,
    #[serde(rename = "averageRating[gte]")]
    pub average_rating_gte: Option<f64>,
    /// Case-insensitive city match.
    pub city: Option<String>,
}

impl BootcampParams {
    /// Validate into a listing request.
    pub fn into_query(self) -> Result<BootcampListQuery, Error> {
        let filter = BootcampFilter {
            career: self.careers,
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
            average_cost_lte: self.average_cost_lte,
            average_cost_gte: self.average_cost_gte,
            average_rating_gte: self.average_rating_gte,
            city: self.city.map(|city| city.trim().to_owned()).filter(|city| !city.is_empty()),
        };
        list_query(self.page, self.limit, self.sort.as_deref(), filter)
    }
}

/// Course listing parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CourseParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub select: Option<String>,
    #[param(value_type = Option<String>)]
    pub minimum_skill: Option<MinimumSkill>,
    #[serde(rename = "tuition[lte]")]
    pub tuition_lte: Option<u32>,
    #[serde(rename = "tuition[gte]")]
    pub tuition_gte: Option<u32>,
}

impl CourseParams {
    /// Validate into a listing request.
    pub fn into_query(self) -> Result<CourseListQuery, Error> {
        let filter = CourseFilter {
            minimum_skill: self.minimum_skill,
            tuition_lte: self.tuition_lte,
            tuition_gte: self.tuition_gte,
        };
        list_query(self.page, self.limit, self.sort.as_deref(), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BootcampSortField, CourseSortField, ErrorCode, SortDirection, SortKey, UserSortField,
    };
    use rstest::rstest;

    fn parse<T: serde::de::DeserializeOwned>(query: &str) -> T {
        actix_web::web::Query::<T>::from_query(query)
            .expect("query parses")
            .into_inner()
    }

    #[rstest]
    fn bootcamp_filters_read_bracketed_keys() {
        let params: BootcampParams = parse(
            "careers=Web%20Development&housing=true&averageCost%5Blte%5D=10000&averageRating%5Bgte%5D=7.5&city=Boston&sort=-averageCost,name&page=2&limit=10",
        );
        let query = params.into_query().expect("valid query");

        assert_eq!(query.filter.career, Some(Career::WebDevelopment));
        assert_eq!(query.filter.housing, Some(true));
        assert_eq!(query.filter.average_cost_lte, Some(10_000));
        assert_eq!(query.filter.average_rating_gte, Some(7.5));
        assert_eq!(query.filter.city.as_deref(), Some("Boston"));
        assert_eq!(query.page, PageRequest::new(2, 10).expect("page"));
        assert_eq!(
            query.sort,
            vec![
                SortKey { field: BootcampSortField::AverageCost, direction: SortDirection::Desc },
                SortKey { field: BootcampSortField::Name, direction: SortDirection::Asc },
            ]
        );
    }

    #[rstest]
    fn course_filters_read_skill_and_tuition() {
        let params: CourseParams =
            parse("minimumSkill=advanced&tuition%5Bgte%5D=5000&select=title");
        let query = params.into_query().expect("valid query");

        assert_eq!(query.filter.minimum_skill, Some(MinimumSkill::Advanced));
        assert_eq!(query.filter.tuition_gte, Some(5000));
        assert_eq!(query.sort[0].field, CourseSortField::CreatedAt);
    }

    #[rstest]
    fn selection_keeps_the_id_and_named_fields() {
        let projection =
            Projection::parse(Some("name, housing"), BOOTCAMP_FIELDS).expect("known fields");
        let page = Page {
            items: vec![json!({"id": "b1", "name": "Devworks", "housing": true, "photo": "x.jpg"})],
            total: 1,
            request: PageRequest::default(),
        };

        let narrowed = projection.apply(page).expect("projection");

        assert_eq!(narrowed.items, vec![json!({"id": "b1", "name": "Devworks", "housing": true})]);
    }

    #[rstest]
    fn absent_selection_keeps_every_field() {
        let item = json!({"id": "c1", "title": "Front End", "tuition": 8000});
        let page = Page {
            items: vec![item.clone()],
            total: 1,
            request: PageRequest::default(),
        };

        let untouched = Projection::parse(None, COURSE_FIELDS)
            .expect("no selection")
            .apply(page)
            .expect("projection");

        assert_eq!(untouched.items, vec![item]);
    }

    #[rstest]
    #[case::unknown("name,password")]
    #[case::empty(" , ")]
    fn bad_selections_are_rejected(#[case] raw: &str) {
        let error = Projection::parse(Some(raw), USER_FIELDS).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.details().and_then(|d| d["field"].as_str()), Some("select"));
    }

    #[rstest]
    #[case("page=0", "page")]
    #[case("limit=0", "limit")]
    #[case("limit=101", "limit")]
    fn out_of_range_windows_are_rejected(#[case] raw: &str, #[case] field: &str) {
        let error = parse::<ListParams>(raw)
            .into_query::<UserSortField>()
            .expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.details().and_then(|d| d["field"].as_str()), Some(field));
    }

    #[rstest]
    fn unknown_sort_fields_are_rejected() {
        let error = parse::<ListParams>("sort=password")
            .into_query::<UserSortField>()
            .expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
