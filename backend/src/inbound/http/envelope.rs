//! Success envelope shared by every endpoint.
//!
//! ```text
//! { "success": true, "count": 2, "pagination": { "next": {...} }, "data": [...] }
//! ```

use actix_web::HttpResponse;
use pagination::{Page, PageLinks};
use serde::Serialize;
use serde_json::json;

/// `{ success: true, ... }` body. Absent members are omitted.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PageLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a single resource.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            token: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Wrap an unpaginated collection, reporting its length.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            ..Self::data(items)
        }
    }

    /// Wrap one window of a paginated collection.
    pub fn page(page: Page<T>) -> Self {
        let links = page.links();
        Self {
            pagination: Some(links),
            ..Self::list(page.items)
        }
    }
}

impl Envelope<()> {
    /// Token-only body returned by the sign-in endpoints.
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            token: Some(token.into()),
            data: None,
        }
    }
}

/// `200 OK` wrapping `data`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::data(data))
}

/// `201 Created` wrapping `data`.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::data(data))
}

/// `200 OK` with `data: {}`, used by deletes and logout.
pub fn empty() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::data(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn single_resources_carry_only_data() {
        let value = serde_json::to_value(Envelope::data(json!({"id": 1}))).expect("json");
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[rstest]
    fn pages_report_count_and_neighbours() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            request: PageRequest::new(2, 2).expect("page"),
        };
        let value = serde_json::to_value(Envelope::page(page)).expect("json");
        assert_eq!(
            value,
            json!({
                "success": true,
                "count": 2,
                "pagination": {
                    "next": {"page": 3, "limit": 2},
                    "prev": {"page": 1, "limit": 2},
                },
                "data": [1, 2],
            })
        );
    }

    #[rstest]
    fn single_page_results_have_empty_pagination() {
        let page = Page {
            items: vec!["a"],
            total: 1,
            request: PageRequest::default(),
        };
        let value = serde_json::to_value(Envelope::page(page)).expect("json");
        assert_eq!(value["pagination"], json!({}));
    }

    #[rstest]
    fn token_bodies_omit_data() {
        let value = serde_json::to_value(Envelope::token("abc")).expect("json");
        assert_eq!(value, json!({"success": true, "token": "abc"}));
    }
}
