//! Page-window primitives shared by list endpoints.
//!
//! A [`PageRequest`] captures the one-based `page` and `limit` a client asked
//! for. Once the total number of matching records is known, [`PageLinks`]
//! describes whether a previous or next window exists so handlers can echo
//! them back in the response envelope.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageLinks, PageRequest};
//!
//! let request = PageRequest::new(2, 10)?;
//! assert_eq!(request.offset(), 10);
//!
//! let links = PageLinks::for_window(request, 35);
//! assert_eq!(links.next.map(|page| page.page), Some(3));
//! assert_eq!(links.prev.map(|page| page.page), Some(1));
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

use serde::{Deserialize, Serialize};

/// Page used when the client does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Window size used when the client does not supply one.
pub const DEFAULT_LIMIT: u32 = 25;
/// Largest window a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures for page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are one-based.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The limit must be within `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Upper bound accepted for `limit`.
        max: u32,
    },
}

/// Validated one-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional query values, applying defaults.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`PageRequest::new`].
    pub fn from_optional(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_LIMIT),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of records in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records preceding the window.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Exclusive end index of the window.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.page as u64 * self.limit as u64
    }
}

/// Reference to a neighbouring window, serialised as `{ "page", "limit" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// One-based page number.
    pub page: u32,
    /// Window size.
    pub limit: u32,
}

/// Links to the windows either side of the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Following window, present while records remain past this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    /// Preceding window, present for every page after the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl PageLinks {
    /// Compute neighbour links for `request` given `total` matching records.
    #[must_use]
    pub const fn for_window(request: PageRequest, total: u64) -> Self {
        let next = if request.end() < total {
            Some(PageRef {
                page: request.page + 1,
                limit: request.limit,
            })
        } else {
            None
        };
        let prev = if request.offset() > 0 {
            Some(PageRef {
                page: request.page - 1,
                limit: request.limit,
            })
        } else {
            None
        };
        Self { next, prev }
    }
}

/// One window of records plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records inside the window.
    pub items: Vec<T>,
    /// Number of records matching the query across every window.
    pub total: u64,
    /// Window that produced `items`.
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Neighbour links for this window.
    #[must_use]
    pub const fn links(&self) -> PageLinks {
        PageLinks::for_window(self.request, self.total)
    }

    /// Transform every record, keeping window metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
