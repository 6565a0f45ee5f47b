//! Page request and envelope primitives shared by list endpoints.
//!
//! Listing endpoints accept 1-based `page`/`per_page` query parameters and
//! return a [`PageEnvelope`] wrapping the items together with totals. The
//! types here own the clamping and offset arithmetic so adapters never
//! hand-roll it.

use serde::{Deserialize, Serialize};

/// Hard ceiling on `per_page`; larger requests are clamped, not rejected.
pub const MAX_PER_PAGE: u32 = 100;

/// A validated, 1-based page request.
///
/// Out-of-range inputs are clamped: `page` has a floor of 1, `per_page` a
/// floor of 1 and a ceiling of [`MAX_PER_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request from optional query inputs, falling back to page 1
    /// and the supplied default page size.
    #[must_use]
    pub fn from_query(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    /// The 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset for the backing query.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Row limit for the backing query.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// A page of items plus the totals clients need to render pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
    /// The 1-based page number that was served.
    pub page: u32,
    /// Page size that was served.
    pub per_page: u32,
    /// Total page count for `total` at `per_page`.
    pub total_pages: u32,
}

impl<T> PageEnvelope<T> {
    /// Wrap a page of items with totals derived from the originating request.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let per_page = u64::from(request.per_page());
        let total_pages = total.div_ceil(per_page).try_into().unwrap_or(u32::MAX);
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
            total_pages,
        }
    }

    /// Map the item type while keeping the envelope metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> PageEnvelope<U>
    where
        F: FnMut(T) -> U,
    {
        PageEnvelope {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
