//! Pagination types for file tables and list operations.
//!
//! Two styles exist side by side: 1-based page-index paging for the file
//! table of a selected version, and offset-token paging for version and
//! execution listings.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Number of pages needed to show `total_items`, never less than one.
pub fn page_count(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Request parameters for page-index pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request. A zero page size is rejected.
    pub fn new(page: u64, page_size: u64) -> Result<Self, AppError> {
        if page_size == 0 {
            return Err(AppError::validation("Page size must be at least 1"));
        }
        Ok(Self {
            page: page.max(1),
            page_size,
        })
    }

    /// Clamp the page index into `1..=page_count(total_items)`.
    pub fn clamped(&self, total_items: u64) -> Self {
        let last = page_count(total_items, self.page_size);
        Self {
            page: self.page.clamp(1, last),
            page_size: self.page_size,
        }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Effective page number (1-based) after clamping.
    pub page: u64,
    /// Page number the caller asked for.
    pub requested_page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages (at least one).
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T: Clone> PageResponse<T> {
    /// Slice one page out of `items`, clamping the requested page index.
    pub fn from_slice(items: &[T], request: PageRequest) -> Self {
        let total_items = items.len() as u64;
        let effective = request.clamped(total_items);
        let start = (effective.offset() as usize).min(items.len());
        let end = (start + effective.page_size as usize).min(items.len());
        let total_pages = page_count(total_items, effective.page_size);
        Self {
            items: items[start..end].to_vec(),
            page: effective.page,
            requested_page: request.page,
            page_size: effective.page_size,
            total_items,
            total_pages,
            has_next: effective.page < total_pages,
            has_previous: effective.page > 1,
        }
    }

    /// Whether the requested page index had to be clamped.
    pub fn was_clamped(&self) -> bool {
        self.page != self.requested_page
    }
}

/// Request parameters for offset-token pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Opaque token returned by a previous page; an item offset.
    #[serde(default)]
    pub starting_token: Option<String>,
    /// Maximum items to return.
    #[serde(default)]
    pub max_items: Option<u64>,
}

impl TokenRequest {
    /// Offset encoded in the starting token. Unparsable tokens start from zero.
    pub fn start_index(&self) -> usize {
        self.starting_token
            .as_deref()
            .and_then(|t| t.parse::<usize>().ok())
            .unwrap_or(0)
    }

    /// Item limit, defaulting to and capped at `max`.
    pub fn limit(&self, max: u64) -> usize {
        self.max_items.unwrap_or(max).clamp(1, max.max(1)) as usize
    }
}

/// One page of an offset-token listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Token for the next page, absent on the last page.
    pub next_token: Option<String>,
}

impl<T> TokenPage<T> {
    /// Cut a page out of `items` according to `request`.
    pub fn from_vec(mut items: Vec<T>, request: &TokenRequest, max: u64) -> Self {
        let start = request.start_index().min(items.len());
        let end = start.saturating_add(request.limit(max)).min(items.len());
        let next_token = (end < items.len()).then(|| end.to_string());
        items.truncate(end);
        let items = items.split_off(start);
        Self { items, next_token }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
