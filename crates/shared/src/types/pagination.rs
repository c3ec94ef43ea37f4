//! Pagination types for the document list endpoint.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_per_page", rename = "perPage")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// The current pagination state: page size, page number, and the record
/// counts derived from the active predicate set.
///
/// Navigation is clamped: moving past either end is a no-op, and a requested
/// page beyond the last page snaps back to the last page once the counts are
/// known. The window must be reset to page 1 whenever any filter field
/// changes, otherwise a narrower filter could leave the window pointing past
/// the end of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    per_page: u64,
    page: u64,
    total_records: u64,
    total_filtered: u64,
}

impl PageWindow {
    /// Creates a window from request parameters. Zero values are lifted to 1
    /// so the offset math stays well-defined.
    #[must_use]
    pub fn new(request: &PageRequest) -> Self {
        Self {
            per_page: request.per_page.max(1),
            page: request.page.max(1),
            total_records: 0,
            total_filtered: 0,
        }
    }

    /// Records the unfiltered and filtered counts for the current render
    /// cycle, clamping the page number to the last available page.
    pub fn set_counts(&mut self, total_records: u64, total_filtered: u64) {
        self.total_records = total_records;
        self.total_filtered = total_filtered;
        self.page = self.page.min(self.total_pages());
    }

    /// Current page number (1-indexed).
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Count of all records in the view, ignoring filters.
    #[must_use]
    pub const fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Count of records matching the active predicate set.
    #[must_use]
    pub const fn total_filtered(&self) -> u64 {
        self.total_filtered
    }

    /// Total number of pages; at least 1 even when nothing matches.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_filtered.div_ceil(self.per_page).max(1)
    }

    /// Offset of the current page for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    /// Limit of the current page for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }

    /// Whether a page exists after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page * self.per_page < self.total_filtered
    }

    /// Whether a page exists before the current one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Advances to the next page; a no-op on the last page.
    pub fn next_page(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    /// Moves back to the previous page; a no-op on the first page.
    pub fn previous_page(&mut self) {
        if self.has_previous() {
            self.page -= 1;
        }
    }

    /// Resets to page 1. Must be called when any filter field changes.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// 1-based index of the first visible record, `None` when nothing
    /// matches.
    #[must_use]
    pub const fn from_record(&self) -> Option<u64> {
        if self.total_filtered == 0 {
            None
        } else {
            Some((self.page - 1) * self.per_page + 1)
        }
    }

    /// 1-based index of the last visible record, `None` when nothing
    /// matches.
    #[must_use]
    pub fn to_record(&self) -> Option<u64> {
        if self.total_filtered == 0 {
            None
        } else {
            Some((self.page * self.per_page).min(self.total_filtered))
        }
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total number of records in the view, ignoring filters.
    pub total_records: u64,
    /// Total number of records matching the active filters.
    pub total_filtered: u64,
    /// 1-based index of the first visible record.
    pub from_record: Option<u64>,
    /// 1-based index of the last visible record.
    pub to_record: Option<u64>,
    /// Total number of pages.
    pub total_pages: u64,
}

impl From<&PageWindow> for PageMeta {
    fn from(window: &PageWindow) -> Self {
        Self {
            page: window.page(),
            per_page: window.per_page(),
            total_records: window.total_records(),
            total_filtered: window.total_filtered(),
            from_record: window.from_record(),
            to_record: window.to_record(),
            total_pages: window.total_pages(),
        }
    }
}

impl<T> PageResponse<T> {
    /// Creates a paginated response from the fetched page and its window.
    #[must_use]
    pub fn new(data: Vec<T>, window: &PageWindow) -> Self {
        Self {
            data,
            meta: PageMeta::from(window),
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
