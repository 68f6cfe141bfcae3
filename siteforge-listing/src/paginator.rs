//! Row-window math for paginated listings.

use crate::error::{ListingError, ListingResult};

/// The resolved page window for one listing call.
///
/// Page numbers are 1-based. Requests below page 1 are coerced to 1;
/// requests past the last page produce an empty window rather than an
/// error, since a stale total from a concurrent write is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_number: u64,
    page_size: u64,
    total: u64,
}

impl PageWindow {
    /// Computes the window. A zero page size is a configuration error.
    pub fn new(total: u64, page_size: u64, requested_page: u64) -> ListingResult<Self> {
        if page_size == 0 {
            return Err(ListingError::Config("page size must be at least 1".into()));
        }
        Ok(Self {
            page_number: requested_page.max(1),
            page_size,
            total,
        })
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Total pages; 0 when there are no rows.
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(self.page_size)
    }

    /// First row of the window (0-based).
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Rows available in the window; 0 when the page is past the end.
    pub fn limit(&self) -> u64 {
        if self.offset() >= self.total {
            0
        } else {
            self.page_size.min(self.total - self.offset())
        }
    }

    /// True when the window holds no rows.
    pub fn is_empty(&self) -> bool {
        self.limit() == 0
    }
}
