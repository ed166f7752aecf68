//! Pagination normalization for list endpoints.
//!
//! Out-of-range values are clamped rather than rejected: a page of zero or a
//! page size of zero is a caller convenience, not a contract violation.

use serde::Deserialize;

/// Default page when the caller supplies none (or an invalid one).
pub const DEFAULT_PAGE: i32 = 1;
/// Default page size when the caller supplies none (or an invalid one).
pub const DEFAULT_PAGE_SIZE: i32 = 10;
/// Upper bound on page size; larger requests fall back to the default.
pub const MAX_PAGE_SIZE: i32 = 100;

/// Raw pagination parameters as they arrive on the wire.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageRequest {
    /// Requested page, 1-based.
    #[serde(default)]
    pub page: i32,
    /// Requested page size.
    #[serde(default)]
    pub page_size: i32,
}

impl PageRequest {
    /// Clamp to valid bounds: `page <= 0` becomes 1, `page_size <= 0` or
    /// `> 100` becomes 10.
    #[must_use]
    pub const fn normalized(self) -> (i32, i32) {
        let page = if self.page <= 0 { DEFAULT_PAGE } else { self.page };
        let page_size = if self.page_size <= 0 || self.page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        (page, page_size)
    }

    /// Row offset for the normalized page.
    #[must_use]
    pub const fn offset(self) -> i64 {
        let (page, page_size) = self.normalized();
        ((page - 1) as i64) * (page_size as i64)
    }
}
