//! Cursor-based pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Common pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Cursor from a previous response.
    pub cursor: Option<String>,
    /// Number of items per page (default 50, max 500).
    pub count: Option<u32>,
}

impl PaginationParams {
    /// Resolve the effective page size, clamped to `[1, MAX_PAGE_SIZE]`.
    pub fn effective_count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Decode the cursor to an offset. An absent or malformed cursor starts
    /// from the beginning.
    pub fn offset(&self) -> usize {
        self.cursor
            .as_deref()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0)
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Cursor for the next page, or `None` on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Slice one page out of the full result set and produce the next cursor.
pub fn paginate<T>(items: Vec<T>, params: &PaginationParams) -> (Vec<T>, PaginationMeta) {
    let offset = params.offset();
    let page_size = params.effective_count() as usize;

    let total = items.len();
    let page: Vec<T> = items.into_iter().skip(offset).take(page_size).collect();

    let next_offset = offset + page.len();
    let cursor = if next_offset < total {
        Some(next_offset.to_string())
    } else {
        None
    };
    (page, PaginationMeta { cursor })
}
