//! Pagination for every list-returning query.
//!
//! Convention: `(offset, limit) -> (items, total_count, has_more,
//! next_offset)`. The limit is silently capped at [`MAX_PAGE_LIMIT`];
//! `limit == 0` is the count-only form, returning an empty page with an
//! accurate total so existence/size checks stay cheap.

use serde::{Deserialize, Serialize};

/// Hard cap on page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub has_more: bool,
    pub next_offset: u64,
}

impl<T> Page<T> {
    /// Build a page from the full ordered result set.
    ///
    /// `total` is the size of the underlying collection; `items` must be
    /// the slice starting at `offset` after the (capped) limit was applied.
    pub fn new(items: Vec<T>, total: u64, offset: u64) -> Self {
        let end = offset.saturating_add(items.len() as u64);
        Self {
            has_more: end < total,
            next_offset: end,
            total_count: total,
            items,
        }
    }

    /// An empty count-only page.
    pub fn count_only(total: u64, offset: u64) -> Self {
        Self {
            items: Vec::new(),
            total_count: total,
            has_more: offset < total,
            next_offset: offset,
        }
    }
}

/// Apply the page-size cap. Zero stays zero (count-only).
pub fn clamp_limit(limit: u32) -> u32 {
    limit.min(MAX_PAGE_LIMIT)
}

/// Slice an in-memory ordered collection into a page.
pub fn paginate<T: Clone>(all: &[T], offset: u64, limit: u32) -> Page<T> {
    let total = all.len() as u64;
    let limit = clamp_limit(limit);
    if limit == 0 {
        return Page::count_only(total, offset);
    }
    let start = offset.min(total) as usize;
    let end = (offset.saturating_add(limit as u64)).min(total) as usize;
    Page::new(all[start..end].to_vec(), total, offset)
}
