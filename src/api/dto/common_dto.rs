//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SubjectId;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    20
}

/// Slices one page out of `items`.
///
/// `page` is 1-indexed and clamped to at least 1; `per_page` is clamped to
/// `1..=100`.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, PaginationMeta) {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    let start = (page - 1) as usize * per_page as usize;
    let data = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    (
        data,
        PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    )
}

/// Splits a comma-separated id list, dropping blanks.
#[must_use]
pub fn split_subject_ids(raw: Option<&str>) -> Vec<SubjectId> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SubjectId::from)
        .collect()
}

/// Generic `{"status": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Outcome label, e.g. `"accepted"`.
    pub status: String,
}
