//! Page/size policy for the admin listing.

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided 0-based page index to non-negative.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(0).max(0)
}

/// Clamp a user-provided page size to `[1, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(size: Option<i64>) -> i64 {
    size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Row offset of the first item on `page`.
pub fn page_offset(page: i64, size: i64) -> i64 {
    page.saturating_mul(size)
}

/// Number of pages needed for `total` rows.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        return 0;
    }
    (total + size - 1) / size
}
