//! Admin filter normalisation.
//!
//! Raw query-string values are lenient: anything unrecognised degrades to
//! "no filter" instead of failing the request. The resulting [`AdminFilter`]
//! is shared by the paginated search and the CSV export so both see exactly
//! the same rows.

use chrono::NaiveDate;

use crate::bug_report::canonical_issue_type;
use crate::types::Timestamp;

/// Normalised filter over bug reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminFilter {
    /// Canonical issue type, or `None` for all types.
    pub issue_type: Option<&'static str>,
    /// `Some(true)` resolved only, `Some(false)` unresolved only.
    pub resolved: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<Timestamp>,
    /// When false, rows with `deleted = true` are hidden.
    pub include_deleted: bool,
}

impl AdminFilter {
    /// Build a filter from raw query-string values.
    pub fn from_query(
        issue_type: Option<&str>,
        resolved: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        view_deleted: Option<&str>,
    ) -> Self {
        Self {
            issue_type: normalize_type_filter(issue_type),
            resolved: parse_resolved_filter(resolved),
            created_from: parse_date(from_date).and_then(start_of_day),
            created_to: parse_date(to_date).and_then(end_of_day),
            include_deleted: parse_flag(view_deleted),
        }
    }
}

/// `All`, empty, absent, or unknown types mean no type filter.
pub fn normalize_type_filter(raw: Option<&str>) -> Option<&'static str> {
    raw.and_then(canonical_issue_type)
}

/// Parse the `resolved` query value.
///
/// - `true` / `resolved` -> `Some(true)`
/// - `false` / `unresolved` -> `Some(false)`
/// - anything else, including `all` -> `None`
pub fn parse_resolved_filter(raw: Option<&str>) -> Option<bool> {
    let value = raw?.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "resolved" => Some(true),
        "false" | "unresolved" => Some(false),
        _ => None,
    }
}

/// Values that turn a flag on, compared case-insensitively.
const TRUE_FLAGS: &[&str] = &["true", "1", "yes", "on"];

/// Parse a boolean query flag. Anything not in `TRUE_FLAGS` is off.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| {
        let v = v.trim();
        TRUE_FLAGS.iter().any(|t| t.eq_ignore_ascii_case(v))
    })
}

/// Parse an ISO `YYYY-MM-DD` date, ignoring malformed input.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> Option<Timestamp> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Last representable microsecond of `date` in UTC (PostgreSQL precision).
pub fn end_of_day(date: NaiveDate) -> Option<Timestamp> {
    date.and_hms_micro_opt(23, 59, 59, 999_999)
        .map(|dt| dt.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
