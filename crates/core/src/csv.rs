//! CSV cell encoding shared by the intake audit log and the admin export.

use chrono::SecondsFormat;

use crate::types::{LocalTimestamp, Timestamp};

/// Characters that make spreadsheet applications evaluate a cell.
pub const FORMULA_TRIGGERS: &[char] = &['=', '+', '-', '@'];

/// Prefix that forces a spreadsheet to treat a cell as text.
pub const FORMULA_NEUTRALIZER: char = '\'';

/// Wrap `value` in quotes, doubling any internal quotes.
pub fn quote_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Like [`quote_cell`], but neutralises leading formula characters.
pub fn guarded_cell(value: &str) -> String {
    if value.starts_with(FORMULA_TRIGGERS) {
        quote_cell(&format!("{FORMULA_NEUTRALIZER}{value}"))
    } else {
        quote_cell(value)
    }
}

/// Join already-encoded cells into one CSV line (no trailing newline).
pub fn join_row<I>(cells: I) -> String
where
    I: IntoIterator<Item = String>,
{
    cells.into_iter().collect::<Vec<_>>().join(",")
}

/// Server timestamps are written as RFC 3339 UTC with second precision.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// User-reported times carry no zone and are written as local ISO.
///
/// Fractional seconds are kept when present.
pub fn format_local(ts: &LocalTimestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
