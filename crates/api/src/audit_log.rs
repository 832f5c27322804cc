//! Append-only CSV log of every accepted submission.
//!
//! The database row is authoritative; this file is a convenience copy for
//! people who prefer a spreadsheet. Callers treat write failures as
//! non-fatal.

use std::path::Path;

use bugtracker_core::csv::{format_local, format_timestamp, join_row, quote_cell};
use bugtracker_db::models::bug_report::BugReport;
use tokio::io::AsyncWriteExt;

/// File name of the audit log inside the report directory.
pub const AUDIT_LOG_FILENAME: &str = "bug_reports.csv";

/// Header row, written when the file is empty.
pub const AUDIT_LOG_HEADER: &str =
    "id,name,email,role,browser,type,description,event_time,created_at,screenshot_path";

/// Encode one report as an audit log line (no trailing newline).
pub fn audit_row(report: &BugReport) -> String {
    let event_time = report.event_time.as_ref().map(format_local).unwrap_or_default();
    let created_at = format_timestamp(&report.created_at);

    join_row([
        quote_cell(&report.id.to_string()),
        quote_cell(&report.name),
        quote_cell(&report.email),
        quote_cell(&report.role),
        quote_cell(&report.browser),
        quote_cell(&report.issue_type),
        quote_cell(&report.description),
        quote_cell(&event_time),
        quote_cell(&created_at),
        quote_cell(report.screenshot_path.as_deref().unwrap_or_default()),
    ])
}

/// Append `report` to the log at `path`, writing the header into a new or
/// empty file. Header and row go out in a single write.
///
/// The emptiness check is not coordinated with other writers: two
/// submissions racing on an empty file may both emit a header line.
pub async fn append(path: &Path, report: &BugReport) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    let mut buf = String::new();
    if file.metadata().await?.len() == 0 {
        buf.push_str(AUDIT_LOG_HEADER);
        buf.push('\n');
    }
    buf.push_str(&audit_row(report));
    buf.push('\n');

    file.write_all(buf.as_bytes()).await?;
    file.flush().await
}
