//! CSV rendering for the admin export.

use bugtracker_core::csv::{format_local, format_timestamp, guarded_cell, join_row};
use bugtracker_core::types::Timestamp;
use bugtracker_db::models::bug_report::BugReport;

/// File name offered to the browser for the export download.
pub const EXPORT_FILENAME: &str = "bug_reports_export.csv";

/// Header row of the admin export.
pub const EXPORT_HEADER: &str = "id,type,name,email,role,browser,description,event_time,\
created_at,resolved,resolved_by,resolution_description,resolved_at,deleted,deleted_at";

/// Render `reports` as a CSV document, header first, one line per report.
///
/// Every cell passes through [`guarded_cell`] so spreadsheet formulas are
/// neutralised.
pub fn render_export_csv(reports: &[BugReport]) -> String {
    let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + reports.len() * 160);
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    for report in reports {
        out.push_str(&export_row(report));
        out.push('\n');
    }
    out
}

fn export_row(report: &BugReport) -> String {
    let ts = |t: &Option<Timestamp>| t.as_ref().map(format_timestamp).unwrap_or_default();
    let opt = |s: &Option<String>| s.clone().unwrap_or_default();

    let cells = [
        report.id.to_string(),
        report.issue_type.clone(),
        report.name.clone(),
        report.email.clone(),
        report.role.clone(),
        report.browser.clone(),
        report.description.clone(),
        report.event_time.as_ref().map(format_local).unwrap_or_default(),
        format_timestamp(&report.created_at),
        report.resolved.to_string(),
        opt(&report.resolved_by),
        opt(&report.resolution_description),
        ts(&report.resolved_at),
        report.deleted.to_string(),
        ts(&report.deleted_at),
    ];

    join_row(cells.iter().map(|c| guarded_cell(c)))
}
