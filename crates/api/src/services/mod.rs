//! Admin operations that span more than one repository call.

pub mod bug_report_service;
pub mod export;

pub use bug_report_service::BugReportService;
