//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a connection inside a transaction) as the first
//! argument.

pub mod bug_report_repo;

pub use bug_report_repo::BugReportRepo;
