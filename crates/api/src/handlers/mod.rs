pub mod admin_issues;
pub mod bug_reports;
