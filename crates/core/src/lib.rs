//! Domain logic for the bug tracker: validation, filtering, pagination,
//! triage transitions and CSV encoding. No I/O lives here.

pub mod bug_report;
pub mod csv;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod triage;
pub mod types;
pub mod upload;
