//! Bug report entity model and DTOs.
//!
//! The JSON wire format is camelCase to match the admin UI.

use bugtracker_core::triage::{TriageChange, TriageState};
use bugtracker_core::types::{DbId, LocalTimestamp, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bug_reports` table.
///
/// `deleted` is read through `COALESCE(deleted, false)`, so legacy rows with
/// a NULL flag surface as not deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub browser: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub description: String,
    pub event_time: Option<LocalTimestamp>,
    pub created_at: Timestamp,
    pub screenshot_path: Option<String>,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolution_description: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub deleted: bool,
    pub deleted_at: Option<Timestamp>,
}

impl BugReport {
    /// The triage columns of this row.
    pub fn triage_state(&self) -> TriageState {
        TriageState {
            resolved: self.resolved,
            resolved_by: self.resolved_by.clone(),
            resolution_description: self.resolution_description.clone(),
            resolved_at: self.resolved_at,
            deleted: self.deleted,
            deleted_at: self.deleted_at,
        }
    }
}

/// DTO for inserting a new bug report. Built server-side after validation;
/// `created_at` is always the server clock.
#[derive(Debug, Clone)]
pub struct CreateBugReport {
    pub name: String,
    pub email: String,
    pub role: String,
    pub browser: String,
    pub issue_type: String,
    pub description: String,
    pub event_time: Option<LocalTimestamp>,
    pub created_at: Timestamp,
    pub screenshot_path: Option<String>,
}

/// One entry of a bulk admin update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateItem {
    pub id: Option<DbId>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub deleted: bool,
    pub resolved_by: Option<String>,
    pub resolution_description: Option<String>,
}

impl BulkUpdateItem {
    pub fn to_change(&self) -> TriageChange {
        TriageChange {
            resolved: self.resolved,
            deleted: self.deleted,
            resolved_by: self.resolved_by.clone(),
            resolution_description: self.resolution_description.clone(),
        }
    }
}

/// Outcome counts of a committed bulk update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkUpdateSummary {
    pub updated: u64,
    pub skipped: u64,
}

/// One page of the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReportPage {
    pub items: Vec<BugReport>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub total_pages: i64,
}
