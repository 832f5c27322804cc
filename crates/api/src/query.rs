//! Query parameter types for the admin endpoints.

use bugtracker_core::filter::AdminFilter;
use serde::Deserialize;

/// Query string of `GET /api/admin/issues` and its CSV export.
///
/// Filter values stay raw strings so unrecognised input can degrade to
/// "no filter" in [`AdminFilter::from_query`]. `page`/`size` are only read
/// by the paginated listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIssueParams {
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub resolved: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub view_deleted: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl AdminIssueParams {
    /// The normalised filter described by these parameters.
    pub fn filter(&self) -> AdminFilter {
        AdminFilter::from_query(
            self.issue_type.as_deref(),
            self.resolved.as_deref(),
            self.from_date.as_deref(),
            self.to_date.as_deref(),
            self.view_deleted.as_deref(),
        )
    }
}
