//! Route definitions for the public submission form.

use axum::routing::post;
use axum::Router;

use crate::handlers::bug_reports;
use crate::state::AppState;

/// ```text
/// POST   /bug-report        -> submit_bug_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bug-report", post(bug_reports::submit_bug_report))
}
