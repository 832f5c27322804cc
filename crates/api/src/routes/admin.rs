//! Route definitions for the admin triage screen.
//!
//! Mounted at `/admin` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin_issues;
use crate::state::AppState;

/// ```text
/// GET    /issues                -> list_issues
/// POST   /issues/bulk-update    -> bulk_update_issues
/// GET    /issues/export         -> export_issues
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/issues", get(admin_issues::list_issues))
        .route("/issues/bulk-update", post(admin_issues::bulk_update_issues))
        .route("/issues/export", get(admin_issues::export_issues))
}
