pub mod admin;
pub mod bug_reports;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST   /bug-report                    public submission form
/// GET    /admin/issues                  paginated search
/// POST   /admin/issues/bulk-update      transactional triage
/// GET    /admin/issues/export           CSV download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(bug_reports::router())
        .nest("/admin", admin::router())
}
