//! Handlers for the admin triage screen.
//!
//! Search and export share one filter so the CSV always contains exactly
//! the rows the listing pages through.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use bugtracker_db::models::bug_report::BulkUpdateItem;

use crate::error::{AppError, AppResult};
use crate::query::AdminIssueParams;
use crate::response::DataResponse;
use crate::services::export::{render_export_csv, EXPORT_FILENAME};
use crate::services::BugReportService;
use crate::state::AppState;

fn query_params(
    params: Result<Query<AdminIssueParams>, QueryRejection>,
) -> AppResult<AdminIssueParams> {
    params
        .map(|Query(p)| p)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// ---------------------------------------------------------------------------
// GET /admin/issues
// ---------------------------------------------------------------------------

/// Paginated, filtered listing ordered unresolved first, newest first.
pub async fn list_issues(
    State(state): State<AppState>,
    params: Result<Query<AdminIssueParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = query_params(params)?;
    let page = BugReportService::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// POST /admin/issues/bulk-update
// ---------------------------------------------------------------------------

/// Resolve, unresolve or delete many reports in one transaction.
pub async fn bulk_update_issues(
    State(state): State<AppState>,
    body: Result<Json<Vec<BulkUpdateItem>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(items) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let summary = BugReportService::bulk_update(&state.pool, &items, chrono::Utc::now()).await?;

    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// GET /admin/issues/export
// ---------------------------------------------------------------------------

/// Download every matching report as CSV.
pub async fn export_issues(
    State(state): State<AppState>,
    params: Result<Query<AdminIssueParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = query_params(params)?;
    let reports = BugReportService::export(&state.pool, &params).await?;
    let csv = render_export_csv(&reports);

    tracing::info!(rows = reports.len(), "Bug reports exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    ))
}
