//! Handler for the public bug report form.
//!
//! The form is posted as `multipart/form-data`. Text fields are trimmed and
//! validated before anything touches disk; the optional screenshot is
//! stored before the row is inserted and removed again if the insert fails.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use bugtracker_core::bug_report::{parse_event_time, validate_submission, Submission};
use bugtracker_db::models::bug_report::CreateBugReport;
use bugtracker_db::repositories::BugReportRepo;

use crate::audit_log;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads;

/// Body returned on a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Bug report submitted. Thank you!";

/// Raw form contents as received.
#[derive(Debug, Default)]
struct SubmissionForm {
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
    browser: Option<String>,
    issue_type: Option<String>,
    description: Option<String>,
    datetime: Option<String>,
    screenshot: Option<Screenshot>,
}

#[derive(Debug)]
struct Screenshot {
    file_name: Option<String>,
    data: Vec<u8>,
}

impl SubmissionForm {
    fn submission(&self) -> Submission {
        let field = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        Submission {
            name: field(&self.name),
            email: field(&self.email),
            role: field(&self.role),
            browser: field(&self.browser),
            issue_type: field(&self.issue_type),
            description: field(&self.description),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /bug-report
// ---------------------------------------------------------------------------

/// Accept a bug report submission.
pub async fn submit_bug_report(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_form(multipart).await?;

    let submission = form.submission();
    let issue_type = validate_submission(&submission)?;

    let event_time = parse_event_time(form.datetime.as_deref());
    if event_time.is_none() && form.datetime.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        tracing::debug!(datetime = ?form.datetime, "Ignoring unparsable event time");
    }

    let now = chrono::Utc::now();

    let stored = match form.screenshot.as_ref().filter(|s| !s.data.is_empty()) {
        Some(shot) => Some(
            uploads::store_screenshot(
                &state.config.upload_dir,
                shot.file_name.as_deref(),
                &shot.data,
                now,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store screenshot");
                AppError::Storage("Failed to save screenshot.".to_string())
            })?,
        ),
        None => None,
    };

    let input = CreateBugReport {
        name: submission.name,
        email: submission.email,
        role: submission.role,
        browser: submission.browser,
        issue_type: issue_type.to_string(),
        description: submission.description,
        event_time,
        created_at: now,
        screenshot_path: stored.as_ref().map(|p| p.to_string_lossy().into_owned()),
    };

    let report = match BugReportRepo::create(&state.pool, &input).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(path) = &stored {
                uploads::discard(path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        bug_report_id = report.id,
        issue_type = %report.issue_type,
        has_screenshot = report.screenshot_path.is_some(),
        "Bug report submitted",
    );

    if let Err(e) = audit_log::append(&state.config.audit_log_path(), &report).await {
        tracing::warn!(bug_report_id = report.id, error = %e, "Failed to append to CSV audit log");
    }

    Ok((StatusCode::OK, SUBMITTED_MESSAGE))
}

/// Drain the multipart stream into a [`SubmissionForm`]. Unknown fields are
/// ignored.
async fn read_form(mut multipart: Multipart) -> AppResult<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "screenshot" {
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            form.screenshot = Some(Screenshot {
                file_name,
                data: data.to_vec(),
            });
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "email" => &mut form.email,
            "role" => &mut form.role,
            "browser" => &mut form.browser,
            "type" => &mut form.issue_type,
            "description" => &mut form.description,
            "datetime" => &mut form.datetime,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
