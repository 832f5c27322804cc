//! HTTP-level integration tests for `POST /api/bug-report`.
//!
//! Submissions go through the real router; persisted rows are checked via
//! the repository layer and stored files via the test's temp directories.

mod common;

use axum::http::StatusCode;
use bugtracker_core::bug_report::DOMAIN_REJECTION_MESSAGE;
use bugtracker_core::filter::AdminFilter;
use bugtracker_db::models::bug_report::BugReport;
use bugtracker_db::repositories::BugReportRepo;
use common::{
    body_json, body_text, build_test_app, form_with, post_multipart, valid_form, MultipartBody,
};
use sqlx::PgPool;

const SUBMIT: &str = "/api/bug-report";

async fn all_reports(pool: &PgPool) -> Vec<BugReport> {
    let filter = AdminFilter {
        include_deleted: true,
        ..AdminFilter::default()
    };
    BugReportRepo::list_all(pool, &filter).await.unwrap()
}

// ---------------------------------------------------------------------------
// Accepted submissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_submission_is_persisted(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let before = chrono::Utc::now();

    let response = post_multipart(&app, SUBMIT, valid_form()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Bug report submitted. Thank you!");

    let rows = all_reports(&pool).await;
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name, "Jane Doe");
    assert_eq!(row.email, "jane.doe@iworkscorp.com");
    assert_eq!(row.issue_type, "Bug");
    assert!(row.created_at >= before - chrono::Duration::seconds(1));
    assert!(!row.resolved);
    assert!(!row.deleted);
    assert!(row.screenshot_path.is_none());
    assert!(row.event_time.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fields_are_trimmed_and_type_is_canonicalised(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[
        ("name", Some("  Jane Doe  ")),
        ("type", Some("feature REQUEST")),
    ]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = all_reports(&pool).await;
    assert_eq!(rows[0].name, "Jane Doe");
    assert_eq!(rows[0].issue_type, "Feature Request");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_domain_check_ignores_case(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("email", Some("Jane.Doe@IWorksCorp.COM"))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(all_reports(&pool).await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_fields_are_ignored(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().text("createdAt", "1999-01-01T00:00:00Z");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = all_reports(&pool).await;
    assert!(rows[0].created_at > chrono::Utc::now() - chrono::Duration::minutes(5));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_time_is_parsed_when_valid(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().text("datetime", "2024-06-01T09:30");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = all_reports(&pool).await;
    let event_time = rows[0].event_time.expect("event time should be stored");
    assert_eq!(event_time.to_string(), "2024-06-01 09:30:00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unparsable_event_time_is_dropped(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().text("datetime", "yesterday afternoon");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(all_reports(&pool).await[0].event_time.is_none());
}

// ---------------------------------------------------------------------------
// Rejected submissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_corporate_email_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("email", Some("jane@gmail.com"))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], DOMAIN_REJECTION_MESSAGE);
    assert!(all_reports(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn look_alike_domain_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("email", Some("jane@iworkscorp.com.evil.io"))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(all_reports(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_field_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("description", None)]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(all_reports(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_field_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("role", Some("   "))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn over_length_description_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let long = "x".repeat(256);
    let form = form_with(&[("description", Some(long.as_str()))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(all_reports(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_type_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("type", Some("Question"))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_multipart_body_is_rejected(pool: PgPool) {
    let app = build_test_app(pool).await;
    let response = common::post_json(&app, SUBMIT, serde_json::json!({"name": "x"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversize_body_is_rejected_with_413(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let big = vec![0u8; app.config.max_upload_bytes + 1024];
    let form = valid_form().file("screenshot", "big.png", &big);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(all_reports(&pool).await.is_empty());
}

// ---------------------------------------------------------------------------
// Screenshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn screenshot_is_stored_under_unique_name(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().file("screenshot", "my shot.png", b"\x89PNG fake");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = all_reports(&pool).await;
    let path = std::path::PathBuf::from(rows[0].screenshot_path.clone().unwrap());
    assert_eq!(path.parent().unwrap(), app.upload_dir());

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.ends_with("_my_shot.png"), "got {file_name}");
    assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG fake");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn screenshot_name_cannot_escape_upload_dir(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().file("screenshot", "../../etc/passwd", b"data");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = all_reports(&pool).await;
    let path = std::path::PathBuf::from(rows[0].screenshot_path.clone().unwrap());
    assert_eq!(path.parent().unwrap(), app.upload_dir());
    assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_passwd"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_screenshot_is_ignored(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = valid_form().file("screenshot", "empty.png", b"");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(all_reports(&pool).await[0].screenshot_path.is_none());
    assert_eq!(std::fs::read_dir(app.upload_dir()).unwrap().count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn screenshot_write_failure_persists_nothing(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    std::fs::remove_dir_all(app.upload_dir()).unwrap();
    let form = valid_form().file("screenshot", "shot.png", b"data");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert_eq!(json["error"], "Failed to save screenshot.");
    assert!(all_reports(&pool).await.is_empty());
}

// ---------------------------------------------------------------------------
// CSV audit log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn audit_log_gets_header_once_and_a_row_per_report(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;

    for _ in 0..2 {
        let response = post_multipart(&app, SUBMIT, valid_form()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let log = std::fs::read_to_string(app.audit_log_path()).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "id,name,email,role,browser,type,description,event_time,created_at,screenshot_path"
    );

    let prefixes: Vec<String> = all_reports(&pool)
        .await
        .iter()
        .map(|r| format!("\"{}\",\"Jane Doe\"", r.id))
        .collect();
    assert!(prefixes.iter().all(|prefix| lines.iter().any(|l| l.starts_with(prefix))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn audit_log_quotes_embedded_quotes(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = form_with(&[("description", Some("clicked \"Save\", nothing"))]);

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let log = std::fs::read_to_string(app.audit_log_path()).unwrap();
    assert!(log.contains("\"clicked \"\"Save\"\", nothing\""));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn audit_log_keeps_fractional_event_time(pool: PgPool) {
    let app = build_test_app(pool).await;
    let form = valid_form().text("datetime", "2024-03-05T14:30:15.250");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let log = std::fs::read_to_string(app.audit_log_path()).unwrap();
    assert!(log.contains("\"2024-03-05T14:30:15.250\""), "got {log}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn audit_log_failure_does_not_fail_submission(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    std::fs::remove_dir_all(&app.config.report_dir).unwrap();

    let response = post_multipart(&app, SUBMIT, valid_form()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(all_reports(&pool).await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn type_match_ignores_case(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let form = MultipartBody::new()
        .text("name", "Ann")
        .text("email", "ann@iworkscorp.com")
        .text("role", "PM")
        .text("browser", "Safari")
        .text("type", "comment")
        .text("description", "Looks good");

    let response = post_multipart(&app, SUBMIT, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(all_reports(&pool).await[0].issue_type, "Comment");
}
