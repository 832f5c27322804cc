#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use bugtracker_api::config::ServerConfig;
use bugtracker_api::router::build_app_router;
use bugtracker_api::state::AppState;

/// Multipart boundary used by [`MultipartBody`].
pub const BOUNDARY: &str = "----bugtracker-test-boundary";

/// Build a test `ServerConfig` whose upload and report directories live
/// inside `root`.
pub fn test_config(root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: root.join("uploads"),
        report_dir: root.join("reports"),
        max_upload_bytes: 1024 * 1024,
    }
}

/// A router plus the temporary directory backing its file storage.
///
/// The directory is removed when the `TestApp` is dropped.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    _dir: TempDir,
}

impl TestApp {
    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir.clone()
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.config.audit_log_path()
    }
}

/// Build the full application router with the production middleware stack.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {}).await
}

/// Like [`build_test_app`], letting the caller tweak the config first.
pub async fn build_test_app_with(pool: PgPool, tweak: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(dir.path());
    tweak(&mut config);
    config
        .ensure_storage_dirs()
        .await
        .expect("storage dirs should be created");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    let router = build_app_router(state, &config);

    TestApp {
        router,
        config,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw_json(app, uri, body.to_string()).await
}

pub async fn post_raw_json(app: &TestApp, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: &TestApp, uri: &str, body: MultipartBody) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body.finish()))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

/// Minimal `multipart/form-data` encoder.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// A complete, valid submission form.
pub fn valid_form() -> MultipartBody {
    form_with(&[])
}

/// A valid submission form with some fields replaced (`Some`) or removed
/// (`None`).
pub fn form_with(overrides: &[(&str, Option<&str>)]) -> MultipartBody {
    let fields = [
        ("name", "Jane Doe"),
        ("email", "jane.doe@iworkscorp.com"),
        ("role", "Engineer"),
        ("browser", "Firefox"),
        ("type", "Bug"),
        ("description", "The save button does nothing"),
    ];
    let mut body = MultipartBody::new();
    for (name, default) in fields {
        let value = match overrides.iter().find(|(n, _)| *n == name) {
            Some((_, v)) => *v,
            None => Some(default),
        };
        if let Some(v) = value {
            body = body.text(name, v);
        }
    }
    body
}
