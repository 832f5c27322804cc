use std::path::PathBuf;

use crate::audit_log::AUDIT_LOG_FILENAME;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory receiving uploaded screenshots (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Directory holding the append-only CSV audit log (default: `reports`).
    pub report_dir: PathBuf,
    /// Maximum request body size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `REPORT_DIR`           | `reports`                  |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let report_dir =
            PathBuf::from(std::env::var("REPORT_DIR").unwrap_or_else(|_| "reports".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            report_dir,
            max_upload_bytes,
        }
    }

    /// Full path of the CSV audit log.
    pub fn audit_log_path(&self) -> PathBuf {
        self.report_dir.join(AUDIT_LOG_FILENAME)
    }

    /// Create the upload and report directories if they do not exist.
    pub async fn ensure_storage_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.report_dir).await
    }
}
