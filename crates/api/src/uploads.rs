//! Screenshot storage on the local filesystem.

use std::path::{Path, PathBuf};

use bugtracker_core::types::Timestamp;
use bugtracker_core::upload::stored_filename;
use tokio::io::AsyncWriteExt;

/// Write `data` into `dir` under a freshly generated unique name.
///
/// Never overwrites an existing file.
pub async fn store_screenshot(
    dir: &Path,
    original_name: Option<&str>,
    data: &[u8],
    now: Timestamp,
) -> std::io::Result<PathBuf> {
    let path = dir.join(stored_filename(original_name, now));

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(path)
}

/// Remove a stored screenshot whose report was never persisted.
pub async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned screenshot");
    }
}
