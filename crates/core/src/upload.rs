//! Stored filenames for uploaded screenshots.

use crate::types::Timestamp;

/// Fallback used when nothing usable survives sanitisation.
pub const DEFAULT_UPLOAD_NAME: &str = "screenshot";

/// Reduce a client-supplied filename to a safe single path component.
///
/// Keeps the last `/` or `\` separated segment, drops `..` sequences, and
/// replaces anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(original: &str) -> String {
    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .replace("..", "");

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        DEFAULT_UPLOAD_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build a unique stored filename: `<epoch-millis>_<8 hex>_<sanitised name>`.
pub fn stored_filename(original: Option<&str>, now: Timestamp) -> String {
    let clean = sanitize_filename(original.unwrap_or(DEFAULT_UPLOAD_NAME));
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", now.timestamp_millis(), &nonce[..8], clean)
}
