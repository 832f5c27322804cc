//! Bug report submission rules.
//!
//! Defines the accepted issue types, field bounds, the corporate email
//! domain, and the validation applied to every public submission before it
//! reaches the database.

use chrono::NaiveDateTime;
use validator::Validate;

use crate::error::CoreError;
use crate::types::LocalTimestamp;

// ---------------------------------------------------------------------------
// Issue types
// ---------------------------------------------------------------------------

pub const TYPE_BUG: &str = "Bug";
pub const TYPE_FEATURE_REQUEST: &str = "Feature Request";
pub const TYPE_COMMENT: &str = "Comment";

/// All valid issue types, in canonical spelling.
pub const VALID_TYPES: &[&str] = &[TYPE_BUG, TYPE_FEATURE_REQUEST, TYPE_COMMENT];

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Every submitter must use an address under this domain.
pub const CORPORATE_EMAIL_DOMAIN: &str = "@iworkscorp.com";

/// Column widths of the submission fields, enforced by [`Submission`].
pub const MAX_NAME_LENGTH: u64 = 100;
pub const MAX_EMAIL_LENGTH: u64 = 150;
pub const MAX_ROLE_LENGTH: u64 = 100;
pub const MAX_BROWSER_LENGTH: u64 = 50;
pub const MAX_TYPE_LENGTH: u64 = 50;
pub const MAX_DESCRIPTION_LENGTH: u64 = 255;

/// Message returned when the email is outside the corporate domain.
pub const DOMAIN_REJECTION_MESSAGE: &str = "Email must be an @iworkscorp.com address.";

/// Formats accepted for the optional `datetime` field, most specific first.
const EVENT_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// The text fields of a public submission, already trimmed.
#[derive(Debug, Clone, Validate)]
pub struct Submission {
    #[validate(length(
        min = 1,
        max = MAX_NAME_LENGTH,
        message = "name is required (max 100 characters)"
    ))]
    pub name: String,
    #[validate(
        email(message = "email must be a valid address"),
        length(
            min = 1,
            max = MAX_EMAIL_LENGTH,
            message = "email is required (max 150 characters)"
        )
    )]
    pub email: String,
    #[validate(length(
        min = 1,
        max = MAX_ROLE_LENGTH,
        message = "role is required (max 100 characters)"
    ))]
    pub role: String,
    #[validate(length(
        min = 1,
        max = MAX_BROWSER_LENGTH,
        message = "browser is required (max 50 characters)"
    ))]
    pub browser: String,
    #[validate(length(
        min = 1,
        max = MAX_TYPE_LENGTH,
        message = "type is required (max 50 characters)"
    ))]
    pub issue_type: String,
    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LENGTH,
        message = "description is required (max 255 characters)"
    ))]
    pub description: String,
}

/// Validate a submission and return the canonical spelling of its type.
///
/// Field bounds are checked first, then the corporate domain, then the type
/// enumeration.
pub fn validate_submission(submission: &Submission) -> Result<&'static str, CoreError> {
    if let Err(errors) = submission.validate() {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        return Err(CoreError::Validation(messages.join("; ")));
    }

    if !has_corporate_domain(&submission.email) {
        return Err(CoreError::Validation(DOMAIN_REJECTION_MESSAGE.to_string()));
    }

    canonical_issue_type(&submission.issue_type).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid issue type '{}'. Must be one of: {:?}",
            submission.issue_type, VALID_TYPES
        ))
    })
}

/// Case-insensitive check that `email` ends with the corporate domain.
pub fn has_corporate_domain(email: &str) -> bool {
    email.to_lowercase().ends_with(CORPORATE_EMAIL_DOMAIN)
}

/// Match `raw` against the known types ignoring case and surrounding space.
pub fn canonical_issue_type(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    VALID_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
}

/// Parse the optional user-supplied event time.
///
/// Unparsable input yields `None`; the submission still goes through.
pub fn parse_event_time(raw: Option<&str>) -> Option<LocalTimestamp> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
    EVENT_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
