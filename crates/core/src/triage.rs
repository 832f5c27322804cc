//! Resolve / unresolve / logical-delete transitions for bulk admin updates.
//!
//! Transition rules:
//! - resolve: sets resolver and description; `resolved_at` only moves on the
//!   unresolved -> resolved edge
//! - unresolve: clears all resolution fields unconditionally
//! - delete: only allowed when the report is resolved after the step above;
//!   one-way, with the original `deleted_at` kept on repeats

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length for the resolver identity.
pub const MAX_RESOLVED_BY_LENGTH: usize = 100;

/// Maximum length for the resolution description.
pub const MAX_RESOLUTION_DESCRIPTION_LENGTH: usize = 1_000;

/// The mutable triage columns of a bug report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageState {
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolution_description: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub deleted: bool,
    pub deleted_at: Option<Timestamp>,
}

/// One requested change from a bulk update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageChange {
    pub resolved: bool,
    pub deleted: bool,
    pub resolved_by: Option<String>,
    pub resolution_description: Option<String>,
}

/// Check free-text lengths on a change before it is applied.
pub fn validate_change(id: DbId, change: &TriageChange) -> Result<(), CoreError> {
    if let Some(by) = &change.resolved_by {
        if by.chars().count() > MAX_RESOLVED_BY_LENGTH {
            return Err(CoreError::Validation(format!(
                "resolvedBy for issue {id} exceeds {MAX_RESOLVED_BY_LENGTH} characters"
            )));
        }
    }
    if let Some(desc) = &change.resolution_description {
        if desc.chars().count() > MAX_RESOLUTION_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "resolutionDescription for issue {id} exceeds \
                 {MAX_RESOLUTION_DESCRIPTION_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Compute the state that results from applying `change` to `current`.
///
/// Returns [`CoreError::BusinessRule`] when deletion is requested for a
/// report that would not be resolved.
pub fn apply_change(
    id: DbId,
    current: &TriageState,
    change: &TriageChange,
    now: Timestamp,
) -> Result<TriageState, CoreError> {
    validate_change(id, change)?;

    let mut next = current.clone();

    if change.resolved {
        next.resolved = true;
        next.resolved_by = change.resolved_by.clone();
        next.resolution_description = change.resolution_description.clone();
        if !current.resolved {
            next.resolved_at = Some(now);
        }
    } else {
        next.resolved = false;
        next.resolved_by = None;
        next.resolution_description = None;
        next.resolved_at = None;
    }

    if change.deleted {
        if !next.resolved {
            return Err(CoreError::BusinessRule(format!(
                "Issue {id} must be resolved before it can be deleted"
            )));
        }
        if !current.deleted {
            next.deleted = true;
            next.deleted_at = Some(now);
        }
    }

    Ok(next)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
