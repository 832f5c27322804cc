use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A request that is well-formed but breaks a triage rule, such as
    /// deleting a report that is not resolved.
    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
