use crate::types::DbId;

/// Domain-level error classification.
///
/// Each variant maps to exactly one class of outward signal at the HTTP
/// boundary (missing entity, bad input, unauthorized).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
