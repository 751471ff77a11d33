//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostState;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Store error: {0}")]
    Store(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcomes of a rejected workflow transition.
///
/// None of these are fatal; the caller decides what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Unknown transition: {0}")]
    UnknownTransition(String),

    #[error("Transition requires state '{required}' but post is '{actual}'")]
    InvalidStateTransition {
        actual: PostState,
        required: PostState,
    },

    #[error("Permission denied")]
    PermissionDenied,
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The stored row changed since it was loaded.
    #[error("Write conflict: {0}")]
    Conflict(String),
}
