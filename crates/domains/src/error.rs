//! Centralized error taxonomy for FilmSay.
//!
//! Validation and permission failures are detected before any mutation and
//! must never leave partial writes behind; storage failures abort the whole
//! unit of work and surface as `Internal`.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed or missing input (empty text, out-of-range rating,
    /// unknown vote type or role string).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The actor lacks the required role or ownership.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A uniqueness constraint was violated (duplicate movie title,
    /// duplicate registration email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or transaction failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Shorthand for the common "entity X with id N" lookup miss.
    pub fn not_found(entity: &str, id: i64) -> Self {
        DomainError::NotFound(format!("{entity} {id}"))
    }
}

/// A specialized Result type for FilmSay domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
