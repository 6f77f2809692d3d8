//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP mapping lives at the API edge (`crate::api::error`).

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Caller input rejected before any side effect
    Validation(String),
    /// The (user, work) pair is already saved
    Duplicate,
    /// Catalog request failed, timed out, or returned an unusable body
    GatewayUnavailable,
    /// Missing or invalid credentials
    Unauthorized,
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Duplicate => write!(f, "Book already saved"),
            DomainError::GatewayUnavailable => write!(f, "Catalog gateway unavailable"),
            DomainError::Unauthorized => write!(f, "Unauthorized"),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
