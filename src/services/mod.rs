//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.

pub mod catalog_service;

// Re-export for convenience
pub use crate::openlibrary::SearchField;
pub use catalog_service::*;
