//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::SavedBook;
use crate::services::{CanonicalBook, SearchField};

/// Account data for API responses (never carries the password hash)
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Account plus stored credential, only handed to the login path
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; a taken username or email is a validation error
    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<User, DomainError>;

    /// Look up a user and stored hash by username
    async fn find_by_username(&self, username: &str)
    -> Result<Option<UserCredentials>, DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
}

/// One recorded search invocation
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct SearchLogEntry {
    pub id: i32,
    pub user_id: i32,
    pub search_query: String,
    pub search_type: String,
    pub searched_at: String,
}

/// Append-only audit trail of searches
#[async_trait]
pub trait SearchLogRepository: Send + Sync {
    /// Record a search; no uniqueness constraint
    async fn append(
        &self,
        user_id: i32,
        query: &str,
        field: SearchField,
    ) -> Result<SearchLogEntry, DomainError>;

    /// Most recent searches for a user, newest first
    async fn recent(&self, user_id: i32, limit: u64) -> Result<Vec<SearchLogEntry>, DomainError>;
}

/// Repository trait for a user's saved collection
#[async_trait]
pub trait SavedBookRepository: Send + Sync {
    /// Persist a book for a user.
    ///
    /// Fails with `DomainError::Duplicate` when the user already saved the same work,
    /// whether caught by the existence check or by the storage-level unique index.
    async fn save(&self, user_id: i32, book: CanonicalBook) -> Result<SavedBook, DomainError>;

    /// All saved books for a user, most recently saved first
    async fn list(&self, user_id: i32) -> Result<Vec<SavedBook>, DomainError>;

    /// Delete one saved work belonging to the user
    async fn remove(&self, user_id: i32, work_key: &str) -> Result<(), DomainError>;
}
