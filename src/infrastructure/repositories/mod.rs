//! Repository implementations using SeaORM

pub mod saved_book_repository;
pub mod search_log_repository;
pub mod user_repository;

pub use saved_book_repository::SeaOrmSavedBookRepository;
pub use search_log_repository::SeaOrmSearchLogRepository;
pub use user_repository::SeaOrmUserRepository;

use chrono::{SecondsFormat, Utc};
use sea_orm::{DbErr, SqlErr};

/// RFC 3339 UTC with fixed microsecond precision so stored values sort lexically
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// The row references a user that no longer exists
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
