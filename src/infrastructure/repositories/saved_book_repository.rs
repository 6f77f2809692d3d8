//! SeaORM implementation of SavedBookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::{is_foreign_key_violation, is_unique_violation, now_timestamp};
use crate::domain::{DomainError, SavedBookRepository};
use crate::models::SavedBook;
use crate::models::saved_book::{ActiveModel, Column, Entity as SavedBookEntity};
use crate::services::CanonicalBook;

/// SeaORM-based implementation of SavedBookRepository
pub struct SeaOrmSavedBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmSavedBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn exists(&self, user_id: i32, work_key: &str) -> Result<bool, DomainError> {
        let existing = SavedBookEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::WorkKey.eq(work_key))
            .one(&self.db)
            .await?;
        Ok(existing.is_some())
    }

    /// Insert without the existence check; the unique index is the last word.
    async fn insert(&self, user_id: i32, book: CanonicalBook) -> Result<SavedBook, DomainError> {
        let row = ActiveModel::from_book(user_id, book, now_timestamp());

        match row.insert(&self.db).await {
            Ok(model) => Ok(SavedBook::from(model)),
            Err(e) if is_unique_violation(&e) => Err(DomainError::Duplicate),
            Err(e) if is_foreign_key_violation(&e) => {
                tracing::warn!("Rejected save for unknown user {}", user_id);
                Err(DomainError::Unauthorized)
            }
            Err(e) => {
                tracing::error!("Failed to save book for user {}: {}", user_id, e);
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl SavedBookRepository for SeaOrmSavedBookRepository {
    async fn save(&self, user_id: i32, mut book: CanonicalBook) -> Result<SavedBook, DomainError> {
        book.work_key = book.work_key.trim().to_string();
        if !book.is_persistable() {
            return Err(DomainError::Validation("work_key is required".to_string()));
        }

        if self.exists(user_id, &book.work_key).await? {
            tracing::warn!("User {} already saved {}", user_id, book.work_key);
            return Err(DomainError::Duplicate);
        }

        let saved = self.insert(user_id, book).await?;
        tracing::info!("User {} saved {}", user_id, saved.book.work_key);
        Ok(saved)
    }

    async fn list(&self, user_id: i32) -> Result<Vec<SavedBook>, DomainError> {
        let rows = SavedBookEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::SavedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(SavedBook::from).collect())
    }

    async fn remove(&self, user_id: i32, work_key: &str) -> Result<(), DomainError> {
        let work_key = work_key.trim();
        let result = SavedBookEntity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::WorkKey.eq(work_key))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::info!("User {} removed {}", user_id, work_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::user;
    use sea_orm::{PaginatorTrait, Set};

    async fn setup() -> (DatabaseConnection, SeaOrmSavedBookRepository) {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        for id in [7, 8] {
            user::ActiveModel {
                id: Set(id),
                username: Set(format!("reader{id}")),
                email: Set(format!("reader{id}@example.test")),
                password_hash: Set("hash".to_string()),
                created_at: Set(now_timestamp()),
            }
            .insert(&db)
            .await
            .expect("Failed to create user");
        }
        let repo = SeaOrmSavedBookRepository::new(db.clone());
        (db, repo)
    }

    fn dune() -> CanonicalBook {
        CanonicalBook {
            work_key: "/works/OL123W".to_string(),
            title: "Dune".to_string(),
            author_display: "Frank Herbert".to_string(),
            primary_author_key: Some("OL79034A".to_string()),
            publisher_display: "Chilton Books, Ace, Hodder".to_string(),
            first_publish_year: Some(1965),
            primary_isbn: Some("9780441013593".to_string()),
            edition_count: 0,
            ebook_access: "no_ebook".to_string(),
            cover_url: Some("https://covers.openlibrary.org/b/id/258027-M.jpg".to_string()),
        }
    }

    async fn row_count(db: &DatabaseConnection) -> u64 {
        SavedBookEntity::find().count(db).await.expect("count")
    }

    #[tokio::test]
    async fn test_save_twice_is_rejected() {
        let (db, repo) = setup().await;

        repo.save(7, dune()).await.expect("First save should succeed");
        let second = repo.save(7, dune()).await;

        assert!(matches!(second, Err(DomainError::Duplicate)));
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_unique_index_maps_to_duplicate() {
        let (db, repo) = setup().await;

        repo.insert(7, dune()).await.expect("first insert");
        // Simulates a racing request that passed the existence check
        let raced = repo.insert(7, dune()).await;

        assert!(matches!(raced, Err(DomainError::Duplicate)));
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_same_work_for_different_users() {
        let (db, repo) = setup().await;

        repo.save(7, dune()).await.expect("user 7");
        repo.save(8, dune()).await.expect("user 8");
        assert_eq!(row_count(&db).await, 2);
        assert_eq!(repo.list(8).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let (_db, repo) = setup().await;

        let saved = repo.save(7, dune()).await.expect("save");
        let listed = repo.list(7).await.expect("list");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], saved);
        assert_eq!(listed[0].book, dune());
        assert_eq!(listed[0].user_id, 7);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_db, repo) = setup().await;

        for key in ["/works/OL1W", "/works/OL2W", "/works/OL3W"] {
            let mut book = dune();
            book.work_key = key.to_string();
            repo.save(7, book).await.expect("save");
        }

        let keys: Vec<String> = repo
            .list(7)
            .await
            .expect("list")
            .into_iter()
            .map(|b| b.book.work_key)
            .collect();
        assert_eq!(keys, vec!["/works/OL3W", "/works/OL2W", "/works/OL1W"]);
    }

    #[tokio::test]
    async fn test_blank_work_key_is_validation_error() {
        let (db, repo) = setup().await;

        let mut book = dune();
        book.work_key = "  ".to_string();
        assert!(matches!(
            repo.save(7, book).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(row_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_remove_only_touches_owner() {
        let (_db, repo) = setup().await;

        repo.save(7, dune()).await.expect("save");
        assert!(matches!(
            repo.remove(8, "/works/OL123W").await,
            Err(DomainError::NotFound)
        ));

        repo.remove(7, "/works/OL123W").await.expect("remove");
        assert!(repo.list(7).await.unwrap().is_empty());
        repo.save(7, dune()).await.expect("can save again after removal");
    }

    #[tokio::test]
    async fn test_padded_work_key_is_stored_trimmed() {
        let (db, repo) = setup().await;

        let mut padded = dune();
        padded.work_key = "  /works/OL123W ".to_string();
        let saved = repo.save(7, padded).await.expect("save");
        assert_eq!(saved.book.work_key, "/works/OL123W");

        assert!(matches!(
            repo.save(7, dune()).await,
            Err(DomainError::Duplicate)
        ));
        assert_eq!(row_count(&db).await, 1);
        repo.remove(7, " /works/OL123W").await.expect("remove");
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let (db, repo) = setup().await;

        assert!(matches!(
            repo.save(99, dune()).await,
            Err(DomainError::Unauthorized)
        ));
        assert_eq!(row_count(&db).await, 0);
    }
}
