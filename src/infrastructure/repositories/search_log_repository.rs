//! SeaORM implementation of SearchLogRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::{is_foreign_key_violation, now_timestamp};
use crate::domain::{DomainError, SearchLogEntry, SearchLogRepository};
use crate::models::book_search::{ActiveModel, Column, Entity as BookSearchEntity, Model};
use crate::services::SearchField;

pub struct SeaOrmSearchLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmSearchLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for SearchLogEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            search_query: model.search_query,
            search_type: model.search_type,
            searched_at: model.searched_at,
        }
    }
}

#[async_trait]
impl SearchLogRepository for SeaOrmSearchLogRepository {
    async fn append(
        &self,
        user_id: i32,
        query: &str,
        field: SearchField,
    ) -> Result<SearchLogEntry, DomainError> {
        let entry = ActiveModel {
            user_id: Set(user_id),
            search_query: Set(query.to_string()),
            search_type: Set(field.as_str().to_string()),
            searched_at: Set(now_timestamp()),
            ..Default::default()
        };

        match entry.insert(&self.db).await {
            Ok(model) => Ok(SearchLogEntry::from(model)),
            Err(e) if is_foreign_key_violation(&e) => {
                tracing::warn!("Rejected search log for unknown user {}", user_id);
                Err(DomainError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn recent(&self, user_id: i32, limit: u64) -> Result<Vec<SearchLogEntry>, DomainError> {
        let rows = BookSearchEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::SearchedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(SearchLogEntry::from).collect())
    }
}
