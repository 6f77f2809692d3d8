use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::CanonicalBook;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "saved_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub work_key: String,
    pub title: String,
    pub author_display: String,
    pub primary_author_key: Option<String>,
    pub publisher_display: String,
    pub first_publish_year: Option<i32>,
    pub primary_isbn: Option<String>,
    pub edition_count: i32,
    pub ebook_access: String,
    pub cover_url: Option<String>,
    pub saved_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SavedBook {
    pub id: i32,
    pub user_id: i32,
    #[serde(flatten)]
    pub book: CanonicalBook,
    pub saved_at: String,
}

impl From<Model> for SavedBook {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            book: CanonicalBook {
                work_key: model.work_key,
                title: model.title,
                author_display: model.author_display,
                primary_author_key: model.primary_author_key,
                publisher_display: model.publisher_display,
                first_publish_year: model.first_publish_year,
                primary_isbn: model.primary_isbn,
                edition_count: model.edition_count,
                ebook_access: model.ebook_access,
                cover_url: model.cover_url,
            },
            saved_at: model.saved_at,
        }
    }
}

impl ActiveModel {
    /// Builds an insertable row; the book is stored exactly as given.
    pub fn from_book(user_id: i32, book: CanonicalBook, saved_at: String) -> Self {
        Self {
            user_id: Set(user_id),
            work_key: Set(book.work_key),
            title: Set(book.title),
            author_display: Set(book.author_display),
            primary_author_key: Set(book.primary_author_key),
            publisher_display: Set(book.publisher_display),
            first_publish_year: Set(book.first_publish_year),
            primary_isbn: Set(book.primary_isbn),
            edition_count: Set(book.edition_count),
            ebook_access: Set(book.ebook_access),
            cover_url: Set(book.cover_url),
            saved_at: Set(saved_at),
            ..Default::default()
        }
    }
}
