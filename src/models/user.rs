use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_search::Entity")]
    Searches,
    #[sea_orm(has_many = "super::saved_book::Entity")]
    SavedBooks,
}

impl Related<super::book_search::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Searches.def()
    }
}

impl Related<super::saved_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
