//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{is_unique_violation, now_timestamp};
use crate::domain::{DomainError, User, UserCredentials, UserRepository};
use crate::models::user::{ActiveModel, Column, Entity as UserEntity, Model};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<User, DomainError> {
        if UserEntity::find()
            .filter(Column::Username.eq(&username))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(DomainError::Validation("Username already exists".to_string()));
        }

        if UserEntity::find()
            .filter(Column::Email.eq(&email))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(DomainError::Validation("Email already registered".to_string()));
        }

        let user = ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        match user.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(e) if is_unique_violation(&e) => Err(DomainError::Validation(
                "Username or email already registered".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let user = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user.map(|model| {
            let password_hash = model.password_hash.clone();
            UserCredentials {
                user: User::from(model),
                password_hash,
            }
        }))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    async fn repo() -> SeaOrmUserRepository {
        SeaOrmUserRepository::new(init_db("sqlite::memory:").await.expect("Failed to init db"))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let user = repo
            .create("reader".into(), "reader@example.test".into(), "hash".into())
            .await
            .expect("create");

        let creds = repo
            .find_by_username("reader")
            .await
            .unwrap()
            .expect("should exist");
        assert_eq!(creds.user.id, user.id);
        assert_eq!(creds.password_hash, "hash");
        assert_eq!(repo.find_by_id(user.id).await.unwrap().unwrap().email, user.email);
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let repo = repo().await;
        repo.create("reader".into(), "reader@example.test".into(), "h".into())
            .await
            .expect("create");

        match repo
            .create("reader".into(), "other@example.test".into(), "h".into())
            .await
        {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("unexpected: {:?}", other),
        }
        match repo
            .create("other".into(), "reader@example.test".into(), "h".into())
            .await
        {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
