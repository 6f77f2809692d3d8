use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

/// Round-trips a trivial query to confirm the store is reachable
pub async fn ping(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "SELECT 1".to_owned(),
    ))
    .await
    .map(|_| ())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create book_searches table (audit trail, no uniqueness)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS book_searches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            search_query TEXT NOT NULL,
            search_type TEXT NOT NULL,
            searched_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_book_searches_user ON book_searches(user_id, searched_at)"
            .to_owned(),
    ))
    .await?;

    // Create saved_books table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS saved_books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            work_key TEXT NOT NULL,
            title TEXT NOT NULL,
            author_display TEXT NOT NULL,
            primary_author_key TEXT,
            publisher_display TEXT NOT NULL,
            first_publish_year INTEGER,
            primary_isbn TEXT,
            edition_count INTEGER NOT NULL DEFAULT 0,
            ebook_access TEXT NOT NULL DEFAULT 'no_ebook',
            cover_url TEXT,
            saved_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    // One save per (user, work); closes the check-then-insert race
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_saved_books_user_work ON saved_books(user_id, work_key)"
            .to_owned(),
    ))
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        run_migrations(&db).await.expect("Second run should succeed");
        ping(&db).await.expect("Ping should succeed");
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_pair() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let backend = db.get_database_backend();

        db.execute(Statement::from_string(
            backend,
            "INSERT INTO users (username, email, password_hash, created_at) VALUES ('u', 'u@x.test', 'h', '2024-01-01T00:00:00Z')"
                .to_owned(),
        ))
        .await
        .expect("user insert");

        let insert = "INSERT INTO saved_books (user_id, work_key, title, author_display, publisher_display, saved_at) VALUES (1, '/works/OL1W', 't', 'a', 'p', '2024-01-01T00:00:00Z')";
        db.execute(Statement::from_string(backend, insert.to_owned()))
            .await
            .expect("first insert");
        let second = db
            .execute(Statement::from_string(backend, insert.to_owned()))
            .await;
        assert!(second.is_err(), "Duplicate (user_id, work_key) must be rejected");
    }
}
