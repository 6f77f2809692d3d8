//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{SavedBookRepository, SearchLogRepository, UserRepository};
use crate::infrastructure::{
    SeaOrmSavedBookRepository, SeaOrmSearchLogRepository, SeaOrmUserRepository,
};
use crate::openlibrary::{CatalogGateway, OpenLibraryClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection (health checks)
    db: DatabaseConnection,
    /// User repository
    pub user_repo: Arc<dyn UserRepository>,
    /// Search audit log
    pub search_log_repo: Arc<dyn SearchLogRepository>,
    /// Saved collection
    pub saved_book_repo: Arc<dyn SavedBookRepository>,
    /// Outbound catalog
    pub catalog: Arc<dyn CatalogGateway>,
    /// Default result count for searches
    pub search_limit: u32,
}

impl AppState {
    /// Create a new AppState with all repositories and the OpenLibrary client
    pub fn new(db: DatabaseConnection, config: &Config) -> Result<Self, String> {
        let catalog = OpenLibraryClient::new(
            &config.openlibrary_base_url,
            &config.openlibrary_covers_url,
            config.catalog_timeout,
        )?;

        Ok(Self::with_catalog(db, Arc::new(catalog), config.search_limit))
    }

    /// Create an AppState around an existing gateway
    pub fn with_catalog(
        db: DatabaseConnection,
        catalog: Arc<dyn CatalogGateway>,
        search_limit: u32,
    ) -> Self {
        Self {
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            search_log_repo: Arc::new(SeaOrmSearchLogRepository::new(db.clone())),
            saved_book_repo: Arc::new(SeaOrmSavedBookRepository::new(db.clone())),
            catalog,
            search_limit,
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

