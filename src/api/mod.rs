pub mod auth;
pub mod error;
pub mod health;
pub mod saved_books;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Catalog
        .route("/search", post(search::search_books))
        .route("/searches", get(search::list_searches))
        .route("/editions", get(search::list_editions))
        // Saved collection
        .route(
            "/saved-books",
            get(saved_books::list_saved_books)
                .post(saved_books::save_book)
                .delete(saved_books::remove_saved_book),
        )
        .with_state(state)
}
