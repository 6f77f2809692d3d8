use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::db;
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running; reports database reachability")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match db::ping(state.db()).await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "ok",
        "service": "booksearch",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    }))
}
