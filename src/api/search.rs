use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::auth::Claims;
use crate::domain::{DomainError, SearchLogEntry};
use crate::infrastructure::AppState;
use crate::services::{self, CanonicalBook, EditionSummary, SearchField};

const MAX_LIMIT: u32 = 100;
const DEFAULT_HISTORY_LIMIT: u64 = 20;

#[derive(Debug, Deserialize, Clone, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: Option<String>,
    /// `q`/`general`, `title` or `author`
    pub search_type: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub count: u64,
    pub books: Vec<CanonicalBook>,
}

#[utoipa::path(
    post,
    path = "/api/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Normalized catalog results", body = SearchResponse),
        (status = 400, description = "Query is required"),
        (status = 500, description = "Failed to fetch results")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, DomainError> {
    let Json(params) = payload?;
    let query = params.query.unwrap_or_default();
    let field: SearchField = params.search_type.as_deref().unwrap_or("q").parse()?;
    let limit = params
        .limit
        .unwrap_or(state.search_limit)
        .clamp(1, MAX_LIMIT);

    let outcome = services::search_books(
        state.search_log_repo.as_ref(),
        state.catalog.as_ref(),
        claims.uid,
        &query,
        field,
        limit,
    )
    .await?;

    Ok(Json(SearchResponse {
        success: true,
        count: outcome.count,
        books: outcome.books,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/searches",
    responses(
        (status = 200, description = "Caller's recent searches, newest first", body = [SearchLogEntry])
    )
)]
pub async fn list_searches(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<SearchLogEntry>>, DomainError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_LIMIT as u64);
    let entries = state.search_log_repo.recent(claims.uid, limit).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct EditionsQuery {
    pub work_key: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EditionsResponse {
    pub editions: Vec<EditionSummary>,
}

#[utoipa::path(
    get,
    path = "/api/editions",
    responses(
        (status = 200, description = "Editions of a work", body = EditionsResponse),
        (status = 400, description = "work_key is required"),
        (status = 500, description = "Failed to fetch results")
    )
)]
pub async fn list_editions(
    State(state): State<AppState>,
    _claims: Claims,
    Query(params): Query<EditionsQuery>,
) -> Result<Json<EditionsResponse>, DomainError> {
    let work_key = params.work_key.unwrap_or_default();
    let limit = params
        .limit
        .unwrap_or(crate::openlibrary::DEFAULT_EDITION_LIMIT)
        .clamp(1, MAX_LIMIT);

    let editions = services::list_editions(state.catalog.as_ref(), &work_key, limit).await?;
    Ok(Json(EditionsResponse { editions }))
}
