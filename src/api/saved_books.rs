use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::SavedBook;
use crate::services::CanonicalBook;

#[derive(Serialize, utoipa::ToSchema)]
pub struct SavedBooksResponse {
    pub books: Vec<SavedBook>,
    pub total: usize,
}

#[utoipa::path(
    post,
    path = "/api/saved-books",
    request_body = CanonicalBook,
    responses(
        (status = 201, description = "Book saved"),
        (status = 400, description = "Book already saved, or work_key missing")
    )
)]
pub async fn save_book(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<CanonicalBook>, JsonRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let Json(book) = payload?;
    let saved = state.saved_book_repo.save(claims.uid, book).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Book saved successfully",
            "book": saved
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/saved-books",
    responses(
        (status = 200, description = "Caller's saved books, most recent first", body = SavedBooksResponse)
    )
)]
pub async fn list_saved_books(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<SavedBooksResponse>, DomainError> {
    let books = state.saved_book_repo.list(claims.uid).await?;

    Ok(Json(SavedBooksResponse {
        total: books.len(),
        books,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub work_key: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/api/saved-books",
    responses(
        (status = 200, description = "Saved book removed"),
        (status = 404, description = "Not in the caller's collection")
    )
)]
pub async fn remove_saved_book(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<RemoveQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let work_key = params
        .work_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| DomainError::Validation("work_key is required".to_string()))?;

    state.saved_book_repo.remove(claims.uid, &work_key).await?;

    Ok(Json(json!({ "success": true })))
}
