use crate::auth::{Claims, create_jwt, hash_password, verify_password};
use crate::domain::{DomainError, User};
use crate::infrastructure::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    token: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing field, or username/email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let Json(payload) = payload?;
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(DomainError::Validation(
            "Username, email and password are required".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password).map_err(DomainError::Internal)?;
    let user = state.user_repo.create(username, email, password_hash).await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful! Please login." })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, DomainError> {
    let Json(payload) = payload?;
    tracing::info!("Login attempt for user: {}", payload.username);

    let Some(credentials) = state.user_repo.find_by_username(&payload.username).await? else {
        tracing::warn!("User not found: {}", payload.username);
        return Err(DomainError::Unauthorized);
    };

    match verify_password(&payload.password, &credentials.password_hash) {
        Ok(true) => {
            let user = credentials.user;
            tracing::info!("Password verified successfully for user: {}", user.username);
            let token = create_jwt(user.id, &user.username).map_err(DomainError::Internal)?;
            Ok(Json(LoginResponse { token }))
        }
        _ => {
            tracing::warn!("Password verification failed for user: {}", payload.username);
            Err(DomainError::Unauthorized)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<User>, DomainError> {
    state
        .user_repo
        .find_by_id(claims.uid)
        .await?
        .map(Json)
        .ok_or(DomainError::Unauthorized)
}
