//! HTTP mapping for domain errors

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) | DomainError::Duplicate => StatusCode::BAD_REQUEST,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::GatewayUnavailable
            | DomainError::Database(_)
            | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed, client-safe message; internal detail stays in the logs
    pub fn public_message(&self) -> String {
        match self {
            DomainError::Validation(msg) => msg.clone(),
            DomainError::Duplicate => "Book already saved".to_string(),
            DomainError::NotFound => "Not found".to_string(),
            DomainError::Unauthorized => "Invalid credentials".to_string(),
            DomainError::GatewayUnavailable => "Failed to fetch results".to_string(),
            DomainError::Database(_) => "Database error".to_string(),
            DomainError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// Bad request bodies surface as `{error}` like any other input error
impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::Validation(rejection.body_text())
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        if let DomainError::Database(_) | DomainError::Internal(_) = &self {
            tracing::error!("{}", self);
        }

        (
            self.status_code(),
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            DomainError::Validation("Query is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DomainError::Duplicate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DomainError::GatewayUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DomainError::Database("disk I/O error".into()).public_message(),
            "Database error"
        );
    }
}
