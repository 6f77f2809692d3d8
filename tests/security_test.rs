use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use booksearch::api;
use booksearch::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use booksearch::db;
use booksearch::infrastructure::AppState;
use booksearch::openlibrary::OpenLibraryClient;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn router(db: DatabaseConnection) -> Router {
    // Nothing in these tests reaches the catalog
    let client = OpenLibraryClient::new(
        "http://127.0.0.1:1",
        "https://covers.openlibrary.org",
        Duration::from_secs(1),
    )
    .expect("client");
    api::api_router(AppState::with_catalog(db, Arc::new(client), 20))
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
}

#[tokio::test]
async fn test_jwt_creation_and_verification() {
    let token = create_jwt(5, "test_user").expect("Failed to create JWT");
    assert!(!token.is_empty());

    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "test_user");
    assert_eq!(claims.uid, 5);
}

#[tokio::test]
async fn test_login_flow() {
    let db = setup_test_db().await;

    // 1. Create user manually
    let hash = hash_password("reader_password").unwrap();
    booksearch::models::user::ActiveModel {
        username: Set("reader".to_string()),
        email: Set("reader@example.test".to_string()),
        password_hash: Set(hash),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to create user");

    let app = router(db);

    let login = |username: &str, password: &str| {
        let payload = serde_json::json!({ "username": username, "password": password });
        Request::builder()
            .uri("/auth/login")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    };

    // 2. Success
    let response = app
        .clone()
        .oneshot(login("reader", "reader_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let claims = decode_jwt(json["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, "reader");

    // 3. Invalid password
    let response = app
        .clone()
        .oneshot(login("reader", "wrong_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 4. Non-existent user
    let response = app.oneshot(login("nobody", "password")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = router(setup_test_db().await);

    for (method, uri) in [
        ("GET", "/saved-books"),
        ("POST", "/saved-books"),
        ("DELETE", "/saved-books?work_key=/works/OL1W"),
        ("POST", "/search"),
        ("GET", "/searches"),
        ("GET", "/editions?work_key=/works/OL1W"),
        ("GET", "/auth/me"),
    ] {
        let req = Request::builder()
            .uri(uri)
            .method(method)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_malformed_and_forged_tokens() {
    let app = router(setup_test_db().await);

    let forged = {
        let mut token = create_jwt(1, "reader").unwrap();
        token.truncate(token.len() - 2);
        token
    };

    for value in [
        "Token abc".to_string(),
        "Bearer not.a.jwt".to_string(),
        format!("Bearer {}", forged),
    ] {
        let req = Request::builder()
            .uri("/saved-books")
            .header(header::AUTHORIZATION, value.clone())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", value);
    }
}

#[tokio::test]
async fn test_token_for_deleted_account_is_rejected_by_me() {
    let app = router(setup_test_db().await);
    let token = create_jwt(99, "ghost").unwrap();

    let req = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_account_cannot_search_or_save() {
    let app = router(setup_test_db().await);
    let token = create_jwt(99, "ghost").unwrap();

    for (uri, payload) in [
        ("/search", serde_json::json!({ "query": "Dune" })),
        (
            "/saved-books",
            serde_json::json!({
                "work_key": "/works/OL123W",
                "title": "Dune",
                "author_display": "Frank Herbert",
                "publisher_display": "Unknown",
                "edition_count": 0,
                "ebook_access": "no_ebook"
            }),
        ),
    ] {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}
