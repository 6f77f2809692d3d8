use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::auth::get_me,
        api::search::search_books,
        api::search::list_searches,
        api::search::list_editions,
        api::saved_books::save_book,
        api::saved_books::list_saved_books,
        api::saved_books::remove_saved_book,
    ),
    components(
        schemas(
            api::auth::LoginRequest,
            api::auth::LoginResponse,
            api::auth::RegisterRequest,
            api::search::SearchRequest,
            api::search::SearchResponse,
            api::search::EditionsResponse,
            api::saved_books::SavedBooksResponse,
            crate::services::CanonicalBook,
            crate::services::EditionSummary,
            crate::services::SearchField,
            crate::models::SavedBook,
            crate::domain::User,
            crate::domain::SearchLogEntry,
        )
    ),
    tags(
        (name = "booksearch", description = "OpenLibrary search and saved collection API")
    )
)]
pub struct ApiDoc;
