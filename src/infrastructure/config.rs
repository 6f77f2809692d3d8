use std::env;
use std::time::Duration;

pub const DEFAULT_OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_OPENLIBRARY_COVERS_URL: &str = "https://covers.openlibrary.org";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openlibrary_base_url: String,
    pub openlibrary_covers_url: String,
    pub catalog_timeout: Duration,
    pub search_limit: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://booksearch.db?mode=rwc".to_string()),
            port: parse_var("PORT").unwrap_or(8000),
            openlibrary_base_url: env::var("OPENLIBRARY_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENLIBRARY_BASE_URL.to_string()),
            openlibrary_covers_url: env::var("OPENLIBRARY_COVERS_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENLIBRARY_COVERS_URL.to_string()),
            catalog_timeout: Duration::from_secs(parse_var("CATALOG_TIMEOUT_SECS").unwrap_or(10)),
            search_limit: parse_var("SEARCH_LIMIT").unwrap_or(20),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8000,
            openlibrary_base_url: DEFAULT_OPENLIBRARY_BASE_URL.to_string(),
            openlibrary_covers_url: DEFAULT_OPENLIBRARY_COVERS_URL.to_string(),
            catalog_timeout: Duration::from_secs(10),
            search_limit: 20,
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
