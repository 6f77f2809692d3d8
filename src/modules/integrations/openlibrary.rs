//! OpenLibrary search gateway
//!
//! One outbound `search.json` request per call, no caching or retry. Every failure mode
//! (transport, timeout, status, body) collapses into `DomainError::GatewayUnavailable`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::DomainError;

const USER_AGENT: &str = concat!("booksearch/", env!("CARGO_PKG_VERSION"));

/// Fields requested from `search.json`; only what normalization reads.
pub const SEARCH_FIELDS: &str = "key,title,author_name,author_key,first_publish_year,publisher,publication_date,isbn,cover_i,edition_count,ebook_access";

pub const EDITION_FIELDS: &str = "key,title,publisher,publish_date,isbn";

pub const DEFAULT_EDITION_LIMIT: u32 = 10;

/// Which request parameter carries the query term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    General,
    Title,
    Author,
}

impl SearchField {
    /// Name of the OpenLibrary query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchField::General => "q",
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::General => "general",
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "q" | "general" => Ok(SearchField::General),
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            other => Err(DomainError::Validation(format!(
                "Unsupported search type: {}",
                other
            ))),
        }
    }
}

/// Cover image size accepted by the covers service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    S,
    #[default]
    M,
    L,
}

impl CoverSize {
    fn as_str(&self) -> &'static str {
        match self {
            CoverSize::S => "S",
            CoverSize::M => "M",
            CoverSize::L => "L",
        }
    }
}

/// `{covers_base}/b/id/{cover_id}-{size}.jpg`
pub fn cover_url(covers_base: &str, cover_id: i64, size: CoverSize) -> String {
    format!(
        "{}/b/id/{}-{}.jpg",
        covers_base.trim_end_matches('/'),
        cover_id,
        size.as_str()
    )
}

/// Reads any JSON value, keeping it only when it fits `T`. Numeric strings such as
/// `"1965"` are accepted for number fields.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = value.as_str().map(|s| s.trim().to_string());
    Ok(serde_json::from_value(value)
        .ok()
        .or_else(|| text.and_then(|s| serde_json::from_str(&s).ok())))
}

/// A `docs[]` entry exactly as the catalog returns it. Every field is optional, and a
/// field of the wrong shape reads as absent instead of failing the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalogEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_key: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub isbn: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub edition_count: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ebook_access: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover_i: Option<i64>,
}

/// An edition-level `docs[]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEdition {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub publish_date: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub isbn: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub num_found: u64,
    pub docs: Vec<RawCatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct OpenLibrarySearchResponse<T> {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default = "Vec::new")]
    docs: Vec<T>,
}

/// Boundary to the external book catalog
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Search works by free text on the selected field
    async fn search(
        &self,
        query: &str,
        field: SearchField,
        limit: u32,
    ) -> Result<CatalogPage, DomainError>;

    /// List editions of a work
    async fn editions(&self, work_key: &str, limit: u32) -> Result<Vec<RawEdition>, DomainError>;

    /// Base URL of the covers service used to build cover links
    fn covers_base(&self) -> &str;
}

/// reqwest-backed OpenLibrary client
#[derive(Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    search_url: url::Url,
    covers_base: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, covers_base: &str, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build client: {}", e))?;

        let search_url = url::Url::parse(&format!(
            "{}/search.json",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| format!("Invalid OpenLibrary base URL '{}': {}", base_url, e))?;

        Ok(Self {
            client,
            search_url,
            covers_base: covers_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T>(
        &self,
        params: &[(&str, String)],
    ) -> Result<OpenLibrarySearchResponse<T>, DomainError>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(self.search_url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("OpenLibrary request failed: {}", e);
                DomainError::GatewayUnavailable
            })?;

        if !resp.status().is_success() {
            tracing::warn!("OpenLibrary API returned status: {}", resp.status());
            return Err(DomainError::GatewayUnavailable);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::warn!("Failed to read OpenLibrary response body: {}", e);
            DomainError::GatewayUnavailable
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Failed to parse OpenLibrary JSON: {}", e);
            DomainError::GatewayUnavailable
        })
    }
}

#[async_trait]
impl CatalogGateway for OpenLibraryClient {
    async fn search(
        &self,
        query: &str,
        field: SearchField,
        limit: u32,
    ) -> Result<CatalogPage, DomainError> {
        tracing::debug!("OpenLibrary search {}={:?} limit={}", field.as_param(), query, limit);

        let params = [
            (field.as_param(), query.to_string()),
            ("limit", limit.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];
        let parsed: OpenLibrarySearchResponse<RawCatalogEntry> = self.fetch(&params).await?;

        Ok(CatalogPage {
            num_found: parsed.num_found,
            docs: parsed.docs,
        })
    }

    async fn editions(&self, work_key: &str, limit: u32) -> Result<Vec<RawEdition>, DomainError> {
        let params = [
            ("q", format!("key:{}", work_key)),
            ("fields", EDITION_FIELDS.to_string()),
            ("limit", limit.to_string()),
        ];
        let parsed: OpenLibrarySearchResponse<RawEdition> = self.fetch(&params).await?;
        Ok(parsed.docs)
    }

    fn covers_base(&self) -> &str {
        &self.covers_base
    }
}
