//! Catalog Service - Search orchestration and record normalization
//!
//! `normalize` is the single place where the default policy for absent catalog
//! fields lives. Handlers only ever see `CanonicalBook`.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, SearchLogRepository};
use crate::openlibrary::{
    CatalogGateway, CoverSize, RawCatalogEntry, RawEdition, SearchField, cover_url,
};

pub const UNKNOWN: &str = "Unknown";
pub const UNTITLED: &str = "Untitled";
pub const NO_EBOOK: &str = "no_ebook";
const MAX_PUBLISHERS: usize = 3;

/// Normalized, display-ready book. Stored and returned without re-normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CanonicalBook {
    #[serde(default)]
    pub work_key: String,
    pub title: String,
    pub author_display: String,
    pub primary_author_key: Option<String>,
    pub publisher_display: String,
    pub first_publish_year: Option<i32>,
    pub primary_isbn: Option<String>,
    pub edition_count: i32,
    pub ebook_access: String,
    pub cover_url: Option<String>,
}

impl CanonicalBook {
    /// A book can only be saved when it carries a catalog work key
    pub fn is_persistable(&self) -> bool {
        !self.work_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EditionSummary {
    pub key: Option<String>,
    pub title: String,
    pub publisher_display: String,
    pub publish_date: Option<String>,
    pub primary_isbn: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub count: u64,
    pub books: Vec<CanonicalBook>,
}

fn join_or_unknown(values: Option<&[String]>, max: usize) -> String {
    match values {
        Some(values) if !values.is_empty() => {
            values.iter().take(max).cloned().collect::<Vec<_>>().join(", ")
        }
        _ => UNKNOWN.to_string(),
    }
}

fn first(values: Option<Vec<String>>) -> Option<String> {
    values.and_then(|v| v.into_iter().next())
}

/// Map a raw catalog entry to its canonical form. Total: never fails.
pub fn normalize(entry: RawCatalogEntry, covers_base: &str) -> CanonicalBook {
    CanonicalBook {
        work_key: entry.key.unwrap_or_default(),
        title: entry.title.unwrap_or_else(|| UNTITLED.to_string()),
        author_display: join_or_unknown(entry.author_name.as_deref(), usize::MAX),
        primary_author_key: first(entry.author_key),
        publisher_display: join_or_unknown(entry.publisher.as_deref(), MAX_PUBLISHERS),
        first_publish_year: entry.first_publish_year,
        primary_isbn: first(entry.isbn),
        edition_count: entry.edition_count.unwrap_or(0),
        ebook_access: entry.ebook_access.unwrap_or_else(|| NO_EBOOK.to_string()),
        cover_url: entry
            .cover_i
            .map(|id| cover_url(covers_base, id, CoverSize::M)),
    }
}

pub fn normalize_edition(entry: RawEdition) -> EditionSummary {
    EditionSummary {
        key: entry.key,
        title: entry.title.unwrap_or_else(|| UNTITLED.to_string()),
        publisher_display: join_or_unknown(entry.publisher.as_deref(), MAX_PUBLISHERS),
        publish_date: first(entry.publish_date),
        primary_isbn: first(entry.isbn),
    }
}

/// Validate, log, query the catalog and normalize every result.
///
/// The search log row is written before the outbound call, so it survives a
/// gateway failure.
pub async fn search_books(
    search_log: &dyn SearchLogRepository,
    gateway: &dyn CatalogGateway,
    user_id: i32,
    query: &str,
    field: SearchField,
    limit: u32,
) -> Result<SearchOutcome, DomainError> {
    if query.trim().is_empty() {
        return Err(DomainError::Validation("Query is required".to_string()));
    }

    search_log.append(user_id, query, field).await?;

    let page = gateway.search(query, field, limit).await?;
    let covers_base = gateway.covers_base();
    let books: Vec<CanonicalBook> = page
        .docs
        .into_iter()
        .map(|doc| normalize(doc, covers_base))
        .collect();

    tracing::info!(
        "Search by user {} for {}={:?}: {} of {} results",
        user_id,
        field,
        query,
        books.len(),
        page.num_found
    );

    Ok(SearchOutcome {
        count: page.num_found,
        books,
    })
}

pub async fn list_editions(
    gateway: &dyn CatalogGateway,
    work_key: &str,
    limit: u32,
) -> Result<Vec<EditionSummary>, DomainError> {
    if work_key.trim().is_empty() {
        return Err(DomainError::Validation("work_key is required".to_string()));
    }

    let editions = gateway.editions(work_key, limit).await?;
    Ok(editions.into_iter().map(normalize_edition).collect())
}
