//! Content backend boundary
//!
//! The pipeline only talks to the backend through two small capabilities:
//! [`ContentBackend`] for typed queries and [`CursorFetcher`] for following
//! the opaque `next_page` cursor the backend hands out. Records come back
//! loosely typed; the content normalizer projects them into display models.

mod memory;
mod prismic;

pub use memory::MemoryBackend;
pub use prismic::PrismicClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A document as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Backend document id
    pub id: String,

    /// Human readable unique id (the article slug)
    #[serde(default)]
    pub uid: Option<String>,

    /// Custom type name
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    /// Type specific fields
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A query response from the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub results: Vec<RawRecord>,

    /// URL of the next page of this query, if there is one
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Query operations offered by the content backend
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Fetch documents of one type. `page_size` bounds the number of
    /// results; `None` leaves the page size to the backend.
    async fn get_by_type(&self, content_type: &str, page_size: Option<u32>)
        -> Result<RawResponse>;

    /// Fetch the single document of `content_type` with the given uid.
    /// Fails with `BlogError::NotFound` when no document matches.
    async fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawRecord>;
}

/// Follows a `next_page` cursor handed out by a previous query
#[async_trait]
pub trait CursorFetcher: Send + Sync {
    async fn fetch_cursor(&self, cursor: &str) -> Result<RawResponse>;

    /// Whether `cursor` is one this fetcher is willing to follow
    fn accepts_cursor(&self, cursor: &str) -> bool;
}

/// A backend offering both queries and cursor following
pub trait Backend: ContentBackend + CursorFetcher {
    fn content(&self) -> &dyn ContentBackend;
    fn cursors(&self) -> &dyn CursorFetcher;
}

impl<T: ContentBackend + CursorFetcher> Backend for T {
    fn content(&self) -> &dyn ContentBackend {
        self
    }

    fn cursors(&self) -> &dyn CursorFetcher {
        self
    }
}
