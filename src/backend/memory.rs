//! In-memory content backend
//!
//! Serves a fixed set of documents with the same paging contract as the
//! remote API. Used for offline builds from a JSON fixture file and in tests.

use async_trait::async_trait;
use std::fs;
use std::path::Path;

use super::{ContentBackend, CursorFetcher, RawRecord, RawResponse};
use crate::error::{BlogError, Result};

/// Page size used when a query does not specify one
const DEFAULT_PAGE_SIZE: u32 = 20;

const CURSOR_SCHEME: &str = "memory://";

/// Documents held in memory, in backend order
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Vec<RawRecord>,
}

impl MemoryBackend {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Load documents from a JSON file holding an array of raw records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| BlogError::Config(format!("cannot read {:?}: {}", path, e)))?;
        let records: Vec<RawRecord> = serde_json::from_str(&content)
            .map_err(|e| BlogError::Config(format!("invalid fixtures in {:?}: {}", path, e)))?;

        tracing::debug!("Loaded {} fixture documents from {:?}", records.len(), path);
        Ok(Self::new(records))
    }

    fn of_type<'a>(&'a self, content_type: &'a str) -> impl Iterator<Item = &'a RawRecord> {
        self.records.iter().filter(move |r| {
            r.content_type
                .as_deref()
                .map(|t| t == content_type)
                .unwrap_or(true)
        })
    }

    /// Slice out one page (1-based) of documents of a type
    fn page(&self, content_type: &str, page: usize, page_size: u32) -> RawResponse {
        let size = page_size.max(1) as usize;
        let matching: Vec<_> = self.of_type(content_type).collect();
        let start = page
            .saturating_sub(1)
            .saturating_mul(size)
            .min(matching.len());
        let end = start.saturating_add(size).min(matching.len());

        let next_page = if end < matching.len() {
            Some(format!(
                "{}{}?page={}&pageSize={}",
                CURSOR_SCHEME,
                content_type,
                page + 1,
                size
            ))
        } else {
            None
        };

        RawResponse {
            results: matching[start..end].iter().map(|r| (*r).clone()).collect(),
            next_page,
        }
    }
}

/// Split a `memory://<type>?page=N&pageSize=M` cursor
fn parse_cursor(cursor: &str) -> Option<(&str, usize, u32)> {
    let rest = cursor.strip_prefix(CURSOR_SCHEME)?;
    let (content_type, query) = rest.split_once('?')?;

    let mut page = None;
    let mut page_size = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("page", value)) => page = value.parse::<usize>().ok().filter(|p| *p > 0),
            Some(("pageSize", value)) => page_size = value.parse::<u32>().ok().filter(|s| *s > 0),
            _ => {}
        }
    }

    Some((content_type, page?, page_size?))
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn get_by_type(
        &self,
        content_type: &str,
        page_size: Option<u32>,
    ) -> Result<RawResponse> {
        Ok(self.page(content_type, 1, page_size.unwrap_or(DEFAULT_PAGE_SIZE)))
    }

    async fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawRecord> {
        self.of_type(content_type)
            .find(|r| r.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| BlogError::not_found(content_type, uid))
    }
}

#[async_trait]
impl CursorFetcher for MemoryBackend {
    async fn fetch_cursor(&self, cursor: &str) -> Result<RawResponse> {
        let (content_type, page, page_size) = parse_cursor(cursor).ok_or_else(|| {
            BlogError::BackendUnavailable(format!("unknown cursor {}", cursor))
        })?;
        Ok(self.page(content_type, page, page_size))
    }

    fn accepts_cursor(&self, cursor: &str) -> bool {
        parse_cursor(cursor).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(uid: &str, content_type: &str) -> RawRecord {
        RawRecord {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            content_type: Some(content_type.to_string()),
            first_publication_date: None,
            data: json!({ "title": uid, "author": "someone" }),
        }
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new(vec![
            record("a", "posts"),
            record("about", "page"),
            record("b", "posts"),
            record("c", "posts"),
        ])
    }

    #[tokio::test]
    async fn test_pages_through_one_type() {
        let backend = backend();

        let first = backend.get_by_type("posts", Some(2)).await.unwrap();
        let uids: Vec<_> = first.results.iter().map(|r| r.uid.clone().unwrap()).collect();
        assert_eq!(uids, vec!["a", "b"]);
        let cursor = first.next_page.unwrap();
        assert_eq!(cursor, "memory://posts?page=2&pageSize=2");

        let second = backend.fetch_cursor(&cursor).await.unwrap();
        assert_eq!(second.results.len(), 1);
        assert_eq!(second.results[0].uid.as_deref(), Some("c"));
        assert_eq!(second.next_page, None);
    }

    #[tokio::test]
    async fn test_unpaged_query_uses_default_size() {
        let records = (0..25).map(|i| record(&format!("p{}", i), "posts")).collect();
        let backend = MemoryBackend::new(records);

        let response = backend.get_by_type("posts", None).await.unwrap();
        assert_eq!(response.results.len(), DEFAULT_PAGE_SIZE as usize);
        assert!(response.next_page.is_some());
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let backend = backend();
        assert_eq!(backend.get_by_uid("posts", "b").await.unwrap().id, "id-b");

        let err = backend.get_by_uid("posts", "about").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_foreign_cursor() {
        let backend = backend();
        assert!(!backend.accepts_cursor("https://example.com/?page=2"));
        assert!(backend.fetch_cursor("https://example.com/?page=2").await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_cursor_is_an_empty_page() {
        let backend = backend();

        let cursor = format!("memory://posts?page={}&pageSize=2", usize::MAX);
        assert!(backend.accepts_cursor(&cursor));
        let response = backend.fetch_cursor(&cursor).await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.next_page, None);
    }

    #[test]
    fn test_rejects_zero_page_cursor() {
        let backend = backend();
        assert!(!backend.accepts_cursor("memory://posts?page=0&pageSize=2"));
        assert!(!backend.accepts_cursor("memory://posts?page=1&pageSize=0"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(
            &path,
            r#"[{"id": "x1", "uid": "hello", "type": "posts", "extra": 1, "data": {"title": "Hello"}}]"#,
        )
        .unwrap();

        let backend = MemoryBackend::from_json_file(&path).unwrap();
        assert_eq!(backend.records.len(), 1);
        assert_eq!(backend.records[0].uid.as_deref(), Some("hello"));

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            MemoryBackend::from_json_file(&path),
            Err(BlogError::Config(_))
        ));
    }
}
