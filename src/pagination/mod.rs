//! Incremental pagination of the article list
//!
//! A list session starts from the first page delivered by the list provider
//! and grows one fetched page at a time. Merging is a pure append: the
//! existing items are never re-sorted or deduplicated, and the cursor is
//! always replaced by the one that came with the fetched page.

use serde::{Deserialize, Serialize};

use crate::backend::CursorFetcher;
use crate::content::{normalize_page, Page, Post};
use crate::error::Result;

/// Append a fetched page to an existing list.
///
/// Returns the new list and the cursor to use for the following fetch.
pub fn merge_page(existing: &[Post], fetched: Page<Post>) -> (Vec<Post>, Option<String>) {
    let mut items = Vec::with_capacity(existing.len() + fetched.items.len());
    items.extend_from_slice(existing);
    items.extend(fetched.items);
    (items, fetched.next_cursor)
}

/// State of one article list session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostList {
    items: Vec<Post>,
    cursor: Option<String>,
}

impl PostList {
    /// Start a session from the first page
    pub fn new(first: Page<Post>) -> Self {
        Self {
            items: first.items,
            cursor: first.next_cursor,
        }
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Whether another page can still be requested
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Transition to the state after `fetched` has arrived
    pub fn apply_fetched_page(self, fetched: Page<Post>) -> Self {
        let (items, cursor) = merge_page(&self.items, fetched);
        Self { items, cursor }
    }

    /// Fetch the page behind the current cursor and append it.
    ///
    /// Returns `Ok(false)` without fetching once the cursor is exhausted.
    /// Fetch and normalization errors are returned to the caller and leave
    /// the list unchanged.
    pub async fn load_more(&mut self, fetcher: &dyn CursorFetcher) -> Result<bool> {
        let Some(cursor) = self.cursor.as_deref() else {
            return Ok(false);
        };

        let response = fetcher.fetch_cursor(cursor).await?;
        let fetched = normalize_page(&response)?;
        tracing::debug!(
            "Fetched {} more posts (more pages: {})",
            fetched.items.len(),
            fetched.has_next()
        );

        *self = std::mem::take(self).apply_fetched_page(fetched);
        Ok(true)
    }

    /// Keep loading until the backend reports no further pages
    pub async fn load_all(&mut self, fetcher: &dyn CursorFetcher) -> Result<usize> {
        let mut fetches = 0;
        while self.load_more(fetcher).await? {
            fetches += 1;
        }
        Ok(fetches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, RawRecord};
    use serde_json::json;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            published_at: None,
            title: format!("Title {}", id),
            subtitle: String::new(),
            author: "Author".to_string(),
        }
    }

    fn page(ids: &[&str], cursor: Option<&str>) -> Page<Post> {
        Page::new(
            ids.iter().map(|id| post(id)).collect(),
            cursor.map(|c| c.to_string()),
        )
    }

    fn record(uid: &str) -> RawRecord {
        RawRecord {
            id: format!("doc-{}", uid),
            uid: Some(uid.to_string()),
            content_type: Some("posts".to_string()),
            first_publication_date: Some("2021-04-01T12:00:00+0000".to_string()),
            data: json!({ "title": uid, "subtitle": "", "author": "Author" }),
        }
    }

    #[test]
    fn test_merge_appends_and_keeps_prefix() {
        let existing = vec![post("a"), post("b")];
        let (merged, cursor) = merge_page(&existing, page(&["c", "d"], Some("next")));

        assert_eq!(merged.len(), 4);
        assert_eq!(&merged[..2], existing.as_slice());
        let ids: Vec<_> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(cursor.as_deref(), Some("next"));
    }

    #[test]
    fn test_merge_propagates_absent_cursor() {
        let (merged, cursor) = merge_page(&[post("a")], page(&["b"], None));
        assert_eq!(merged.len(), 2);
        assert_eq!(cursor, None);
    }

    #[test]
    fn test_merge_does_not_sort() {
        let (merged, _) = merge_page(&[post("z")], page(&["a"], None));
        assert_eq!(merged[0].id, "z");
        assert_eq!(merged[1].id, "a");
    }

    #[test]
    fn test_empty_page_with_cursor_is_valid() {
        let list = PostList::new(page(&["a"], Some("p2")));
        let list = list.apply_fetched_page(page(&[], Some("p3")));

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.cursor(), Some("p3"));
        assert!(list.has_more());
    }

    #[test]
    fn test_apply_fetched_page_replaces_cursor() {
        let list = PostList::new(page(&["a"], Some("p2")));
        let list = list.apply_fetched_page(page(&["b"], None));

        assert_eq!(list.items().len(), 2);
        assert!(!list.has_more());
    }

    #[tokio::test]
    async fn test_load_all_walks_every_page_once() {
        let backend = MemoryBackend::new(vec![
            record("one"),
            record("two"),
            record("three"),
            record("four"),
            record("five"),
        ]);
        let first = crate::backend::ContentBackend::get_by_type(&backend, "posts", Some(2))
            .await
            .unwrap();
        let mut list = PostList::new(normalize_page(&first).unwrap());

        let fetches = list.load_all(&backend).await.unwrap();
        assert_eq!(fetches, 2);

        let ids: Vec<_> = list.items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "three", "four", "five"]);
        assert!(!list.has_more());

        // Exhausted cursor means no further fetch
        assert!(!list.load_more(&backend).await.unwrap());
        assert_eq!(list.items().len(), 5);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_list_unchanged() {
        let backend = MemoryBackend::default();
        let mut list = PostList::new(page(&["a"], Some("https://elsewhere.example.com/?page=2")));

        assert!(list.load_more(&backend).await.is_err());
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.cursor(), Some("https://elsewhere.example.com/?page=2"));
    }
}
