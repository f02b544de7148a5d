//! Display models for the article list and article pages

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A post as shown in the article list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Backend uid (falls back to the document id)
    pub id: String,

    /// First publication date
    pub published_at: Option<DateTime<FixedOffset>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A full article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    /// First publication date
    pub published_at: Option<DateTime<FixedOffset>>,

    pub title: String,

    /// Banner image URL
    pub banner_url: Option<String>,

    pub author: String,

    /// Article body, in order
    pub sections: Vec<Section>,
}

/// A headed block of article text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

/// One page of results plus the cursor for the page after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Opaque token for the next page; `None` when this is the last page
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Whether another page can be fetched after this one
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}
