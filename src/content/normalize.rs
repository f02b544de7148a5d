//! Projection of raw backend documents into display models
//!
//! Only the fields the views use are read; everything else on the record is
//! dropped. Optional fields map to `None` when missing. Required fields are
//! not defended: a record without them fails with `MalformedRecord`.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use super::{Page, Post, PostDetail, Section};
use crate::backend::{RawRecord, RawResponse};
use crate::error::{BlogError, Result};

/// Normalize a record for the article list
pub fn normalize_post(raw: &RawRecord) -> Result<Post> {
    Ok(Post {
        id: raw.uid.clone().unwrap_or_else(|| raw.id.clone()),
        published_at: publication_date(raw),
        title: required_str(&raw.data, "title")?.to_string(),
        subtitle: optional_str(&raw.data, "subtitle")
            .unwrap_or_default()
            .to_string(),
        author: required_str(&raw.data, "author")?.to_string(),
    })
}

/// Normalize a record for an article page
pub fn normalize_post_detail(raw: &RawRecord) -> Result<PostDetail> {
    let banner_url = raw
        .data
        .get("banner")
        .and_then(|banner| optional_str(banner, "url"))
        .map(|url| url.to_string());

    let sections = match raw.data.get("content") {
        Some(Value::Array(groups)) => groups.iter().map(normalize_section).collect(),
        _ => Vec::new(),
    };

    Ok(PostDetail {
        published_at: publication_date(raw),
        title: required_str(&raw.data, "title")?.to_string(),
        banner_url,
        author: required_str(&raw.data, "author")?.to_string(),
        sections,
    })
}

/// Normalize every result of a query response into a page of posts
pub fn normalize_page(response: &RawResponse) -> Result<Page<Post>> {
    let items = response
        .results
        .iter()
        .map(normalize_post)
        .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(items, response.next_page.clone()))
}

fn normalize_section(group: &Value) -> Section {
    let heading = optional_str(group, "heading").unwrap_or_default().to_string();

    let paragraphs = match group.get("body") {
        Some(Value::Array(blocks)) => blocks
            .iter()
            .map(|block| optional_str(block, "text").unwrap_or_default().to_string())
            .collect(),
        _ => Vec::new(),
    };

    Section {
        heading,
        paragraphs,
    }
}

/// Parse a backend publication timestamp.
///
/// Accepts RFC 3339 as well as the `+0000` offset form the API emits.
pub fn parse_publication_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

fn publication_date(raw: &RawRecord) -> Option<DateTime<FixedOffset>> {
    raw.first_publication_date
        .as_deref()
        .and_then(parse_publication_date)
}

fn required_str<'a>(data: &'a Value, field: &str) -> Result<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| BlogError::malformed(format!("data.{}", field)))
}

/// A string field, with null and empty treated as absent
fn optional_str<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
