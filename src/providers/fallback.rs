//! On-demand resolution of article pages that were not pre-rendered
//!
//! A slug outside the pre-rendered set starts in `Generating` while its
//! single backend lookup is in flight, then settles in `Ready` or
//! `NotFound`. Other failures are handed back to the caller and the slug
//! is forgotten, so the next request starts a fresh resolution. Settled
//! pages are looked up again once they are older than the revalidation
//! interval, and only a bounded number of `NotFound` slugs is remembered.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::post_props;
use crate::backend::ContentBackend;
use crate::config::SiteConfig;
use crate::content::PostDetail;
use crate::error::Result;

/// Resolution state of one on-demand page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState<T> {
    /// Lookup in flight; render a loading placeholder
    Generating,
    Ready(T),
    NotFound,
}

impl<T> PageState<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, PageState::Generating)
    }
}

/// Resolve one article against the backend
pub async fn resolve_post(
    backend: &dyn ContentBackend,
    config: &SiteConfig,
    slug: &str,
) -> Result<PageState<PostDetail>> {
    match post_props(backend, config, slug).await {
        Ok(props) => Ok(PageState::Ready(props.props.post)),
        Err(err) if err.is_not_found() => Ok(PageState::NotFound),
        Err(err) => Err(err),
    }
}

#[derive(Debug)]
struct Entry<T> {
    state: PageState<T>,
    resolved_at: Option<Instant>,
    revalidating: bool,
}

/// Number of `NotFound` slugs remembered before the oldest are dropped
pub const DEFAULT_NOT_FOUND_LIMIT: usize = 1024;

/// Per-slug states of pages resolved on demand
#[derive(Debug)]
pub struct FallbackPages<T> {
    entries: HashMap<String, Entry<T>>,
    not_found_limit: usize,
}

impl<T> Default for FallbackPages<T> {
    fn default() -> Self {
        Self::with_not_found_limit(DEFAULT_NOT_FOUND_LIMIT)
    }
}

impl<T> FallbackPages<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` `NotFound` slugs; any slug can be requested, so
    /// these are the entries that would otherwise grow without bound.
    pub fn with_not_found_limit(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            not_found_limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn state(&self, slug: &str) -> Option<&PageState<T>> {
        self.entries.get(slug).map(|e| &e.state)
    }

    /// Enter `Generating` for a slug seen for the first time.
    ///
    /// Returns `false` when the slug is already known, in which case the
    /// caller must not start another lookup.
    pub fn begin(&mut self, slug: &str) -> bool {
        if self.entries.contains_key(slug) {
            return false;
        }
        self.entries.insert(
            slug.to_string(),
            Entry {
                state: PageState::Generating,
                resolved_at: None,
                revalidating: false,
            },
        );
        true
    }

    /// Claim a background refresh of a settled page older than `max_age`.
    ///
    /// Applies to `NotFound` too, so an article published later is picked
    /// up. The stale state keeps being served until the refresh completes.
    pub fn begin_revalidation(&mut self, slug: &str, max_age: Duration) -> bool {
        match self.entries.get_mut(slug) {
            Some(entry)
                if entry.state.is_settled()
                    && !entry.revalidating
                    && entry
                        .resolved_at
                        .map(|at| at.elapsed() >= max_age)
                        .unwrap_or(true) =>
            {
                entry.revalidating = true;
                true
            }
            _ => false,
        }
    }

    /// Record the outcome of a lookup started with `begin` or
    /// `begin_revalidation`.
    ///
    /// On error a first-time lookup is forgotten while a refresh keeps the
    /// previous page; the error is returned either way.
    pub fn complete(&mut self, slug: &str, outcome: Result<PageState<T>>) -> Result<&PageState<T>> {
        match outcome {
            Ok(state) => {
                if matches!(state, PageState::NotFound) {
                    self.make_room_for_not_found(slug);
                }
                let entry = self.entries.entry(slug.to_string()).or_insert(Entry {
                    state: PageState::Generating,
                    resolved_at: None,
                    revalidating: false,
                });
                entry.state = state;
                entry.resolved_at = Some(Instant::now());
                entry.revalidating = false;
                Ok(&entry.state)
            }
            Err(err) => {
                let keep = match self.entries.get_mut(slug) {
                    Some(entry) if entry.state.is_settled() => {
                        entry.revalidating = false;
                        true
                    }
                    _ => false,
                };
                if !keep {
                    self.entries.remove(slug);
                }
                Err(err)
            }
        }
    }

    /// Drop the oldest `NotFound` entries other than `slug` so that one more
    /// fits under the limit.
    fn make_room_for_not_found(&mut self, slug: &str) {
        let mut not_found: Vec<(String, Option<Instant>)> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                key.as_str() != slug && matches!(entry.state, PageState::NotFound)
            })
            .map(|(key, entry)| (key.clone(), entry.resolved_at))
            .collect();
        if not_found.len() < self.not_found_limit {
            return;
        }

        not_found.sort_by_key(|(_, resolved_at)| *resolved_at);
        let excess = not_found.len() + 1 - self.not_found_limit;
        for (key, _) in not_found.into_iter().take(excess) {
            tracing::debug!("Forgetting missing slug {}", key);
            self.entries.remove(&key);
        }
    }
}
