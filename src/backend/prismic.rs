//! HTTP client for a Prismic document API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ContentBackend, CursorFetcher, RawRecord, RawResponse};
use crate::config::SiteConfig;
use crate::error::{BlogError, Result};

/// API root document, only the refs are of interest
#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default)]
    is_master_ref: bool,
}

/// Prismic REST client
#[derive(Debug, Clone)]
pub struct PrismicClient {
    client: Client,
    /// API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicClient {
    /// Create a client for the given API endpoint
    pub fn new(endpoint: &str, access_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: access_token
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string()),
        }
    }

    /// Create a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        if !config.has_endpoint() {
            return Err(BlogError::Config(
                "no content backend endpoint configured".to_string(),
            ));
        }
        Ok(Self::new(&config.endpoint, config.access_token.as_deref()))
    }

    /// Resolve the ref of the currently published content
    async fn master_ref(&self) -> Result<String> {
        let root: ApiRoot = self
            .send(self.with_token(self.client.get(&self.endpoint)))
            .await?;

        root.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| BlogError::BackendUnavailable("API has no master ref".to_string()))
    }

    /// Run a predicate query against the documents endpoint
    async fn search(&self, predicate: &str, page_size: Option<u32>) -> Result<RawResponse> {
        let master_ref = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);

        let mut query: Vec<(&str, String)> = vec![("ref", master_ref), ("q", predicate.to_string())];
        if let Some(size) = page_size {
            query.push(("pageSize", size.to_string()));
        }

        tracing::debug!("Querying {} with {}", url, predicate);
        self.send(self.with_token(self.client.get(&url).query(&query)))
            .await
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.query(&[("access_token", token)]),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogError::BackendUnavailable(format!(
                "{} responded with {}",
                response.url().path(),
                status
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Build a predicate string, escaping quotes in the value
fn at_predicate(path: &str, value: &str) -> String {
    format!(r#"[[at({}, "{}")]]"#, path, value.replace('"', "\\\""))
}

#[async_trait]
impl ContentBackend for PrismicClient {
    async fn get_by_type(
        &self,
        content_type: &str,
        page_size: Option<u32>,
    ) -> Result<RawResponse> {
        self.search(&at_predicate("document.type", content_type), page_size)
            .await
    }

    async fn get_by_uid(&self, content_type: &str, uid: &str) -> Result<RawRecord> {
        let predicate = at_predicate(&format!("my.{}.uid", content_type), uid);
        let response = self.search(&predicate, Some(1)).await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::not_found(content_type, uid))
    }
}

#[async_trait]
impl CursorFetcher for PrismicClient {
    async fn fetch_cursor(&self, cursor: &str) -> Result<RawResponse> {
        tracing::debug!("Fetching next page {}", cursor);
        self.send(self.client.get(cursor)).await
    }

    /// Only follow cursors pointing back at the configured API host
    fn accepts_cursor(&self, cursor: &str) -> bool {
        match (Url::parse(&self.endpoint), Url::parse(cursor)) {
            (Ok(endpoint), Ok(cursor)) => endpoint.origin() == cursor.origin(),
            _ => false,
        }
    }
}
