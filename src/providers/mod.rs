//! Page data providers
//!
//! Build-time entry points that query the content backend, normalize the
//! results and package them for rendering, together with the revalidation
//! interval and the set of article paths rendered ahead of time.

mod fallback;

pub use fallback::{resolve_post, FallbackPages, PageState, DEFAULT_NOT_FOUND_LIMIT};

use serde::{Deserialize, Serialize};

use crate::backend::ContentBackend;
use crate::config::SiteConfig;
use crate::content::{normalize_page, normalize_post_detail, Page, Post, PostDetail};
use crate::error::Result;

/// Provider output handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticProps<T> {
    pub props: T,

    /// Seconds after which the page should be regenerated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidate: Option<u64>,
}

/// Props of the article list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeProps {
    pub posts_pagination: Page<Post>,
}

/// Props of an article page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProps {
    pub post: PostDetail,
}

/// Route parameters of one pre-rendered article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParams {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPath {
    pub params: PathParams,
}

/// Article paths to pre-render, and whether others resolve on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPaths {
    pub paths: Vec<StaticPath>,
    pub fallback: bool,
}

impl StaticPaths {
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.params.slug.as_str())
    }
}

/// First page of the article list
pub async fn home_props(
    backend: &dyn ContentBackend,
    config: &SiteConfig,
) -> Result<StaticProps<HomeProps>> {
    let response = backend
        .get_by_type(&config.content_type, Some(config.page_size))
        .await?;
    let posts_pagination = normalize_page(&response)?;

    tracing::debug!(
        "Home page: {} posts, next page: {:?}",
        posts_pagination.items.len(),
        posts_pagination.next_cursor
    );

    Ok(StaticProps {
        props: HomeProps { posts_pagination },
        revalidate: Some(config.revalidate),
    })
}

/// Full article for one slug
pub async fn post_props(
    backend: &dyn ContentBackend,
    config: &SiteConfig,
    slug: &str,
) -> Result<StaticProps<PostProps>> {
    let record = backend.get_by_uid(&config.content_type, slug).await?;
    let post = normalize_post_detail(&record)?;

    Ok(StaticProps {
        props: PostProps { post },
        revalidate: Some(config.revalidate),
    })
}

/// The first `prerender_limit` article slugs, in backend order
pub async fn static_paths(backend: &dyn ContentBackend, config: &SiteConfig) -> Result<StaticPaths> {
    let response = backend.get_by_type(&config.content_type, None).await?;

    let paths = response
        .results
        .iter()
        .take(config.prerender_limit)
        .filter_map(|record| record.uid.clone())
        .map(|slug| StaticPath {
            params: PathParams { slug },
        })
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: true,
    })
}
