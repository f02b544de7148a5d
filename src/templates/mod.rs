//! Built-in templates using the Tera template engine
//!
//! The theme is embedded in the binary. Views only format already
//! normalized data; they never talk to the backend.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{estimate_reading_minutes, Page, Post, PostDetail, Section};
use crate::helpers::{date_xml, display_date, load_more_url, post_url, url_for};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
    config: SiteConfig,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_summary.html",
                include_str!("theme/partials/post_summary.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            config: config.clone(),
        })
    }

    /// Render the article list with its first page
    pub fn render_home(&self, page: &Page<Post>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &self.summaries(&page.items));
        context.insert("next_cursor", &page.next_cursor);
        context.insert(
            "load_more_url",
            &page
                .next_cursor
                .as_deref()
                .map(|cursor| load_more_url(&self.config, cursor)),
        );
        context.insert("api_url", &url_for(&self.config, "api/posts"));
        self.render("index.html", &context)
    }

    /// Render one article
    pub fn render_post(&self, detail: &PostDetail) -> Result<String> {
        let page = PostPage::new(&self.config, detail);
        let mut context = self.base_context();
        context.insert("page_title", &page.title);
        context.insert("post", &page);
        self.render("post.html", &context)
    }

    /// Placeholder shown while an article is being resolved
    pub fn render_loading(&self) -> Result<String> {
        self.render("loading.html", &self.base_context())
    }

    pub fn render_not_found(&self, slug: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("slug", slug);
        self.render("not_found.html", &context)
    }

    /// List entries for a page of posts, also used by the load-more endpoint
    pub fn summaries(&self, posts: &[Post]) -> Vec<PostSummary> {
        posts
            .iter()
            .map(|post| PostSummary::new(&self.config, post))
            .collect()
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                language: self.config.language.clone(),
                root: url_for(&self.config, ""),
            },
        );
        context
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
}

/// One entry of the article list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Display date, empty when unpublished
    pub date: String,
    pub datetime: Option<String>,
}

impl PostSummary {
    pub fn new(config: &SiteConfig, post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            url: post_url(config, &post.id),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post
                .published_at
                .as_ref()
                .map(|d| display_date(config, d))
                .unwrap_or_default(),
            datetime: post.published_at.as_ref().map(|d| date_xml(d)),
        }
    }
}

/// View of one article; the reading time is computed once per render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub title: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub date: String,
    pub datetime: Option<String>,
    pub reading_minutes: u32,
    pub sections: Vec<Section>,
}

impl PostPage {
    pub fn new(config: &SiteConfig, detail: &PostDetail) -> Self {
        Self {
            title: detail.title.clone(),
            banner_url: detail.banner_url.clone(),
            author: detail.author.clone(),
            date: detail
                .published_at
                .as_ref()
                .map(|d| display_date(config, d))
                .unwrap_or_default(),
            datetime: detail.published_at.as_ref().map(|d| date_xml(d)),
            reading_minutes: estimate_reading_minutes(detail),
            sections: detail.sections.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            published_at: Some(DateTime::parse_from_rfc3339("2021-03-15T19:25:28+00:00").unwrap()),
            title: format!("Title <{}>", id),
            subtitle: "Subtitle".to_string(),
            author: "Author".to_string(),
        }
    }

    fn detail() -> PostDetail {
        PostDetail {
            published_at: None,
            title: "Article".to_string(),
            banner_url: Some("https://images.example.com/b.png".to_string()),
            author: "Author".to_string(),
            sections: vec![Section {
                heading: "A B".to_string(),
                paragraphs: vec!["C D E".to_string()],
            }],
        }
    }

    #[test]
    fn test_render_home_with_cursor() {
        let renderer = TemplateRenderer::new(&SiteConfig::default()).unwrap();
        let page = Page::new(vec![post("first")], Some("https://x.io/next?page=2".to_string()));

        let html = renderer.render_home(&page).unwrap();
        assert!(html.contains("/post/first/"));
        assert!(html.contains("15 Mar 2021"));
        // Titles are escaped
        assert!(html.contains("Title &lt;first&gt;"));
        assert!(html.contains("data-load-more"));
    }

    #[test]
    fn test_render_home_without_cursor_hides_load_more() {
        let renderer = TemplateRenderer::new(&SiteConfig::default()).unwrap();
        let html = renderer
            .render_home(&Page::new(vec![post("only")], None))
            .unwrap();
        assert!(!html.contains("data-load-more"));
    }

    #[test]
    fn test_render_post() {
        let renderer = TemplateRenderer::new(&SiteConfig::default()).unwrap();
        let html = renderer.render_post(&detail()).unwrap();
        assert!(html.contains("1 min"));
        assert!(html.contains("images.example.com"));
        assert!(html.contains("C D E"));
    }

    #[test]
    fn test_post_page_reading_minutes() {
        let page = PostPage::new(&SiteConfig::default(), &detail());
        assert_eq!(page.reading_minutes, 1);
        assert_eq!(page.date, "");
    }

    #[test]
    fn test_render_loading_and_not_found() {
        let renderer = TemplateRenderer::new(&SiteConfig::default()).unwrap();
        assert!(renderer.render_loading().unwrap().contains("Loading"));
        assert!(renderer
            .render_not_found("ghost")
            .unwrap()
            .contains("ghost"));
    }
}
