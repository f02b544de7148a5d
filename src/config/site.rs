//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,

    // Content backend
    pub endpoint: String,
    pub access_token: Option<String>,
    pub content_type: String,

    // Pagination
    pub page_size: u32,

    // Pre-rendering
    pub prerender_limit: usize,
    pub revalidate: u64,

    // Date format (moment.js style)
    pub date_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),

            endpoint: String::new(),
            access_token: None,
            content_type: "posts".to_string(),

            page_size: 1,

            prerender_limit: 4,
            revalidate: 60 * 60 * 24,

            date_format: "DD MMM YYYY".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the providers misbehave
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if self.content_type.trim().is_empty() {
            anyhow::bail!("content_type must not be empty");
        }
        if !self.timezone.is_empty() && self.timezone.parse::<chrono_tz::Tz>().is_err() {
            anyhow::bail!("Unknown timezone: {}", self.timezone);
        }
        Ok(())
    }

    /// Whether a remote backend is configured
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}
