//! prismic-blog: a blog front end backed by a Prismic-style content API
//!
//! Article data is fetched from the content backend, normalized into small
//! display models and rendered with built-in Tera templates. The list page
//! grows incrementally by following the backend's paging cursor; article
//! pages outside the pre-rendered set are resolved on first request.

pub mod backend;
pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod pagination;
pub mod providers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use backend::{Backend, MemoryBackend, PrismicClient};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Content backend
    backend: Arc<dyn Backend>,
    /// Identifies where content comes from
    source: String,
}

impl Blog {
    /// Create a new blog from a directory.
    ///
    /// Content comes from `fixtures` (a JSON file of raw documents) when
    /// given, otherwise from the configured endpoint.
    pub fn new<P: AsRef<Path>>(base_dir: P, fixtures: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = load_config(&base_dir)?;

        match fixtures {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base_dir.join(path)
                };
                tracing::info!("Using fixture content from {:?}", path);
                let backend = Arc::new(MemoryBackend::from_json_file(&path)?);
                let mut blog = Self::with_backend(base_dir, config, backend);
                blog.source = format!("fixtures:{}", path.display());
                Ok(blog)
            }
            None => {
                let backend = Arc::new(PrismicClient::from_config(&config)?);
                Ok(Self::with_backend(base_dir, config, backend))
            }
        }
    }

    /// Create a blog over an already constructed backend
    pub fn with_backend(
        base_dir: PathBuf,
        config: config::SiteConfig,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let source = if config.has_endpoint() {
            config.endpoint.clone()
        } else {
            "memory".to_string()
        };
        Self {
            config,
            base_dir,
            public_dir,
            backend,
            source,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Identifies the content source in the regeneration cache
    pub fn source_id(&self) -> &str {
        &self.source
    }

    /// Generate the static site
    pub async fn generate(&self, force: bool) -> Result<()> {
        commands::generate::run(self, force).await
    }
}

/// Load `_config.yml` from the base directory, or the defaults if absent
pub fn load_config(base_dir: &Path) -> Result<config::SiteConfig> {
    let config_path = base_dir.join("_config.yml");
    if config_path.exists() {
        Ok(config::SiteConfig::load(&config_path)?)
    } else {
        Ok(config::SiteConfig::default())
    }
}
