//! Clean the public directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::cache::CACHE_DIR;
use crate::config::SiteConfig;

/// Clean the public directory and the regeneration cache.
///
/// Needs no content backend, so it works on sites without an endpoint.
pub fn run(base_dir: &Path, config: &SiteConfig) -> Result<()> {
    let public_dir = base_dir.join(&config.public_dir);
    if public_dir.exists() {
        fs::remove_dir_all(&public_dir)?;
        tracing::info!("Deleted: {:?}", public_dir);
    }

    let cache_dir = base_dir.join(CACHE_DIR);
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_outputs_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let public_dir = dir.path().join(&config.public_dir);
        fs::create_dir_all(public_dir.join("post/a")).unwrap();
        fs::create_dir_all(dir.path().join(CACHE_DIR)).unwrap();
        fs::write(dir.path().join("_config.yml"), "title: kept\n").unwrap();

        run(dir.path(), &config).unwrap();
        assert!(!public_dir.exists());
        assert!(!dir.path().join(CACHE_DIR).exists());
        assert!(dir.path().join("_config.yml").exists());

        // Cleaning twice is fine
        run(dir.path(), &config).unwrap();
    }
}
