//! Generate static files

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::cache::{unix_now, RegenerationDb};
use crate::providers;
use crate::templates::TemplateRenderer;
use crate::Blog;

const INDEX_OUTPUT: &str = "index.html";

/// Output path of a pre-rendered article, relative to the public dir.
///
/// Only slugs that are already in slug form get a file; anything else is
/// left to on-demand resolution.
pub fn prerendered_output(slug: &str) -> Option<String> {
    if slug.is_empty() || slug::slugify(slug) != slug {
        return None;
    }
    Some(format!("post/{}/index.html", slug))
}

/// Generate the list page and the pre-rendered article pages.
///
/// Outputs generated less than `revalidate` seconds ago are kept as they
/// are unless `force` is set.
pub async fn run(blog: &Blog, force: bool) -> Result<()> {
    let start = std::time::Instant::now();
    let config = &blog.config;
    let backend = blog.backend().content();
    let renderer = TemplateRenderer::new(config)?;

    fs::create_dir_all(&blog.public_dir)?;

    let mut db = if force {
        RegenerationDb::new(blog.source_id())
    } else {
        RegenerationDb::load(&blog.base_dir, blog.source_id())
    };
    db.retain_existing(&blog.public_dir);

    let now = unix_now();
    let mut generated = 0;
    let mut skipped = 0;

    // Article list
    if db.is_fresh(INDEX_OUTPUT, now) {
        skipped += 1;
    } else {
        let home = providers::home_props(backend, config).await?;
        let html = renderer.render_home(&home.props.posts_pagination)?;
        write_output(&blog.public_dir, INDEX_OUTPUT, &html)?;
        write_json(&blog.public_dir, "props.json", &home)?;
        db.record(INDEX_OUTPUT, now, home.revalidate);
        generated += 1;
    }

    // Article pages
    let paths = providers::static_paths(backend, config).await?;
    write_json(&blog.public_dir, "paths.json", &paths)?;

    for slug in paths.slugs() {
        let Some(output) = prerendered_output(slug) else {
            tracing::warn!("Not pre-rendering {:?}: not a plain slug", slug);
            continue;
        };
        if db.is_fresh(&output, now) {
            skipped += 1;
            continue;
        }

        let props = match providers::post_props(backend, config, slug).await {
            Ok(props) => props,
            Err(e) if e.is_not_found() => {
                tracing::warn!("Skipping {}: {}", slug, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let html = renderer.render_post(&props.props.post)?;
        write_output(&blog.public_dir, &output, &html)?;
        write_json(
            &blog.public_dir,
            &format!("post/{}/props.json", slug),
            &props,
        )?;
        db.record(&output, now, props.revalidate);
        generated += 1;
    }

    db.save(&blog.base_dir)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages ({} still fresh) in {:.2}s",
        generated,
        skipped,
        duration.as_secs_f64()
    );

    Ok(())
}

fn write_output(public_dir: &Path, relative: &str, content: &str) -> Result<()> {
    let path = public_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

fn write_json<T: Serialize>(public_dir: &Path, relative: &str, value: &T) -> Result<()> {
    write_output(public_dir, relative, &serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, RawRecord};
    use crate::config::SiteConfig;
    use serde_json::json;
    use std::sync::Arc;

    fn record(uid: &str) -> RawRecord {
        RawRecord {
            id: format!("doc-{}", uid),
            uid: Some(uid.to_string()),
            content_type: Some("posts".to_string()),
            first_publication_date: Some("2021-03-25T19:25:28+0000".to_string()),
            data: json!({
                "title": format!("Post {}", uid),
                "subtitle": "Sub",
                "author": "Author",
                "content": [{ "heading": "Intro", "body": [{ "text": "Hello there" }] }]
            }),
        }
    }

    fn blog(dir: &Path, uids: &[&str]) -> Blog {
        Blog::with_backend(
            dir.to_path_buf(),
            SiteConfig::default(),
            Arc::new(MemoryBackend::new(uids.iter().map(|u| record(u)).collect())),
        )
    }

    #[test]
    fn test_prerendered_output() {
        assert_eq!(
            prerendered_output("como-utilizar-hooks").as_deref(),
            Some("post/como-utilizar-hooks/index.html")
        );
        assert_eq!(prerendered_output("../etc/passwd"), None);
        assert_eq!(prerendered_output(""), None);
    }

    #[tokio::test]
    async fn test_generate_writes_home_and_first_posts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path(), &["a", "b", "c", "d", "e"]);

        run(&blog, false).await.unwrap();

        let public = &blog.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("props.json").exists());
        for slug in ["a", "b", "c", "d"] {
            assert!(public.join(format!("post/{}/index.html", slug)).exists());
        }
        // Beyond the pre-render limit
        assert!(!public.join("post/e/index.html").exists());

        let paths: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("paths.json")).unwrap()).unwrap();
        assert_eq!(paths["paths"].as_array().unwrap().len(), 4);
        assert_eq!(paths["fallback"], true);
    }

    #[tokio::test]
    async fn test_fresh_outputs_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path(), &["a"]);

        run(&blog, false).await.unwrap();
        let index = blog.public_dir.join("index.html");
        fs::write(&index, "kept").unwrap();

        run(&blog, false).await.unwrap();
        assert_eq!(fs::read_to_string(&index).unwrap(), "kept");

        run(&blog, true).await.unwrap();
        assert_ne!(fs::read_to_string(&index).unwrap(), "kept");
    }
}
