//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("fixtures"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    let config_content = r#"# Blog configuration

# Site
title: spacetraveling
description: ''
language: en
timezone: ''

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public

# Content backend
endpoint: https://your-repo.cdn.prismic.io/api/v2
access_token:
content_type: posts

# Pagination
page_size: 1

# Pre-rendering
prerender_limit: 4
revalidate: 86400

# Date format
date_format: DD MMM YYYY
"#;

    fs::write(&config_path, config_content)?;

    // Sample content for offline builds (--fixtures fixtures/posts.json)
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%z").to_string();
    let fixtures = serde_json::json!([
        {
            "id": "sample-1",
            "uid": "hello-world",
            "type": "posts",
            "first_publication_date": now,
            "data": {
                "title": "Hello World",
                "subtitle": "Your first post",
                "author": "Your Name",
                "banner": { "url": null },
                "content": [
                    {
                        "heading": "Welcome",
                        "body": [
                            { "type": "paragraph", "text": "This post comes from the sample fixtures." }
                        ]
                    }
                ]
            }
        },
        {
            "id": "sample-2",
            "uid": "second-post",
            "type": "posts",
            "first_publication_date": now,
            "data": {
                "title": "Second Post",
                "subtitle": "Loaded with the next page",
                "author": "Your Name",
                "content": []
            }
        }
    ]);
    fs::write(
        target_dir.join("fixtures/posts.json"),
        serde_json::to_string_pretty(&fixtures)?,
    )?;

    Ok(())
}
