//! List articles from the content backend

use anyhow::Result;

use crate::helpers::display_date;
use crate::pagination::PostList;
use crate::providers;
use crate::Blog;

/// Print the first page of articles, or every page with `all`
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let list = collect(blog, all).await?;

    println!("Posts ({}):", list.items().len());
    for post in list.items() {
        let date = post
            .published_at
            .as_ref()
            .map(|d| display_date(&blog.config, d))
            .unwrap_or_else(|| "unpublished".to_string());
        println!("  {} - {} [{}]", date, post.title, post.id);
    }
    if list.has_more() {
        println!("  ... more posts available (use --all)");
    }

    Ok(())
}

/// Start a list session from the first page and optionally load the rest
pub async fn collect(blog: &Blog, all: bool) -> Result<PostList> {
    let home = providers::home_props(blog.backend().content(), &blog.config).await?;
    let mut list = PostList::new(home.props.posts_pagination);

    if all {
        let fetches = list.load_all(blog.backend().cursors()).await?;
        tracing::debug!("Loaded {} more pages", fetches);
    }

    Ok(list)
}
