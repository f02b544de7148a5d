//! Web server for the generated site
//!
//! Serves the public directory, resolves article pages that were not
//! pre-rendered, and answers the list page's "load more" requests.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate::prerendered_output;
use crate::content::{normalize_page, Page, PostDetail};
use crate::providers::{resolve_post, FallbackPages, PageState, DEFAULT_NOT_FOUND_LIMIT};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Pages resolved on demand, plus failures not yet reported
#[derive(Default)]
struct OnDemandPages {
    fallback: FallbackPages<PostDetail>,
    failures: HashMap<String, String>,
}

/// Server state
struct ServerState {
    blog: Blog,
    renderer: TemplateRenderer,
    pages: Mutex<OnDemandPages>,
}

#[derive(Debug, Deserialize)]
struct LoadMoreQuery {
    cursor: String,
}

/// Build the application router
pub fn router(blog: Blog) -> Result<Router> {
    let renderer = TemplateRenderer::new(&blog.config)?;
    let public_dir = blog.public_dir.clone();

    let state = Arc::new(ServerState {
        blog,
        renderer,
        pages: Mutex::new(OnDemandPages::default()),
    });

    Ok(Router::new()
        .route("/api/posts", get(load_more_handler))
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Article page: pre-rendered file if there is one, otherwise on-demand
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if let Some(output) = prerendered_output(&slug) {
        let file = state.blog.public_dir.join(output);
        if let Ok(html) = tokio::fs::read_to_string(&file).await {
            return Html(html).into_response();
        }
    }

    let max_age = Duration::from_secs(state.blog.config.revalidate);
    let mut guard = state.pages.lock().await;
    let pages = &mut *guard;

    if let Some(message) = pages.failures.remove(&slug) {
        return (
            StatusCode::BAD_GATEWAY,
            format!("Could not load post {}: {}", slug, message),
        )
            .into_response();
    }

    if pages.fallback.begin(&slug) {
        tracing::info!("Resolving {} on demand", slug);
        spawn_resolution(Arc::clone(&state), slug.clone());
    } else if pages.fallback.begin_revalidation(&slug, max_age) {
        tracing::debug!("Revalidating {}", slug);
        spawn_resolution(Arc::clone(&state), slug.clone());
    }

    match pages.fallback.state(&slug) {
        Some(PageState::Ready(detail)) => {
            html_response(StatusCode::OK, state.renderer.render_post(detail))
        }
        Some(PageState::NotFound) => html_response(
            StatusCode::NOT_FOUND,
            state.renderer.render_not_found(&slug),
        ),
        Some(PageState::Generating) | None => {
            html_response(StatusCode::OK, state.renderer.render_loading())
        }
    }
}

/// Look an article up in the background and record the outcome
fn spawn_resolution(state: Arc<ServerState>, slug: String) {
    tokio::spawn(async move {
        let outcome = resolve_post(state.blog.backend().content(), &state.blog.config, &slug).await;

        let mut guard = state.pages.lock().await;
        let pages = &mut *guard;
        tracing::debug!("{} on-demand pages tracked", pages.fallback.len());
        if let Some(err) = pages.fallback.complete(&slug, outcome).err() {
            tracing::error!("Failed to resolve {}: {}", slug, err);
            // A failed refresh keeps serving the previous page
            if pages.fallback.state(&slug).is_none()
                && pages.failures.len() < DEFAULT_NOT_FOUND_LIMIT
            {
                pages.failures.insert(slug, err.to_string());
            }
        }
    });
}

/// Next page of the article list, following an opaque backend cursor
async fn load_more_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LoadMoreQuery>,
) -> Response {
    let cursors = state.blog.backend().cursors();
    if !cursors.accepts_cursor(&query.cursor) {
        return (StatusCode::BAD_REQUEST, "Unsupported cursor").into_response();
    }

    let page = match cursors.fetch_cursor(&query.cursor).await {
        Ok(response) => normalize_page(&response),
        Err(e) => Err(e),
    };

    match page {
        Ok(page) => Json(Page::new(
            state.renderer.summaries(&page.items),
            page.next_cursor,
        ))
        .into_response(),
        Err(e) => {
            tracing::error!("Load more failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

fn html_response(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}
