//! HTTP server rendering the blog on request

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::cache::{CachedPage, PageCache};
use crate::client::ContentClient;
use crate::config::SiteConfig;
use crate::content::format_page;
use crate::helpers::DateFormatter;
use crate::templates::{SiteData, TemplateRenderer};
use crate::view::{DetailView, ListingController, ListingState};
use crate::Blog;

/// Upper bound on listing pages replayed for one home page request
const MAX_LISTING_PAGES: usize = 50;

/// Server state
pub struct ServerState {
    config: SiteConfig,
    client: Arc<dyn ContentClient>,
    dates: DateFormatter,
    renderer: TemplateRenderer,
    site: SiteData,
    pages: Arc<PageCache>,
}

impl ServerState {
    pub fn new(config: SiteConfig, client: Arc<dyn ContentClient>) -> Result<Self> {
        Ok(Self {
            dates: DateFormatter::from_config(&config),
            renderer: TemplateRenderer::new()?,
            site: SiteData::from(&config),
            pages: Arc::new(PageCache::new(Duration::from_secs(
                config.server.revalidate_secs,
            ))),
            config,
            client,
        })
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/api/posts", get(posts_handler))
        .route("/post/:slug", get(post_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let client: Arc<dyn ContentClient> = Arc::new(blog.client()?);
    let state = Arc::new(ServerState::new(blog.config.clone(), client)?);

    if blog.config.server.prerender {
        let state = state.clone();
        tokio::spawn(async move { prerender(&state).await });
    }

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    Ok(())
}

/// Generate the posts of the first listing page ahead of time
async fn prerender(state: &ServerState) {
    let api = &state.config.api;
    match state.client.query(&api.document_type, api.page_size).await {
        Ok(raw) => {
            let slugs: Vec<String> = raw.results.iter().filter_map(|p| p.uid.clone()).collect();
            tracing::info!("Pre-generating {} post pages", slugs.len());
            state
                .pages
                .prerender(state.client.as_ref(), &api.document_type, &state.dates, &slugs)
                .await;
        }
        Err(e) => tracing::warn!("Skipping pre-generation: {}", e),
    }
}

fn render_html(result: Result<String>, status: StatusCode) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct HomeQuery {
    pages: Option<usize>,
}

/// Home page. `?pages=N` shows the first N listing pages, which is how the
/// "load more" link advances without client-side state.
async fn home_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HomeQuery>,
) -> Response {
    let api = &state.config.api;
    let first = match state.client.query(&api.document_type, api.page_size).await {
        Ok(raw) => format_page(&raw, &state.dates),
        Err(e) => {
            tracing::error!("Failed to query posts: {}", e);
            return (StatusCode::BAD_GATEWAY, "Content API unavailable").into_response();
        }
    };

    let wanted = query.pages.unwrap_or(1).clamp(1, MAX_LISTING_PAGES);
    let mut listing = ListingController::new(first);
    let loaded = 1 + listing
        .load_pages(state.client.as_ref(), &state.dates, wanted - 1)
        .await;

    let listing: ListingState = listing.into_state();
    let load_more_href = (loaded < MAX_LISTING_PAGES).then(|| format!("/?pages={}", loaded + 1));

    render_html(
        state
            .renderer
            .render_home(&state.site, &listing, load_more_href.as_deref()),
        StatusCode::OK,
    )
}

#[derive(Debug, Deserialize)]
struct PostsQuery {
    cursor: Option<String>,
}

/// A cursor is only followed when it points back at the content API
fn cursor_allowed(endpoint: &str, cursor: &str) -> bool {
    match (Url::parse(endpoint), Url::parse(cursor)) {
        (Ok(endpoint), Ok(cursor)) => {
            endpoint.scheme() == cursor.scheme()
                && endpoint.host_str() == cursor.host_str()
                && endpoint.port_or_known_default() == cursor.port_or_known_default()
        }
        _ => false,
    }
}

/// One formatted listing page as JSON, for incremental loading from scripts
async fn posts_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostsQuery>,
) -> Response {
    let api = &state.config.api;
    let cursor = query.cursor.filter(|c| !c.trim().is_empty());

    let raw = match cursor.as_deref() {
        Some(cursor) if !cursor_allowed(&api.endpoint, cursor) => {
            return (StatusCode::BAD_REQUEST, "Invalid cursor").into_response();
        }
        Some(cursor) => state.client.fetch_page(cursor).await,
        None => state.client.query(&api.document_type, api.page_size).await,
    };

    match raw {
        Ok(raw) => Json(format_page(&raw, &state.dates)).into_response(),
        Err(e) => {
            tracing::warn!("Failed to load posts page: {}", e);
            (StatusCode::BAD_GATEWAY, "Content API unavailable").into_response()
        }
    }
}

/// Post page. Unknown pages are generated in the background while the
/// fallback view is shown.
async fn post_handler(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    let lookup = state.pages.lookup(&slug).await;

    if lookup.generate {
        let state = state.clone();
        let slug = slug.clone();
        tokio::spawn(async move {
            state
                .pages
                .generate(
                    state.client.as_ref(),
                    &state.config.api.document_type,
                    &state.dates,
                    &slug,
                )
                .await;
        });
    }

    match lookup.page {
        CachedPage::Ready(detail) => render_html(
            state
                .renderer
                .render_detail(&state.site, &DetailView::new(false, Some(detail))),
            StatusCode::OK,
        ),
        CachedPage::Generating => render_html(
            state.renderer.render_detail(&state.site, &DetailView::Fallback),
            StatusCode::OK,
        ),
        CachedPage::NotFound => render_html(
            state.renderer.render_not_found(&state.site),
            StatusCode::NOT_FOUND,
        ),
    }
}
