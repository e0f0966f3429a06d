use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use notify::{Event, RecursiveMode, Watcher};
use serde::Serialize;
use tower_livereload::LiveReloadLayer;

use crate::config::FlipbookConfig;
use crate::page::Page;
use crate::probe::FsProbe;
use crate::runtime::{wrap_viewer_html, ShellOptions};

pub(crate) mod util;

/// Shared state for the dev server routes.
pub struct DevState {
    root: PathBuf,
    config: FlipbookConfig,
    shell: ShellOptions,
}

impl DevState {
    pub fn new(root: PathBuf, config: FlipbookConfig, shell: ShellOptions) -> Self {
        Self {
            root,
            config,
            shell,
        }
    }
}

/// Routes without live reload: `/` host page, `/pages.json`, and static
/// files from the book directory. Every `GET` route also answers `HEAD`.
pub fn router(state: DevState) -> Router {
    Router::new()
        .route("/", get(serve_shell))
        .route("/index.html", get(serve_shell))
        .route("/pages.json", get(serve_pages))
        .route("/{*path}", get(serve_file))
        .with_state(Arc::new(state))
}

/// Serve a book directory with hot reload on asset changes.
pub async fn run_dev_server(state: DevState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    let watch_path = state.root.clone();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove() {
                tracing::debug!(paths = ?event.paths, "book changed, reloading");
                reloader.reload();
            }
        }
    })?;
    watcher.watch(&watch_path, RecursiveMode::Recursive)?;

    let app = router(state).layer(livereload);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    eprintln!("flipbook dev server");
    eprintln!("  book:    {}", watch_path.display());
    eprintln!("  viewer:  http://localhost:{port}/");
    eprintln!("  pages:   http://localhost:{port}/pages.json");
    eprintln!("  watching for changes...");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    // Keep watcher alive
    drop(watcher);
    Ok(())
}

// ── Route handlers ────────────────────────────────────────────────────

async fn serve_shell(State(state): State<Arc<DevState>>) -> Html<String> {
    Html(wrap_viewer_html(&state.config, &state.shell))
}

#[derive(Serialize)]
struct PagesResponse {
    pages: Vec<Page>,
    video_page: Option<u32>,
    error: Option<String>,
}

/// Discovery result for the book directory, as the local-file probe sees it.
async fn serve_pages(State(state): State<Arc<DevState>>) -> Json<PagesResponse> {
    let probe = FsProbe::new(state.root.clone());
    match crate::discovery::discover(&probe, &state.config.assets).await {
        Ok(book) => Json(PagesResponse {
            video_page: book.video_page(),
            pages: book.pages().to_vec(),
            error: None,
        }),
        Err(e) => Json(PagesResponse {
            pages: Vec::new(),
            video_page: None,
            error: Some(e.to_string()),
        }),
    }
}

async fn serve_file(State(state): State<Arc<DevState>>, Path(path): Path<String>) -> Response {
    let Some(file) = util::resolve_under(&state.root, &path) else {
        return StatusCode::FORBIDDEN.into_response();
    };
    match tokio::fs::read(&file).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, util::content_type(&file))], bytes).into_response(),
        Err(e) => {
            tracing::trace!(path = %file.display(), "not served: {e}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
