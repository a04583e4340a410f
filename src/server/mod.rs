//! Development server
//!
//! Serves the generated public directory. Unknown routes get the generated
//! 404 page with a not-found status; the feed is served as a plain `.xml`
//! static artifact. In watch mode the site is rebuilt on content changes
//! and connected browsers reload over a WebSocket.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{ws::Message, State, WebSocketUpgrade},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tower_http::services::ServeDir;

use crate::Folio;

/// Script appended to served HTML pages in watch mode
const RELOAD_SNIPPET: &str = concat!(
    "<script>new WebSocket('ws://'+location.host+'/__reload')",
    ".onmessage=function(){location.reload()};</script>"
);

struct AppState {
    public_dir: PathBuf,
    /// Bumped after every successful rebuild
    build_rx: watch::Receiver<u64>,
    watch_mode: bool,
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch_mode: bool) -> Result<()> {
    let (build_tx, build_rx) = watch::channel(0u64);

    let state = Arc::new(AppState {
        public_dir: folio.public_dir.clone(),
        build_rx,
        watch_mode,
    });

    if watch_mode {
        let site = folio.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = rebuild_on_change(site, build_tx) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let app = Router::new()
        .route("/__reload", get(reload_socket))
        .fallback(serve_page)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch_mode {
        println!("Watching for changes; pages reload automatically.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Blocking loop: watch content, static assets, and config; rebuild on
/// change and bump the build counter so connected clients reload.
fn rebuild_on_change(site: Folio, build_tx: watch::Sender<u64>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(400), tx)?;

    let watched = [
        (site.content_dir(), RecursiveMode::Recursive),
        (site.static_dir(), RecursiveMode::Recursive),
        (site.base_dir.join("config.yml"), RecursiveMode::NonRecursive),
    ];
    for (path, mode) in &watched {
        if path.exists() {
            debouncer.watcher().watch(path, *mode)?;
            tracing::debug!("Watching: {}", path.display());
        }
    }

    let mut build_count = 0u64;
    while let Ok(batch) = rx.recv() {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        if events.iter().all(|e| is_ignored(&e.path)) {
            continue;
        }
        for event in &events {
            tracing::info!("File changed: {}", event.path.display());
        }

        match site.generate() {
            Ok(_) => {
                build_count += 1;
                let _ = build_tx.send(build_count);
                tracing::info!("Regenerated");
            }
            Err(e) => {
                // Leave the last good output in place; the author fixes
                // the content and saves again.
                tracing::error!("Generation failed: {:#}", e);
            }
        }
    }

    Ok(())
}

/// Editor droppings and VCS noise never trigger a rebuild
fn is_ignored(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path.contains(".git") || path.ends_with('~') || path.ends_with(".swp")
}

/// WebSocket endpoint: sends one message per completed rebuild
async fn reload_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mut build_rx = state.build_rx.clone();
    ws.on_upgrade(move |mut socket| async move {
        while build_rx.changed().await.is_ok() {
            if socket
                .send(Message::Text("reload".to_string()))
                .await
                .is_err()
            {
                break;
            }
        }
    })
}

/// Map a request path onto the generated tree and serve it
async fn serve_page(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let Some(file) = resolve_request_path(&state.public_dir, request.uri().path()) else {
        return not_found(&state).await;
    };

    let is_html = file
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.watch_mode {
        match tokio::fs::read_to_string(&file).await {
            Ok(mut html) => {
                html.push_str(RELOAD_SNIPPET);
                Html(html).into_response()
            }
            Err(_) => not_found(&state).await,
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Resolve a URL path to a file in the public directory.
///
/// `/` and directory paths map to their `index.html`; a bare path falls
/// back to `<path>.html`. `None` means the route has nothing behind it.
fn resolve_request_path(public_dir: &Path, url_path: &str) -> Option<PathBuf> {
    let trimmed = url_path.trim_matches('/');
    if trimmed.contains("..") {
        return None;
    }

    let candidates = if trimmed.is_empty() {
        vec![public_dir.join("index.html")]
    } else {
        let direct = public_dir.join(trimmed);
        vec![
            direct.join("index.html"),
            direct.clone(),
            public_dir.join(format!("{}.html", trimmed)),
        ]
    };

    candidates.into_iter().find(|p| p.is_file())
}

/// Serve the generated 404 page; an unknown slug is a normal outcome
async fn not_found(state: &AppState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(mut html) => {
            if state.watch_mode {
                html.push_str(RELOAD_SNIPPET);
            }
            (StatusCode::NOT_FOUND, Html(html)).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}
