//! Development server for the Playroom web shell
//!
//! Serves `web/` (or `PLAYROOM_WEB_DIR`) on `PORT` (default 8080) with the
//! MIME types browsers insist on for module scripts and wasm.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::get_service,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WEB_DIR: &str = "web";
const SERVICE_WORKER: &str = "/sw.js";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let web_dir = std::env::var_os("PLAYROOM_WEB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_DIR));

    if !web_dir.is_dir() {
        error!(dir = %web_dir.display(), "web directory not found");
        std::process::exit(1);
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let serve_dir = ServeDir::new(&web_dir)
        .precompressed_gzip()
        .precompressed_br();

    let app = Router::new()
        .fallback_service(get_service(serve_dir).handle_error(|err| async move {
            error!(%err, "static file error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(add_headers))
                .layer(CorsLayer::permissive()),
        );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, %err, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(url = %format!("http://localhost:{port}"), dir = %web_dir.display(), "serving playroom");

    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "server stopped");
    }
}

/// Content type for a request path, when the default guess is wrong for browsers
fn content_type(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "js" | "mjs" => Some("application/javascript; charset=utf-8"),
        "wasm" => Some("application/wasm"),
        "css" => Some("text/css; charset=utf-8"),
        "html" => Some("text/html; charset=utf-8"),
        "json" | "webmanifest" => Some("application/json; charset=utf-8"),
        _ => None,
    }
}

/// Fix MIME types and keep the service worker fresh
async fn add_headers(request: Request<Body>, next: axum::middleware::Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();
    let headers = response.headers_mut();

    if status.is_success() {
        if let Some(mime) = content_type(&path) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        }
    }
    if path == SERVICE_WORKER {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    tracing::debug!(%path, %status, "request");
    response
}
