/*!
 * Static frontend serving.
 *
 * Serves the prebuilt single-page application from a root directory. Unknown
 * paths fall back to `index.html` so client-side routes resolve; paths that
 * would leave the root are refused.
 */
use std::path::{Component, Path, PathBuf};

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::server::AppState;

/// Cache policy of fingerprinted assets
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000";

/// Cache policy of everything else
pub const CACHE_NONE: &str = "no-cache";

const INDEX_FILE: &str = "index.html";

static HASHED_ASSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*-[a-f0-9]+\.(js|css|png|jpg|jpeg|gif|svg|woff|woff2|ttf|eot)$")
        .expect("valid asset pattern")
});

/// Content type of a file, by extension
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") | Some("map") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Whether a file (relative to the root) is a long-lived asset
pub fn is_static_asset(relative: &Path) -> bool {
    let in_assets_dir = relative
        .parent()
        .map(|dir| dir.components().any(|c| c.as_os_str() == "assets"))
        .unwrap_or(false);
    if in_assets_dir {
        return true;
    }

    relative
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| HASHED_ASSET.is_match(&name.to_ascii_lowercase()))
        .unwrap_or(false)
}

/// Lexically resolve a request path against the root.
///
/// Returns `None` when the path would escape the root.
pub fn normalize_request_path(path: &str) -> Option<PathBuf> {
    let relative = path.strip_prefix('/').unwrap_or(path);
    let mut normalized = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(normalized)
}

/// The frontend bundle served for non-API paths
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Serve files below `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Respond to a request for `raw_path` (the undecoded URL path)
    pub async fn respond(&self, raw_path: &str) -> Response {
        let decoded = match urlencoding::decode(raw_path) {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                debug!("Rejecting undecodable path {}: {}", raw_path, e);
                return text_response(StatusCode::FORBIDDEN, "Forbidden".to_string());
            }
        };
        let path = if decoded == "/" {
            format!("/{}", INDEX_FILE)
        } else {
            decoded
        };

        let Some(relative) = normalize_request_path(&path) else {
            debug!("Rejecting path outside the frontend root: {}", path);
            return text_response(StatusCode::FORBIDDEN, "Forbidden".to_string());
        };

        if !relative.as_os_str().is_empty() && is_file(&self.root.join(&relative)).await {
            return self.serve_file(&relative).await;
        }

        let index = PathBuf::from(INDEX_FILE);
        if is_file(&self.root.join(&index)).await {
            return self.serve_file(&index).await;
        }

        text_response(StatusCode::NOT_FOUND, format!("Not found: {}", path))
    }

    async fn serve_file(&self, relative: &Path) -> Response {
        let full = self.root.join(relative);
        match tokio::fs::read(&full).await {
            Ok(content) => {
                let cache = if is_static_asset(relative) {
                    CACHE_IMMUTABLE
                } else {
                    CACHE_NONE
                };
                (
                    StatusCode::OK,
                    [(CONTENT_TYPE, content_type(relative)), (CACHE_CONTROL, cache)],
                    content,
                )
                    .into_response()
            }
            Err(e) => {
                error!("Failed to read {}: {}", full.display(), e);
                text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {}", e),
                )
            }
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

fn text_response(status: StatusCode, message: String) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], message).into_response()
}

/// Fallback handler serving the frontend
pub async fn serve(State(state): State<AppState>, uri: Uri) -> Response {
    state.static_files().respond(uri.path()).await
}
