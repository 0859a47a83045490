//! Request routing.
//!
//! A single fallback handler resolves every request against, in order: the
//! live event stream, the playground page, on-demand bundling, and static
//! files with directory-index fallback. Routing is fallible internally;
//! [`handle_request`] is the outermost boundary that converts any error into
//! a plain 500 so nothing ever propagates past the handler.

use crate::bundler::BundleOptions;
use crate::error::Result;
use crate::mime;
use crate::playground;
use crate::server::events;
use crate::server::ServerContext;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Suffix that selects the live event stream.
const EVENTS_SUFFIX: &str = ".events";

/// Suffix that selects the playground page.
const PLAYGROUND_SUFFIX: &str = ".playground";

/// Suffix that triggers on-demand bundling of a same-named source module.
const BUNDLE_SUFFIX: &str = ".bundle.js";

/// Extension substituted for the bundle suffix to locate the source module.
const BUNDLE_SOURCE_EXT: &str = ".ts";

/// Bootstrap script injected into HTML responses when live reload is on.
const LIVE_RELOAD_SCRIPT: &str = include_str!("../../assets/live-reload.js");

/// Entry point for every request.
///
/// Never fails: routing errors are logged and collapsed into a 500 response
/// here, at the outermost boundary.
pub(crate) async fn handle_request(
    State(context): State<Arc<ServerContext>>,
    request: Request,
) -> Response {
    let path = request.uri().path().to_owned();
    tracing::info!("{} {}", request.method(), path);

    match route(&context, &path).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("request for {} failed: {}", path, error);
            response(
                StatusCode::INTERNAL_SERVER_ERROR,
                mime::TEXT,
                "Internal Server Error",
            )
        }
    }
}

/// Resolve a request path to a response.
///
/// The arms are evaluated strictly in order and short-circuit; the order is
/// part of the server's contract.
async fn route(context: &ServerContext, path: &str) -> Result<Response> {
    if path.ends_with(EVENTS_SUFFIX) {
        return Ok(events::sse_response(
            Arc::clone(&context.live_reload),
            events::DEFAULT_TICK,
            context.shutdown.clone(),
        ));
    }

    if context.config.playground && path.ends_with(PLAYGROUND_SUFFIX) {
        return Ok(response(
            StatusCode::OK,
            mime::HTML,
            playground::page::PLAYGROUND_PAGE,
        ));
    }

    if context.config.bundle && path.ends_with(BUNDLE_SUFFIX) {
        return bundle(context, path).await;
    }

    serve_static(context, path).await
}

/// Bundle the source module behind a `*.bundle.js` request.
///
/// A missing source is a 404. A source that exists but fails to build is NOT
/// handled here: the error propagates to the 500 boundary, so clients can
/// tell "no such module" from "module broken".
async fn bundle(context: &ServerContext, path: &str) -> Result<Response> {
    let stem = &path[..path.len() - BUNDLE_SUFFIX.len()];
    let source_rel = format!("{}{}", stem, BUNDLE_SOURCE_EXT);

    let Some(source) = resolve_under_root(&context.config.document_root, &source_rel) else {
        return Ok(not_found());
    };

    if tokio::fs::metadata(&source).await.is_err() {
        return Ok(not_found());
    }

    let code = context
        .bundler
        .bundle(&source, &BundleOptions::default())
        .await?;

    Ok(response(StatusCode::OK, mime::JAVASCRIPT, code))
}

/// Serve a static file, falling back to the directory index.
///
/// Any path that does not resolve to a readable file falls back to
/// `document_root/directory_index`, which makes the server a single-page-app
/// catch-all; only a missing index produces a 404.
async fn serve_static(context: &ServerContext, path: &str) -> Result<Response> {
    let root = &context.config.document_root;
    let index = &context.config.directory_index;

    if path != "/" {
        let resolved_rel = if path.ends_with('/') {
            format!("{}{}", path, index)
        } else {
            path.to_string()
        };

        if let Some(target) = resolve_under_root(root, &resolved_rel) {
            if let Ok(content) = tokio::fs::read(&target).await {
                let content_type = content_type_for(&target);
                return Ok(file_response(context, content, content_type));
            }
        }
    }

    let index_path = root.join(index);
    match tokio::fs::read(&index_path).await {
        Ok(content) => {
            let content_type = content_type_for(&index_path);
            Ok(file_response(context, content, content_type))
        }
        Err(error) => {
            tracing::error!("{}: {}", index_path.display(), error);
            Ok(not_found())
        }
    }
}

/// Join a request path onto the document root, rejecting traversal.
fn resolve_under_root(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let has_traversal = Path::new(relative)
        .components()
        .any(|component| matches!(component, Component::ParentDir));

    if has_traversal {
        return None;
    }

    Some(root.join(relative))
}

/// Content type derived from a path's extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("");
    mime::from_extension(extension)
}

/// Build a file response, injecting the live-reload bootstrap into HTML when
/// the feature is on.
fn file_response(context: &ServerContext, content: Vec<u8>, content_type: &'static str) -> Response {
    let body = if context.config.live_reload && content_type.starts_with(mime::HTML) {
        inject_reload_script(&content)
    } else {
        content
    };

    response(StatusCode::OK, content_type, body)
}

/// Inject the live-reload bootstrap before the closing body tag, or append it
/// when the document has none.
fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let snippet = format!("<script>{}</script>", LIVE_RELOAD_SCRIPT);

    if let Some(position) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + snippet.len() + 2);
        result.push_str(&html[..position]);
        result.push_str(&snippet);
        result.push('\n');
        result.push_str(&html[position..]);
        return result.into_bytes();
    }

    let mut result = html.into_owned();
    result.push('\n');
    result.push_str(&snippet);
    result.into_bytes()
}

/// The canonical 404 response.
fn not_found() -> Response {
    response(StatusCode::NOT_FOUND, mime::TEXT, "Not Found")
}

/// Build a response with the server's standard header set.
///
/// Content is never browser-cached: source files may change between any two
/// requests.
fn response(status: StatusCode, content_type: &str, body: impl Into<Body>) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            "Cross-Origin-Resource-Policy",
            HeaderValue::from_static("cross-origin"),
        )
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
        .header(header::PRAGMA, HeaderValue::from_static("no-cache"))
        .body(body.into())
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_reload_script_before_closing_body() {
        let html = b"<html><body><h1>Test</h1></body></html>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();

        assert!(result.contains("new EventSource"));
        let script_pos = result.find("<script>").unwrap();
        let body_pos = result.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn test_inject_reload_script_without_body_appends() {
        let html = b"<h1>Fragment</h1>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();

        assert!(result.starts_with("<h1>Fragment</h1>"));
        assert!(result.contains("new EventSource"));
    }

    #[test]
    fn test_resolve_under_root_joins_relative() {
        let resolved = resolve_under_root(Path::new("/srv/www"), "/app/main.js").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/www/app/main.js"));
    }

    #[test]
    fn test_resolve_under_root_rejects_traversal() {
        assert!(resolve_under_root(Path::new("/srv/www"), "/../etc/passwd").is_none());
        assert!(resolve_under_root(Path::new("/srv/www"), "/a/../../etc/passwd").is_none());
    }

    #[test]
    fn test_content_type_for_paths() {
        assert_eq!(content_type_for(Path::new("a/b.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a/b.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("no-extension")), mime::BINARY);
    }

    #[test]
    fn test_response_headers() {
        let response = response(StatusCode::OK, mime::TEXT, "ok");
        let headers = response.headers();
        assert_eq!(
            headers.get("Cross-Origin-Resource-Policy").unwrap(),
            "cross-origin"
        );
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    }
}
