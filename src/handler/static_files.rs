//! Static asset / SPA fallback resolver
//!
//! Resolution order for a request path:
//! 1. an existing file under the asset root,
//! 2. the configured index document (client-side routing takes over),
//! 3. the plain-text availability banner.
//!
//! An unconfigured asset root short-circuits to a 404.

use crate::config::AssetsConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, cache::CachePolicy, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub const UNCONFIGURED_MESSAGE: &str = "Static folder not configured";

/// Outcome of resolving a request path against the asset root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// File bytes to serve; `is_index` marks the SPA fallback document
    Asset {
        path: PathBuf,
        content: Vec<u8>,
        is_index: bool,
    },
    Banner,
    Unconfigured,
}

/// Resolve and serve a request path from the asset root
pub async fn serve_assets(ctx: &RequestContext<'_>, assets: &AssetsConfig) -> Response<Full<Bytes>> {
    match resolve(assets, ctx.path).await {
        Resolution::Asset {
            path,
            content,
            is_index,
        } => {
            let policy = if is_index {
                CachePolicy::NoCache
            } else {
                CachePolicy::default()
            };
            build_asset_response(
                content,
                mime::content_type_for(&path),
                policy,
                ctx.if_none_match.as_deref(),
                ctx.range_header.as_deref(),
            )
        }
        Resolution::Banner => http::build_text_response(StatusCode::OK, &assets.banner),
        Resolution::Unconfigured => {
            http::build_text_response(StatusCode::NOT_FOUND, UNCONFIGURED_MESSAGE)
        }
    }
}

/// Map a request path to the file that should answer it
pub async fn resolve(assets: &AssetsConfig, request_path: &str) -> Resolution {
    let Some(root) = assets.root_dir() else {
        return Resolution::Unconfigured;
    };

    match sanitize_path(request_path) {
        Some(relative) if !relative.as_os_str().is_empty() => {
            if let Some((path, content)) = read_within_root(root, &root.join(&relative)).await {
                return Resolution::Asset {
                    path,
                    content,
                    is_index: false,
                };
            }
        }
        // Root path goes straight to the index document
        Some(_) => {}
        None => logger::log_warning(&format!("Rejected unsafe asset path: {request_path}")),
    }

    let index = root.join(&assets.index_file);
    if let Some((path, content)) = read_within_root(root, &index).await {
        return Resolution::Asset {
            path,
            content,
            is_index: true,
        };
    }

    Resolution::Banner
}

/// Turn a URL path into a relative filesystem path
///
/// Each segment is percent-decoded before it is checked, so `%20` and
/// encoded UTF-8 names reach the file on disk while `%2e%2e` and `%2f` are
/// still rejected. Empty and `.` segments are dropped. `..`, backslashes,
/// NUL bytes, invalid UTF-8 and anything the platform would read as a root
/// or prefix make the whole path unresolvable.
pub fn sanitize_path(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();

    for raw in request_path.split('/') {
        let segment = urlencoding::decode(raw).ok()?;
        match segment.as_ref() {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => {
                let mut components = Path::new(s).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(part)), None) => relative.push(part),
                    _ => return None,
                }
            }
        }
    }

    Some(relative)
}

/// Read `candidate` if it is a regular file that stays inside `root` after
/// resolving symlinks
async fn read_within_root(root: &Path, candidate: &Path) -> Option<(PathBuf, Vec<u8>)> {
    // Missing files are the common case (SPA routes), not worth logging
    let metadata = fs::metadata(candidate).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };
    let candidate_canonical = fs::canonicalize(candidate).await.ok()?;
    if !candidate_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            candidate.display(),
            candidate_canonical.display()
        ));
        return None;
    }

    match fs::read(&candidate_canonical).await {
        Ok(content) => Some((candidate.to_path_buf(), content)),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                candidate.display()
            ));
            None
        }
    }
}

/// Build file response with `ETag`, conditional GET and Range support
fn build_asset_response(
    content: Vec<u8>,
    content_type: &str,
    policy: CachePolicy,
    if_none_match: Option<&str>,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);
    let total_size = content.len();

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let body = Bytes::from(content).slice(range.start..=range.end);
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                range,
                total_size,
                policy,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            http::response::build_cached_response(Bytes::from(content), content_type, &etag, policy)
        }
    }
}
