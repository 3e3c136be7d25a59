//! HTTP response building module
//!
//! Builders for the status responses the router emits, decoupled from routing.
//! Bodies are always filled in; `HEAD` stripping happens once in the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cache::CachePolicy;
use super::range::ByteRange;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text response with the given status
pub fn build_text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(body.to_owned())))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut response = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Headers allowed at preflight when the request does not name any
pub const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization, Range";

/// Build OPTIONS response (preflight request)
///
/// `allow_origin` is the resolved CORS origin, `None` when CORS is off or the
/// origin is not allowed. `request_headers` is the preflight's
/// `Access-Control-Request-Headers`, echoed back as the allowed list.
pub fn build_options_response(
    allow_origin: Option<&str>,
    request_headers: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOWED_METHODS);

    if let Some(origin) = allow_origin {
        builder = builder
            .header("Access-Control-Allow-Origin", origin)
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header(
                "Access-Control-Allow-Headers",
                request_headers
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .unwrap_or(DEFAULT_ALLOWED_HEADERS),
            )
            .header("Access-Control-Max-Age", "86400")
            .header("Vary", "Access-Control-Request-Headers");
        if origin != "*" {
            builder = builder.header("Vary", "Origin");
        }
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("Range Not Satisfiable")))
        })
}

/// Build 200 response for a file with cache validators
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response; `data` is the already-sliced range
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    total_size: usize,
    policy: CachePolicy,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Content-Length", range.len())
        .header(
            "Content-Range",
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response_headers() {
        let response = build_text_response(StatusCode::NOT_FOUND, "missing");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-length"], "7");
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let response = build_405_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], ALLOWED_METHODS);
    }

    #[test]
    fn test_options_without_cors() {
        let response = build_options_response(None, Some("X-Client-Version"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
        assert!(response
            .headers()
            .get("access-control-allow-headers")
            .is_none());
    }

    #[test]
    fn test_options_allowed_headers() {
        let response =
            build_options_response(Some("*"), Some("x-client-version, content-type"));
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            "x-client-version, content-type"
        );

        let response = build_options_response(Some("*"), None);
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            DEFAULT_ALLOWED_HEADERS
        );
    }

    #[test]
    fn test_partial_response_range_header() {
        let range = ByteRange { start: 2, end: 5 };
        let response = build_partial_response(
            Bytes::from_static(b"cdef"),
            "text/plain",
            "\"e\"",
            range,
            10,
            CachePolicy::default(),
        );
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()["content-range"], "bytes 2-5/10");
        assert_eq!(response.headers()["content-length"], "4");
    }
}
