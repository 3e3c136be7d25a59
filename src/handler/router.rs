//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body-size
//! check, API dispatch, asset fallback, then CORS, `Server` header, `HEAD`
//! stripping and access logging on the way out.

use crate::api;
use crate::config::{AppState, HttpConfig};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: no route reads a request body, so it is
/// dropped up front and only the request head is carried across awaits.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (head, _) = req.into_parts();
    let path = head.uri.path();
    let http_config = &state.config.http;
    let origin = header_str(&head.headers, "origin");

    logger::log_headers_count(head.headers.len(), state.config.logging.show_headers);

    let mut response = match check_request(&head, http_config, origin) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path,
                if_none_match: header_str(&head.headers, "if-none-match").map(ToString::to_string),
                range_header: header_str(&head.headers, "range").map(ToString::to_string),
            };
            route_request(&ctx, &state).await
        }
    };

    if http_config.enable_cors && !response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
        http::apply_cors_headers(&mut response, &http_config.allowed_origins, origin);
    }
    if let Ok(server) = HeaderValue::from_str(&http_config.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    let is_head = head.method == Method::HEAD;
    let body_bytes = if is_head {
        let (parts, _) = response.into_parts();
        response = Response::from_parts(parts, Full::new(Bytes::new()));
        0
    } else {
        usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
    };

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            head.method.to_string(),
            path.to_string(),
        );
        entry.query = head.uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(head.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_bytes;
        entry.referer = header_str(&head.headers, "referer").map(ToString::to_string);
        entry.user_agent = header_str(&head.headers, "user-agent").map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Answer requests that never reach a route: preflight, bad method, oversized body
fn check_request(
    head: &Parts,
    http_config: &HttpConfig,
    origin: Option<&str>,
) -> Option<Response<Full<Bytes>>> {
    match head.method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => {
            let allow_origin = if http_config.enable_cors {
                http::allowed_origin(&http_config.allowed_origins, origin)
            } else {
                None
            };
            let request_headers = header_str(&head.headers, "access-control-request-headers");
            return Some(http::build_options_response(
                allow_origin.as_deref(),
                request_headers,
            ));
        }
        ref other => {
            logger::log_warning(&format!("Method not allowed: {other} {}", head.uri.path()));
            return Some(http::build_405_response());
        }
    }

    check_body_size(&head.headers, http_config.max_body_size)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size_str = header_str(headers, "content-length")?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Fixed-payload endpoints first, everything else goes to the asset resolver
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(response) = api::dispatch(ctx.path, state.provider.as_ref()) {
        return response;
    }

    static_files::serve_assets(ctx, &state.config.assets).await
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
