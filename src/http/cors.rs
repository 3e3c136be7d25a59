//! Cross-origin resource sharing
//!
//! Resolves the `Access-Control-Allow-Origin` value against the configured
//! allowlist and decorates responses with it.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, VARY};
use hyper::Response;

/// Value for `Access-Control-Allow-Origin`, or `None` when the origin is not allowed
///
/// A `*` entry allows every origin and is echoed back as `*`; otherwise the
/// request's `Origin` is echoed when it is on the list.
pub fn allowed_origin(allowed: &[String], origin: Option<&str>) -> Option<String> {
    if allowed.iter().any(|o| o == "*") {
        return Some("*".to_string());
    }
    let origin = origin?;
    allowed
        .iter()
        .any(|o| o.eq_ignore_ascii_case(origin))
        .then(|| origin.to_string())
}

/// Add CORS response headers in place
pub fn apply_cors_headers(
    response: &mut Response<Full<Bytes>>,
    allowed: &[String],
    origin: Option<&str>,
) {
    let Some(value) = allowed_origin(allowed, origin) else {
        return;
    };
    let wildcard = value == "*";
    let Ok(value) = HeaderValue::from_str(&value) else {
        return;
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    if !wildcard {
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_wildcard_allows_any_origin() {
        let allowed = origins(&["*"]);
        assert_eq!(allowed_origin(&allowed, None).as_deref(), Some("*"));
        assert_eq!(
            allowed_origin(&allowed, Some("https://a.example")).as_deref(),
            Some("*")
        );
    }

    #[test]
    fn test_allowlist_echoes_origin() {
        let allowed = origins(&["https://clinic.example"]);
        assert_eq!(
            allowed_origin(&allowed, Some("https://clinic.example")).as_deref(),
            Some("https://clinic.example")
        );
        assert!(allowed_origin(&allowed, Some("https://evil.example")).is_none());
        assert!(allowed_origin(&allowed, None).is_none());
    }

    #[test]
    fn test_apply_sets_vary_for_echoed_origin() {
        let allowed = origins(&["https://clinic.example"]);
        let mut response = Response::new(Full::new(Bytes::new()));
        apply_cors_headers(&mut response, &allowed, Some("https://clinic.example"));
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://clinic.example"
        );
        assert_eq!(response.headers()[VARY], "Origin");

        let mut rejected = Response::new(Full::new(Bytes::new()));
        apply_cors_headers(&mut rejected, &allowed, Some("https://evil.example"));
        assert!(rejected.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
