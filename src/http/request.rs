//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Rebuild the absolute URL the client asked for (scheme, host, path, query)
//! - Normalize the `Referer` header to present-or-absent
//!
//! # Design Decisions
//! - `X-Forwarded-Proto` is honoured only when the deployment trusts its CDN
//! - A host carrying path or userinfo delimiters is rejected outright

use axum::http::{header, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

use crate::config::HostsConfig;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Issues a fresh UUID v4 for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Request ID assigned by the request-id layer, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Rebuild the absolute URL of `request`.
///
/// Returns `None` when no usable host is available.
pub fn absolute_url<B>(request: &Request<B>, hosts: &HostsConfig) -> Option<Url> {
    let host = request
        .uri()
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| {
            request
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
        })
        .map(str::trim)
        .filter(|host| is_plain_host(host))?;

    let scheme = hosts
        .trust_forwarded_proto
        .then(|| forwarded_proto(request))
        .flatten()
        .or_else(|| request.uri().scheme_str())
        .unwrap_or(hosts.default_scheme.as_str());

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let url = Url::parse(&format!("{scheme}://{host}{path}")).ok()?;
    url.host().is_some().then_some(url)
}

/// Referrer of `request`; missing, empty or non-UTF-8 values are absent.
pub fn normalize_referer(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn forwarded_proto<B>(request: &Request<B>) -> Option<&str> {
    let value = request.headers().get(&X_FORWARDED_PROTO)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.eq_ignore_ascii_case("https") {
        Some("https")
    } else if first.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .bytes()
            .any(|b| matches!(b, b'/' | b'?' | b'#' | b'@' | b'\\') || b.is_ascii_whitespace())
}
