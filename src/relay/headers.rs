//! Header hygiene in both directions.
//!
//! # Request direction
//! - `host`, `content-length`, `accept-encoding` are dropped: they describe
//!   the inbound hop or the inbound encoding of a body we re-serialize
//! - Hop-by-hop headers and anything named by `Connection` are dropped
//! - Multipart requests also lose `content-type` so the client writes a new
//!   boundary
//!
//! # Response direction
//! - `content-encoding`, `content-length`, `transfer-encoding` are dropped;
//!   the client has already decoded the body and our server re-frames it
//! - Every `set-cookie` value is carried over individually

use axum::http::{header, HeaderMap, HeaderValue};

use crate::relay::body::{PayloadKind, RequestBodyKind};

/// Connection-scoped headers (RFC 9110 §7.6.1 plus the legacy ones).
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const STRIPPED_REQUEST: &[&str] = &["host", "content-length", "accept-encoding"];

const STRIPPED_RESPONSE: &[&str] = &["content-encoding", "content-length"];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.contains(&name)
}

/// Header names listed as tokens in `Connection`, lowercased.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Build the header set sent to the backend.
pub fn sanitize_request_headers(inbound: &HeaderMap, kind: RequestBodyKind) -> HeaderMap {
    let listed = connection_tokens(inbound);
    let mut outbound = HeaderMap::with_capacity(inbound.len());

    for (name, value) in inbound {
        let n = name.as_str();
        if is_hop_by_hop(n) || STRIPPED_REQUEST.contains(&n) || listed.iter().any(|t| t == n) {
            continue;
        }
        if kind == RequestBodyKind::Multipart && name == header::CONTENT_TYPE {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    outbound
}

/// Copy backend response headers onto the response returned to the caller.
pub fn copy_response_headers(backend: &HeaderMap, outbound: &mut HeaderMap, kind: PayloadKind) {
    for (name, value) in backend {
        let n = name.as_str();
        if is_hop_by_hop(n) || STRIPPED_RESPONSE.contains(&n) || name == header::SET_COOKIE {
            continue;
        }
        if kind == PayloadKind::Json && name == header::CONTENT_TYPE {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    // Session and auth cookies: one header line per cookie.
    for cookie in backend.get_all(header::SET_COOKIE) {
        outbound.append(header::SET_COOKIE, cookie.clone());
    }

    if kind == PayloadKind::Json {
        outbound.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn strips_transport_headers_from_request() {
        let inbound = headers(&[
            ("host", "portal.example.com"),
            ("connection", "keep-alive"),
            ("content-length", "42"),
            ("accept-encoding", "gzip, br"),
            ("content-type", "application/json"),
            ("cookie", "session=abc"),
            ("authorization", "Bearer t"),
        ]);

        let out = sanitize_request_headers(&inbound, RequestBodyKind::Text);

        for gone in ["host", "connection", "content-length", "accept-encoding"] {
            assert!(!out.contains_key(gone), "{gone} should be stripped");
        }
        assert_eq!(out["content-type"], "application/json");
        assert_eq!(out["cookie"], "session=abc");
        assert_eq!(out["authorization"], "Bearer t");
    }

    #[test]
    fn multipart_drops_content_type() {
        let inbound = headers(&[
            ("content-type", "multipart/form-data; boundary=abc123"),
            ("x-request-id", "r-1"),
        ]);

        let out = sanitize_request_headers(&inbound, RequestBodyKind::Multipart);
        assert!(!out.contains_key("content-type"));
        assert_eq!(out["x-request-id"], "r-1");
    }

    #[test]
    fn drops_headers_named_by_connection() {
        let inbound = headers(&[
            ("connection", "close, X-Debug-Hop"),
            ("x-debug-hop", "1"),
            ("te", "trailers"),
            ("keep-alive", "timeout=5"),
            ("x-kept", "yes"),
        ]);

        let out = sanitize_request_headers(&inbound, RequestBodyKind::None);
        assert_eq!(out.len(), 1);
        assert_eq!(out["x-kept"], "yes");
    }

    #[test]
    fn keeps_repeated_request_headers() {
        let inbound = headers(&[("x-tag", "a"), ("x-tag", "b")]);
        let out = sanitize_request_headers(&inbound, RequestBodyKind::None);
        let values: Vec<_> = out.get_all("x-tag").iter().collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn response_drops_encoding_headers_and_keeps_cookies() {
        let backend = headers(&[
            ("content-type", "text/plain"),
            ("content-encoding", "gzip"),
            ("content-length", "10"),
            ("transfer-encoding", "chunked"),
            ("set-cookie", "session=abc; HttpOnly"),
            ("set-cookie", "role=ORG_HR; Path=/"),
            ("cache-control", "no-store"),
        ]);

        let mut out = HeaderMap::new();
        copy_response_headers(&backend, &mut out, PayloadKind::Text);

        assert!(!out.contains_key("content-encoding"));
        assert!(!out.contains_key("content-length"));
        assert!(!out.contains_key("transfer-encoding"));
        assert_eq!(out["content-type"], "text/plain");
        assert_eq!(out["cache-control"], "no-store");
        let cookies: Vec<_> = out.get_all("set-cookie").iter().collect();
        assert_eq!(cookies, ["session=abc; HttpOnly", "role=ORG_HR; Path=/"]);
    }

    #[test]
    fn json_response_gets_plain_json_content_type() {
        let backend = headers(&[("content-type", "application/json; charset=utf-8")]);

        let mut out = HeaderMap::new();
        copy_response_headers(&backend, &mut out, PayloadKind::Json);

        let types: Vec<_> = out.get_all("content-type").iter().collect();
        assert_eq!(types, ["application/json"]);
    }
}
