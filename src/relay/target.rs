//! Backend URL construction.

/// Join the backend origin, the relayed sub-path and the query string.
///
/// `origin` must already be free of a trailing `/`. Neither the path nor the
/// query is normalized; the backend is trusted to reject what it does not
/// understand.
pub fn target_url(origin: &str, sub_path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}/{}?{}", origin, sub_path, q),
        _ => format!("{}/{}", origin, sub_path),
    }
}

/// Strip the mount prefix (and the separating `/`) from a request path.
///
/// Returns `None` when the path does not live under the prefix.
pub fn sub_path<'a>(path: &'a str, mount_prefix: &str) -> Option<&'a str> {
    path.strip_prefix(mount_prefix)?.strip_prefix('/')
}
