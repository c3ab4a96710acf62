//! API utilities for frontend-backend communication
//!
//! Requests go to the same origin by default. A page served from elsewhere can
//! point the dashboard at the gateway with
//! `<meta name="sales-report-api" content="http://host:3000">`.

/// Name of the meta tag overriding the API base
pub const API_META_NAME: &str = "sales-report-api";

/// Get the base URL for API requests
///
/// # Returns
/// - The `content` of the override meta tag, without a trailing slash
/// - Empty string (same origin) otherwise
pub fn api_base() -> String {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return String::new();
    };
    let selector = format!("meta[name=\"{}\"]", API_META_NAME);
    let content = document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"));
    normalize_base(content.as_deref())
}

fn normalize_base(content: Option<&str>) -> String {
    content
        .map(|c| c.trim().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/filters");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
