//! Where to send the couple after they log in.
//!
//! A redirect target is only accepted if it is a local path, so a crafted
//! `redirect_url` cannot send someone to another site.

use axum::{
    extract::Request,
    http::{HeaderMap, Uri},
};

use crate::endpoints;

const API_PREFIX: &str = "/api";

/// Pages that make no sense to return to after logging in.
const EXCLUDED_TARGETS: [&str; 2] = [endpoints::LOG_IN_VIEW, endpoints::LOG_OUT];

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    !EXCLUDED_TARGETS.contains(&path)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Parse `raw_url` and return it if it is a safe, local redirect target.
///
/// Absolute URLs are rejected even if they point at this server.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

/// The log-in page URL that returns the client to where `request` came from.
///
/// Page requests return to the requested page. htmx requests to `/api`
/// return to the page that made them, taken from `HX-Current-URL`. Anything
/// else returns to the dashboard.
pub fn log_in_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with(API_PREFIX) {
        redirect_target_from_hx_headers(request.headers())
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let target = target.unwrap_or_else(|| {
        tracing::warn!(
            "No return address for {}, returning to the dashboard after log-in.",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    match serde_urlencoded::to_string([("redirect_url", &target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn redirect_target_from_hx_headers(headers: &HeaderMap) -> Option<String> {
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    // htmx sends the full URL of the current page, so only its path is kept.
    let redirect_url = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| local_path_and_query(&uri));

    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod redirect_tests {
    use axum::{body::Body, http::Request};

    use crate::endpoints;

    use super::{log_in_url, normalize_redirect_url};

    #[test]
    fn accepts_local_paths_with_query() {
        assert_eq!(
            normalize_redirect_url("/dashboard?category=Party"),
            Some("/dashboard?category=Party".to_owned())
        );
    }

    #[test]
    fn rejects_other_sites() {
        assert_eq!(normalize_redirect_url("https://example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("//example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("dashboard"), None);
    }

    #[test]
    fn rejects_log_in_and_log_out() {
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN_VIEW), None);
        assert_eq!(
            normalize_redirect_url(&format!("{}?redirect_url=%2F", endpoints::LOG_IN_VIEW)),
            None
        );
        assert_eq!(normalize_redirect_url(endpoints::LOG_OUT), None);
    }

    #[test]
    fn page_request_returns_to_page() {
        let request = Request::builder()
            .uri("/dashboard?view=upload")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            log_in_url(&request),
            "/login?redirect_url=%2Fdashboard%3Fview%3Dupload"
        );
    }

    #[test]
    fn htmx_request_returns_to_current_page() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/photos/1")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/dashboard?category=Details")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            log_in_url(&request),
            "/login?redirect_url=%2Fdashboard%3Fcategory%3DDetails"
        );
    }

    #[test]
    fn api_request_without_htmx_headers_returns_to_dashboard() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/photos/1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(log_in_url(&request), "/login?redirect_url=%2Fdashboard");
    }
}
