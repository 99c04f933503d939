//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/photos/{photo_id}', use [format_endpoint].

/// The public gallery.
pub const ROOT: &str = "/";
/// The authenticated gallery management page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/login";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The route that serves uploaded photos from object storage.
pub const MEDIA: &str = "/media";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/logout";
/// The route to upload photos.
pub const PHOTOS_API: &str = "/api/photos";
/// The route to delete a photo.
pub const DELETE_PHOTO: &str = "/api/photos/{photo_id}";
/// The read-only lightbox used by the public gallery.
pub const LIGHTBOX: &str = "/api/lightbox";
/// The lightbox used by the dashboard, which can delete photos.
pub const DASHBOARD_LIGHTBOX: &str = "/api/dashboard/lightbox";
/// The route to delete the photo shown in the dashboard lightbox.
pub const DELETE_LIGHTBOX_PHOTO: &str = "/api/dashboard/lightbox/{photo_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/photos/{photo_id}', '{photo_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::MEDIA);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::PHOTOS_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_PHOTO);
        assert_endpoint_is_valid_uri(endpoints::LIGHTBOX);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_LIGHTBOX);
        assert_endpoint_is_valid_uri(endpoints::DELETE_LIGHTBOX_PHOTO);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", "abc123");

        assert_eq!(formatted_path, "/hello/abc123");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", "1");

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", "1");

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", "f00d");

        assert_eq!(formatted_path, "/hello/f00d/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
