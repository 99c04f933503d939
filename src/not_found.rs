//! The page shown when a route or photo does not exist.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_page;

/// Route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// The 404 page as a response.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_page(
            StatusCode::NOT_FOUND,
            "There's nothing here.",
            "The page or photo may have been moved or deleted.",
        ),
    )
        .into_response()
}
