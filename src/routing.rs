//! Application router configuration with protected and unprotected route definitions.

use std::path::Path;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::{delete_photo_endpoint, get_dashboard_page},
    endpoints,
    gallery::get_gallery_page,
    internal_server_error::get_internal_server_error_page,
    lightbox::{delete_lightbox_photo, get_dashboard_lightbox, get_lightbox},
    not_found::get_404_not_found,
    upload::upload_photos_endpoint,
};

/// Return a router with all the app's routes.
///
/// Uploaded photos are served from `media_dir` under [endpoints::MEDIA].
pub fn build_router(state: AppState, media_dir: &Path) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_gallery_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::LIGHTBOX, get(get_lightbox))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // htmx requests need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::PHOTOS_API,
                post(upload_photos_endpoint)
                    .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
            )
            .route(endpoints::DELETE_PHOTO, delete(delete_photo_endpoint))
            .route(endpoints::DASHBOARD_LIGHTBOX, get(get_dashboard_lightbox))
            .route(
                endpoints::DELETE_LIGHTBOX_PHOTO,
                delete(delete_lightbox_photo),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .nest_service(endpoints::MEDIA, ServeDir::new(media_dir))
        .fallback(get_404_not_found)
        .with_state(state)
}
