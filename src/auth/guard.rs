//! Middleware that keeps the dashboard and its API behind the log-in page.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;

use crate::auth::{SessionConfig, redirect::log_in_url, session::read_session};

/// How a request without a session is sent to the log-in page.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    /// A browser navigation, answered with `303 See Other`.
    Page,
    /// An htmx request, answered with an `HX-Redirect` header since htmx does
    /// not follow redirects into a full page load.
    Htmx,
}

impl Rejection {
    fn respond(self, log_in_url: String) -> Response {
        match self {
            Rejection::Page => Redirect::to(&log_in_url).into_response(),
            Rejection::Htmx => (HxRedirect(log_in_url), StatusCode::OK).into_response(),
        }
    }
}

async fn guard(
    sessions: SessionConfig,
    jar: PrivateCookieJar,
    request: Request,
    next: Next,
    rejection: Rejection,
) -> Response {
    if let Err(error) = read_session(&jar) {
        tracing::debug!("Sending {} to log in: {error}", request.uri().path());
        return rejection.respond(log_in_url(&request));
    }

    let response = next.run(request).await;

    match sessions.refresh(jar) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("Could not refresh the session: {error}");
            response
        }
    }
}

/// Let requests with a valid session through and refresh the session
/// afterwards. Other requests are redirected to the log-in page, which
/// returns them to the page they asked for.
pub async fn auth_guard(
    State(sessions): State<SessionConfig>,
    jar: PrivateCookieJar,
    request: Request,
    next: Next,
) -> Response {
    guard(sessions, jar, request, next, Rejection::Page).await
}

/// [auth_guard] for htmx endpoints. Requests without a session get an
/// `HX-Redirect` to the log-in page, which returns them to the page that
/// made the request.
pub async fn auth_guard_hx(
    State(sessions): State<SessionConfig>,
    jar: PrivateCookieJar,
    request: Request,
    next: Next,
) -> Response {
    guard(sessions, jar, request, next, Rejection::Htmx).await
}
