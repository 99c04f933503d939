//! Ends the session and sends the couple back to the public gallery.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::SessionConfig, endpoints};

/// End the session and redirect to the public gallery.
pub async fn get_log_out(State(sessions): State<SessionConfig>, jar: PrivateCookieJar) -> Response {
    tracing::info!("Logged out");

    (sessions.end(jar), Redirect::to(endpoints::ROOT)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{
        extract::{FromRef, State},
        http::StatusCode,
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use time::Duration;

    use crate::{
        auth::{OWNER_ID, SESSION_COOKIE, SessionConfig, session::SESSION_DURATION},
        endpoints,
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_discards_session_and_returns_to_gallery() {
        let sessions = SessionConfig::new("garter");
        let jar = sessions
            .start(
                PrivateCookieJar::new(Key::from_ref(&sessions)),
                OWNER_ID,
                SESSION_DURATION,
            )
            .unwrap();

        let response = get_log_out(State(sessions), jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], endpoints::ROOT);
        let session = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .expect("No session cookie was set");
        assert_eq!(session.max_age(), Some(Duration::ZERO));
        assert_eq!(session.path(), Some("/"));
    }
}
