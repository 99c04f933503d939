//! The log-in page and the form handler that checks the dashboard password.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{
        OWNER_ID, SessionConfig, UserID, get_user_by_id, normalize_redirect_url,
        session::REMEMBERED_SESSION_DURATION,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        spinner,
    },
};

/// The state needed to check the password and start a session.
#[derive(Debug, Clone)]
pub struct LogInState {
    sessions: SessionConfig,
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        Key::from_ref(&state.sessions)
    }
}

/// The query string of the log-in page.
#[derive(Debug, Deserialize)]
pub struct LogInQuery {
    redirect_url: Option<String>,
}

/// The fields of the log-in form.
#[derive(Deserialize)]
pub struct LogInForm {
    password: String,
    /// A checkbox, so any value means it was ticked.
    remember_me: Option<String>,
    redirect_url: Option<String>,
}

/// Why a log-in attempt was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogInError {
    WrongPassword,
    PasswordNotSet,
    Internal,
}

impl LogInError {
    fn message(self) -> &'static str {
        match self {
            LogInError::WrongPassword => "That password is not right. Please try again.",
            LogInError::PasswordNotSet => {
                "No password has been set yet. Run set_password on the server first."
            }
            LogInError::Internal => "Something went wrong. Check the server logs and try again.",
        }
    }
}

fn log_in_form(redirect_url: Option<&str>, error: Option<LogInError>) -> Markup {
    html! {
        form
            id="log-in-form"
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-disabled-elt="find button"
            class="space-y-5"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Gallery password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    autocomplete="current-password"
                    class=(FORM_TEXT_INPUT_STYLE)
                    aria-invalid=[error.map(|_| "true")]
                    required
                    autofocus;

                @if let Some(error) = error {
                    p id="log-in-error" role="alert" class="mt-2 text-sm text-red-600 dark:text-red-400"
                    {
                        (error.message())
                    }
                }
            }

            label class="flex items-center gap-2 text-sm text-gray-700 dark:text-gray-300"
            {
                input type="checkbox" name="remember_me" class="rounded-xs";
                "Stay logged in on this device for a week"
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                (spinner())
                "Open the dashboard"
            }
        }
    }
}

/// Keep `raw_url` only if it points back into this site.
fn safe_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring redirect URL {raw_url:?}");
    }

    redirect_url
}

/// Display the log-in page.
///
/// A local `redirect_url` in the query is passed through the form so the
/// couple lands back where they were sent away from.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let redirect_url = safe_redirect_url(query.redirect_url.as_deref());

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-sm mt-16 p-6 space-y-6 bg-white rounded-lg shadow dark:bg-gray-800"
            {
                div class="text-center space-y-1"
                {
                    h1 class="text-2xl font-semibold" { "Wedding Gallery" }
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Log in to upload and remove photos."
                    }
                }

                (log_in_form(redirect_url.as_deref(), None))
            }

            a href=(endpoints::ROOT) class="mt-6 text-sm text-gray-600 dark:text-gray-400 hover:underline"
            {
                "Back to the gallery"
            }
        }
    };

    base("Log in", &content).into_response()
}

/// Check `password` against the stored hash and return the owner's ID if it
/// matches.
///
/// The database lock is released before bcrypt runs on the blocking pool.
async fn check_password(
    db_connection: &Arc<Mutex<Connection>>,
    password: String,
) -> Result<UserID, LogInError> {
    let user = {
        let connection = db_connection.lock().map_err(|_| {
            tracing::error!("Could not lock the database to check the password");
            LogInError::Internal
        })?;
        get_user_by_id(OWNER_ID, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(LogInError::PasswordNotSet),
        Err(error) => {
            tracing::error!("Could not read the password hash: {error}");
            return Err(LogInError::Internal);
        }
    };

    let password_hash = user.password_hash;
    let matches = tokio::task::spawn_blocking(move || password_hash.verify(&password))
        .await
        .map_err(|error| {
            tracing::error!("Password check did not finish: {error}");
            LogInError::Internal
        })?
        .map_err(|error| {
            tracing::error!("Could not check the password: {error}");
            LogInError::Internal
        })?;

    if matches {
        Ok(user.id)
    } else {
        Err(LogInError::WrongPassword)
    }
}

/// Check the submitted password.
///
/// If it is right, a session is started and htmx is told to load the
/// requested page, or the dashboard if there is none. Otherwise the form is
/// returned with a message saying what went wrong.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let redirect_url = safe_redirect_url(form.redirect_url.as_deref());

    let user_id = match check_password(&state.db_connection, form.password).await {
        Ok(user_id) => user_id,
        Err(error) => {
            tracing::info!("Log-in rejected: {error:?}");
            return log_in_form(redirect_url.as_deref(), Some(error)).into_response();
        }
    };

    let duration = if form.remember_me.is_some() {
        REMEMBERED_SESSION_DURATION
    } else {
        state.sessions.duration()
    };

    match state.sessions.start(jar, user_id, duration) {
        Ok(jar) => {
            let target = redirect_url.unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());
            tracing::info!("Logged in, opening {target}");

            (jar, HxRedirect(target), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not start a session: {error}");
            log_in_form(redirect_url.as_deref(), Some(LogInError::Internal)).into_response()
        }
    }
}


#[cfg(test)]
mod post_log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::{TestResponse, TestServer};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{
            PasswordHash, SESSION_COOKIE, SessionConfig, ValidatedPassword, create_user_table,
            upsert_user,
        },
        endpoints,
    };

    use super::{LogInError, LogInState, post_log_in};

    const PASSWORD: &str = "dancing-till-dawn";

    fn server(password: Option<&str>) -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();

        if let Some(password) = password {
            let hash = PasswordHash::new(ValidatedPassword::new_unchecked(password), 4).unwrap();
            upsert_user(hash, &connection).unwrap();
        }

        let state = LogInState {
            sessions: SessionConfig::new("bouquet"),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_error_shown(response: &TestResponse, error: LogInError) {
        response.assert_status_ok();
        assert!(response.maybe_cookie(SESSION_COOKIE).is_none());
        assert!(response.maybe_header("hx-redirect").is_none());

        let html = Html::parse_fragment(&response.text());
        let message = html
            .select(&Selector::parse("form#log-in-form #log-in-error").unwrap())
            .next()
            .expect("No error message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), error.message());
    }

    #[tokio::test]
    async fn right_password_opens_the_dashboard() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", PASSWORD)])
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::DASHBOARD_VIEW);
        let session = response.cookie(SESSION_COOKIE);
        let expires_at = session.expires_datetime().unwrap();
        assert!(expires_at > OffsetDateTime::now_utc());
        assert!(expires_at < OffsetDateTime::now_utc() + Duration::hours(1));
    }

    #[tokio::test]
    async fn right_password_returns_to_requested_page() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("password", PASSWORD),
                ("redirect_url", "/dashboard?category=Guests"),
            ])
            .await;

        assert_eq!(response.header("hx-redirect"), "/dashboard?category=Guests");
    }

    #[tokio::test]
    async fn offsite_redirect_falls_back_to_dashboard() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("password", PASSWORD),
                ("redirect_url", "//example.com/dashboard"),
            ])
            .await;

        assert_eq!(response.header("hx-redirect"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn remember_me_keeps_session_for_a_week() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", PASSWORD), ("remember_me", "on")])
            .await;

        let expires_at = response
            .cookie(SESSION_COOKIE)
            .expires_datetime()
            .unwrap();
        let week_from_now = OffsetDateTime::now_utc() + Duration::days(7);
        assert!((expires_at - week_from_now).abs() < Duration::seconds(5));
    }

    #[tokio::test]
    async fn wrong_password_shows_error() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", "dancing-till-dusk")])
            .await;

        assert_error_shown(&response, LogInError::WrongPassword);
    }

    #[tokio::test]
    async fn missing_password_hash_points_to_set_password() {
        let server = server(None);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", PASSWORD)])
            .await;

        assert_error_shown(&response, LogInError::PasswordNotSet);
        assert!(response.text().contains("set_password"));
    }

    #[tokio::test]
    async fn failed_log_in_keeps_redirect_url() {
        let server = server(Some(PASSWORD));

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", "nope"), ("redirect_url", "/dashboard?view=upload")])
            .await;

        let html = Html::parse_fragment(&response.text());
        let redirect = html
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .next()
            .expect("No redirect_url input found");
        assert_eq!(redirect.value().attr("value"), Some("/dashboard?view=upload"));
    }

    #[tokio::test]
    async fn form_without_password_is_rejected() {
        let server = server(Some(PASSWORD));

        server
            .post(endpoints::LOG_IN_API)
            .form(&[("remember_me", "on")])
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
