//! The encrypted cookie that keeps the couple logged in.
//!
//! The cookie holds a JSON [Session] whose expiry is a Unix timestamp in
//! whole seconds. Every request to the dashboard pushes the expiry out again,
//! so the session only ends after a stretch of inactivity.

use axum::extract::FromRef;
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error, auth::UserID};

/// The name of the session cookie.
pub(crate) const SESSION_COOKIE: &str = "session";

/// How long a session lasts after the latest request.
pub(crate) const SESSION_DURATION: Duration = Duration::minutes(5);

/// How long a session lasts when "remember me" is ticked on the log-in form.
pub(crate) const REMEMBERED_SESSION_DURATION: Duration = Duration::days(7);

/// The contents of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Session {
    pub(crate) user_id: UserID,
    #[serde(with = "time::serde::timestamp")]
    pub(crate) expires_at: OffsetDateTime,
}

/// How session cookies are encrypted, how long they last and whether they
/// need HTTPS.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    key: Key,
    duration: Duration,
    secure: bool,
}

impl SessionConfig {
    /// Derive the cookie key from `secret`.
    ///
    /// Cookies are marked `Secure`, so browsers only send them over HTTPS.
    pub fn new(secret: &str) -> Self {
        Self {
            key: Key::from(&Sha512::digest(secret)),
            duration: SESSION_DURATION,
            secure: true,
        }
    }

    /// Let browsers send the session cookie over plain HTTP.
    #[must_use]
    pub fn allow_insecure_cookies(mut self) -> Self {
        self.secure = false;
        self
    }

    /// Change how long a session lasts after the latest request.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// How long a session lasts after the latest request.
    pub(crate) fn duration(&self) -> Duration {
        self.duration
    }

    /// Add a session for `user_id` that ends `duration` from now.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidExpiry] if the expiry is out of range, or
    /// [Error::JSONSerializationError] if the session cannot be written.
    pub(crate) fn start(
        &self,
        jar: PrivateCookieJar,
        user_id: UserID,
        duration: Duration,
    ) -> Result<PrivateCookieJar, Error> {
        let expires_at = expiry_after(duration)?;

        self.store(jar, Session {
            user_id,
            expires_at,
        })
    }

    /// Make the session in `jar` last at least the configured duration from now.
    ///
    /// A session that already lasts longer, such as a remembered one, keeps its
    /// expiry. The jar is returned unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [Error::SessionMissing] or [Error::InvalidSession] if the jar
    /// holds no valid session.
    pub(crate) fn refresh(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        let session = read_session(&jar)?;
        let expires_at = expiry_after(self.duration)?;

        if expires_at <= session.expires_at {
            return Ok(jar);
        }

        self.store(jar, Session {
            expires_at,
            ..session
        })
    }

    /// Replace the session cookie with one the browser discards immediately.
    pub(crate) fn end(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        let mut cookie = self.cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH);
        cookie.set_max_age(Duration::ZERO);

        jar.add(cookie)
    }

    fn store(&self, jar: PrivateCookieJar, session: Session) -> Result<PrivateCookieJar, Error> {
        let value = serde_json::to_string(&session)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        Ok(jar.add(self.cookie(value, session.expires_at)))
    }

    fn cookie(&self, value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .build()
    }
}

impl FromRef<AppState> for SessionConfig {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

// `PrivateCookieJar` finds its key through these.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.key.clone()
    }
}

impl FromRef<SessionConfig> for Key {
    fn from_ref(config: &SessionConfig) -> Self {
        config.key.clone()
    }
}

/// Read the session from `jar`, rejecting sessions that have expired.
///
/// # Errors
///
/// Returns [Error::SessionMissing] if there is no session cookie, or
/// [Error::InvalidSession] if it cannot be read or has expired.
pub(crate) fn read_session(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(Error::SessionMissing)?;

    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidSession)?;

    if session.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::InvalidSession);
    }

    Ok(session)
}

/// The moment `duration` from now, rounded down to whole seconds so it matches
/// what the cookie can hold.
fn expiry_after(duration: Duration) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::now_utc()
        .unix_timestamp()
        .checked_add(duration.whole_seconds())
        .and_then(|timestamp| OffsetDateTime::from_unix_timestamp(timestamp).ok())
        .ok_or_else(|| Error::InvalidExpiry(format!("now + {duration}")))
}
