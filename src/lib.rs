//! Wedding Gallery is a web app for sharing the photos of a wedding.
//!
//! Guests browse a public, read-only gallery. The couple logs in to a
//! dashboard where photos are uploaded (compressed and thumbnailed on the way
//! in) and deleted, grouped by a fixed set of categories.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod backend;
mod config;
mod dashboard;
mod db;
mod endpoints;
mod gallery;
mod html;
mod internal_server_error;
mod lightbox;
mod logging;
mod navigation;
mod not_found;
mod photo;
mod progressive_image;
mod routing;
mod upload;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, SessionConfig, User, UserID, ValidatedPassword, get_user_by_id, upsert_user,
};
pub use backend::{BackendClient, LocalObjectStorage, ObjectStorage, PhotoStore, SqlitePhotoStore};
pub use config::{DEFAULT_MAX_CONCURRENT_UPLOADS, GalleryConfig};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use photo::{Category, NewPhoto, Photo, PhotoId};
pub use routing::build_router;
pub use upload::{CompressionOptions, UploadFile, process_upload};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request has no session cookie.
    #[error("no session cookie")]
    SessionMissing,

    /// The session cookie could not be decrypted or read, or has expired.
    #[error("the session is invalid or has expired")]
    InvalidSession,

    /// The expiry of a session is outside the range of a timestamp.
    #[error("could not compute the session expiry: {0}")]
    InvalidExpiry(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// An uploaded file did not have an image content type.
    #[error("File \"{0}\" is not an image")]
    NotAnImage(String),

    /// The upload form was submitted without any files.
    #[error("No photos were selected")]
    NoFilesSelected,

    /// An image could not be decoded, resized or re-encoded.
    ///
    /// The upload pipeline recovers from this error by uploading the original
    /// bytes, so it should never reach a client.
    #[error("could not compress image: {0}")]
    CompressionError(String),

    /// Reading or writing a binary object failed.
    #[error("object storage error: {0}")]
    StorageError(String),

    /// The object addressed by a path does not exist in storage.
    #[error("the object \"{0}\" does not exist")]
    ObjectNotFound(String),

    /// A URL or path could not be mapped to a valid object storage path.
    #[error("\"{0}\" is not a valid storage path")]
    InvalidStoragePath(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Could not acquire the lock on the photo cache
    #[error("could not acquire the photo cache lock")]
    CacheLockError,

    /// A background upload task panicked or was cancelled.
    #[error("an upload task failed to complete: {0}")]
    TaskError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Tried to delete a photo that does not exist
    #[error("tried to delete a photo that is not in the database")]
    DeleteMissingPhoto,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError | Error::CacheLockError => {
                InternalServerError::default().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotAnImage(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Only images can be uploaded".to_owned(),
                    details: format!("\"{file_name}\" is not an image file."),
                },
            )
                .into_response(),
            Error::NoFilesSelected => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Select at least one photo to upload.".to_owned(),
                },
            )
                .into_response(),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the upload".to_owned(),
                    details: "The form could not be read. Please try again.".to_owned(),
                },
            )
                .into_response(),
            Error::DeleteMissingPhoto => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete photo".to_owned(),
                    details: "The photo could not be found. \
                        Try refreshing the page to see if the photo has already been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            Error::StorageError(_) | Error::ObjectNotFound(_) | Error::InvalidStoragePath(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "The photo storage could not complete the request. \
                        Please try again."
                        .to_owned(),
                },
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            )
                .into_response(),
        }
    }
}
