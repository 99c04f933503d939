//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    auth::SessionConfig,
    backend::{BackendClient, ObjectStorage, SqlitePhotoStore},
    config::GalleryConfig,
    db::initialize,
    gallery::PhotoCache,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// How session cookies are encrypted and how long they last.
    pub sessions: SessionConfig,

    /// The database connection, shared with the photo store.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The photo store and object storage.
    pub backend: BackendClient,

    /// The in-memory list of photos that pages are rendered from.
    pub gallery: PhotoCache,

    /// Settings for uploads.
    pub config: Arc<GalleryConfig>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function creates the tables if needed and loads every photo into
    /// the gallery cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized or the photos
    /// cannot be loaded.
    pub fn new(
        db_connection: Connection,
        sessions: SessionConfig,
        storage: Arc<dyn ObjectStorage>,
        config: GalleryConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let photos = Arc::new(SqlitePhotoStore::new(connection.clone()));
        let backend = BackendClient::new(photos, storage);
        let gallery = PhotoCache::load(backend.photos())?;

        Ok(Self {
            sessions,
            db_connection: connection,
            backend,
            gallery,
            config: Arc::new(config),
        })
    }
}
