//! A [PhotoStore] backed by the application's SQLite database.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    backend::PhotoStore,
    photo::{NewPhoto, Photo, PhotoId, delete_photo_record, get_all_photos, insert_photo},
};

/// Stores photo records in the `photo` table.
#[derive(Debug, Clone)]
pub struct SqlitePhotoStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePhotoStore {
    /// Create a store that shares the application's database connection.
    ///
    /// The `photo` table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl PhotoStore for SqlitePhotoStore {
    fn create(&self, photo: NewPhoto) -> Result<Photo, Error> {
        insert_photo(photo, &*self.lock()?)
    }

    fn list(&self) -> Result<Vec<Photo>, Error> {
        get_all_photos(&*self.lock()?)
    }

    fn delete(&self, id: &PhotoId) -> Result<(), Error> {
        delete_photo_record(id, &*self.lock()?)
    }
}
