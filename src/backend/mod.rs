//! The services the gallery persists its data to.
//!
//! Photo records live in a document store ([PhotoStore]) and image binaries in
//! an object storage ([ObjectStorage]). Both are reached through a
//! [BackendClient] that is built once by the binary and passed to the router
//! through [crate::AppState].

mod local_storage;
mod object_path;
mod sqlite_store;

use std::{fmt::Debug, sync::Arc};

pub use local_storage::LocalObjectStorage;
pub use object_path::{ObjectPath, sanitize_file_name};
pub use sqlite_store::SqlitePhotoStore;

use crate::{
    Error, endpoints,
    photo::{NewPhoto, Photo, PhotoId},
};

/// A document store holding one record per photo.
pub trait PhotoStore: Debug + Send + Sync {
    /// Create a record, letting the store assign its ID.
    fn create(&self, photo: NewPhoto) -> Result<Photo, Error>;

    /// Every record in the store, oldest first.
    fn list(&self) -> Result<Vec<Photo>, Error>;

    /// Delete the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingPhoto] if there is no such record.
    fn delete(&self, id: &PhotoId) -> Result<(), Error>;
}

/// A store for binary objects addressed by path and served at a public URL.
pub trait ObjectStorage: Debug + Send + Sync {
    /// Write `bytes` to `path` and return the URL the object is served from.
    ///
    /// # Errors
    ///
    /// Returns [Error::StorageError] if the object could not be written,
    /// including when an object already exists at `path`.
    fn put(&self, path: &ObjectPath, bytes: &[u8]) -> Result<String, Error>;

    /// Delete the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [Error::ObjectNotFound] if there is no object at `path`.
    fn delete(&self, path: &ObjectPath) -> Result<(), Error>;

    /// Recover the storage path from a URL returned by [ObjectStorage::put].
    fn path_from_url(&self, url: &str) -> Result<ObjectPath, Error> {
        object_path_from_media_url(url)
    }
}

/// The URL an object at `path` is served from under the media route.
pub fn media_url(path: &ObjectPath) -> String {
    format!("{}/{}", endpoints::MEDIA, path)
}

/// Map a URL produced by [media_url] back to its storage path.
pub fn object_path_from_media_url(url: &str) -> Result<ObjectPath, Error> {
    url.strip_prefix(endpoints::MEDIA)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| Error::InvalidStoragePath(url.to_owned()))
        .and_then(ObjectPath::new)
}

/// Handles to the gallery's persistence services.
#[derive(Debug, Clone)]
pub struct BackendClient {
    photos: Arc<dyn PhotoStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl BackendClient {
    /// Create a client from a document store and an object storage.
    pub fn new(photos: Arc<dyn PhotoStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { photos, storage }
    }

    /// The document store for photo records.
    pub fn photos(&self) -> &dyn PhotoStore {
        self.photos.as_ref()
    }

    /// A shared handle to the object storage, for moving into worker tasks.
    pub fn storage_handle(&self) -> Arc<dyn ObjectStorage> {
        self.storage.clone()
    }

    /// A shared handle to the document store, for moving into worker tasks.
    pub fn photos_handle(&self) -> Arc<dyn PhotoStore> {
        self.photos.clone()
    }
}
