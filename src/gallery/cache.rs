//! The in-memory copy of the photo collection shared by every request.
//!
//! The collection is read from the document store once at startup. After that
//! it only changes when a create or delete operation against the store
//! resolves, and the new collection is computed from the operation's result
//! alone.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    Error,
    backend::PhotoStore,
    photo::{CategoryFilter, Photo, PhotoId},
};

/// The photo collection as of the last create or delete.
#[derive(Debug, Clone, Default)]
pub struct PhotoCache {
    photos: Arc<RwLock<Vec<Photo>>>,
}

impl PhotoCache {
    /// Create a cache holding `photos`.
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos: Arc::new(RwLock::new(photos)),
        }
    }

    /// Fetch the whole collection from `store`.
    pub fn load(store: &dyn PhotoStore) -> Result<Self, Error> {
        let photos = store.list()?;
        tracing::info!("Loaded {} photos into the gallery cache", photos.len());

        Ok(Self::new(photos))
    }

    /// A copy of every cached photo.
    pub fn all(&self) -> Result<Vec<Photo>, Error> {
        Ok(self.read()?.clone())
    }

    /// The cached photos that match `filter`.
    pub fn filtered(&self, filter: CategoryFilter) -> Result<Vec<Photo>, Error> {
        Ok(filter.apply(&self.read()?))
    }

    /// The cached photo with `id`, if there is one.
    pub fn get(&self, id: &PhotoId) -> Result<Option<Photo>, Error> {
        Ok(self.read()?.iter().find(|photo| &photo.id == id).cloned())
    }

    /// Update the cache with the result of creating a photo record.
    pub fn apply_create(&self, result: &Result<Photo, Error>) -> Result<(), Error> {
        let mut photos = self.write()?;
        *photos = after_create(std::mem::take(&mut *photos), result);

        Ok(())
    }

    /// Update the cache with the result of deleting the photo `id`.
    pub fn apply_delete(&self, id: &PhotoId, result: &Result<(), Error>) -> Result<(), Error> {
        let mut photos = self.write()?;
        *photos = after_delete(std::mem::take(&mut *photos), id, result);

        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Photo>>, Error> {
        self.photos.read().map_err(|error| {
            tracing::error!("could not acquire photo cache lock: {error}");
            Error::CacheLockError
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Photo>>, Error> {
        self.photos.write().map_err(|error| {
            tracing::error!("could not acquire photo cache lock: {error}");
            Error::CacheLockError
        })
    }
}

/// The collection after a create resolved with `result`.
///
/// A created photo is appended. A failed create leaves the collection unchanged.
pub fn after_create(mut photos: Vec<Photo>, result: &Result<Photo, Error>) -> Vec<Photo> {
    if let Ok(photo) = result {
        photos.push(photo.clone());
    }

    photos
}

/// The collection after deleting `id` resolved with `result`.
///
/// A successful delete removes the photo. A failed delete leaves the collection
/// unchanged.
pub fn after_delete(mut photos: Vec<Photo>, id: &PhotoId, result: &Result<(), Error>) -> Vec<Photo> {
    if result.is_ok() {
        photos.retain(|photo| &photo.id != id);
    }

    photos
}
