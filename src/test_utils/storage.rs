use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    backend::{BackendClient, ObjectPath, ObjectStorage, SqlitePhotoStore, media_url},
    db::initialize,
};

/// Object storage that keeps objects in a map.
#[derive(Debug, Default)]
pub(crate) struct InMemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    rejected_fragment: Option<String>,
}

impl InMemoryObjectStorage {
    /// Storage that fails to write any path containing `fragment`.
    pub(crate) fn rejecting(fragment: &str) -> Self {
        Self {
            objects: Mutex::default(),
            rejected_fragment: Some(fragment.to_owned()),
        }
    }

    pub(crate) fn objects(&self) -> HashMap<String, Vec<u8>> {
        self.objects.lock().unwrap().clone()
    }

    pub(crate) fn insert(&self, path: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_owned(), bytes.to_vec());
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    fn put(&self, path: &ObjectPath, bytes: &[u8]) -> Result<String, Error> {
        if self
            .rejected_fragment
            .as_deref()
            .is_some_and(|fragment| path.as_str().contains(fragment))
        {
            return Err(Error::StorageError(format!("rejected {path}")));
        }

        let mut objects = self.objects.lock().unwrap();

        if objects.contains_key(path.as_str()) {
            return Err(Error::StorageError(format!("{path} already exists")));
        }

        objects.insert(path.as_str().to_owned(), bytes.to_vec());

        Ok(media_url(path))
    }

    fn delete(&self, path: &ObjectPath) -> Result<(), Error> {
        self.objects
            .lock()
            .unwrap()
            .remove(path.as_str())
            .map(|_| ())
            .ok_or_else(|| Error::ObjectNotFound(path.to_string()))
    }
}

/// Object storage where every operation fails.
#[derive(Debug, Default)]
pub(crate) struct FailingObjectStorage;

impl ObjectStorage for FailingObjectStorage {
    fn put(&self, path: &ObjectPath, _bytes: &[u8]) -> Result<String, Error> {
        Err(Error::StorageError(format!("could not write {path}")))
    }

    fn delete(&self, path: &ObjectPath) -> Result<(), Error> {
        Err(Error::StorageError(format!("could not delete {path}")))
    }
}

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

/// A backend with an in-memory SQLite document store and `storage`.
pub(crate) fn backend_with_storage(storage: Arc<dyn ObjectStorage>) -> BackendClient {
    let connection = Arc::new(Mutex::new(get_test_connection()));

    BackendClient::new(Arc::new(SqlitePhotoStore::new(connection)), storage)
}
