//! An [ObjectStorage] that writes objects to a directory on disk.
//!
//! The directory is served by the router under [crate::endpoints::MEDIA].

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::PathBuf,
};

use crate::{
    Error,
    backend::{ObjectPath, ObjectStorage, media_url},
};

/// Stores objects as files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    /// Create a storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [Error::StorageError] if the directory could not be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|error| {
            Error::StorageError(format!(
                "could not create media directory {}: {error}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }

    fn file_path(&self, path: &ObjectPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |file_path, segment| file_path.join(segment))
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn put(&self, path: &ObjectPath, bytes: &[u8]) -> Result<String, Error> {
        let file_path = self.file_path(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::StorageError(format!("could not create directory for {path}: {error}"))
            })?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .map_err(|error| Error::StorageError(format!("could not create {path}: {error}")))?;

        file.write_all(bytes)
            .map_err(|error| Error::StorageError(format!("could not write {path}: {error}")))?;

        tracing::debug!("Wrote {} bytes to {path}", bytes.len());

        Ok(media_url(path))
    }

    fn delete(&self, path: &ObjectPath) -> Result<(), Error> {
        match fs::remove_file(self.file_path(path)) {
            Ok(()) => {
                tracing::debug!("Deleted {path}");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(Error::ObjectNotFound(path.to_string()))
            }
            Err(error) => Err(Error::StorageError(format!(
                "could not delete {path}: {error}"
            ))),
        }
    }
}
