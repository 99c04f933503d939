//! Turns uploaded files into stored images and photo records.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    Error,
    backend::{BackendClient, ObjectPath, ObjectStorage},
    config::GalleryConfig,
    gallery::PhotoCache,
    photo::{Category, NewPhoto, Photo},
    upload::compression::compress_or_original,
};

/// A file received from the upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    /// The name of the file on the client's device.
    pub file_name: String,
    /// The MIME type reported by the client, if any.
    pub content_type: Option<String>,
    /// The file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Whether the client reported an `image/*` content type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("image/"))
    }
}

/// Compress `file` into a full-size image and a thumbnail and upload both.
///
/// The objects are written to `<prefix>/<timestamp>_<file name>` and
/// `<prefix>/thumbnails/<timestamp>_<file name>`, with the extension of each
/// name matching the format its bytes were encoded in. If a variant cannot be
/// compressed the original bytes are uploaded in its place.
///
/// # Errors
///
/// Returns an error if either object could not be written. No record is
/// created in that case, and an object that was already written is left in
/// storage.
pub fn process_upload(
    file: &UploadFile,
    category: Category,
    timestamp_ms: i64,
    config: &GalleryConfig,
    storage: &dyn ObjectStorage,
) -> Result<NewPhoto, Error> {
    let full_size = compress_or_original(&file.bytes, &config.full_size, &file.file_name);
    let thumbnail = compress_or_original(&file.bytes, &config.thumbnail, &file.file_name);

    let full_size_path = ObjectPath::for_photo(
        &config.storage_prefix,
        timestamp_ms,
        &file_name_for(&file.file_name, &full_size),
    )?;
    let thumbnail_path = ObjectPath::for_thumbnail(
        &config.storage_prefix,
        timestamp_ms,
        &file_name_for(&file.file_name, &thumbnail),
    )?;

    let url = storage.put(&full_size_path, &full_size).inspect_err(|error| {
        tracing::error!("Could not upload {full_size_path}: {error}");
    })?;
    let thumbnail_url = storage.put(&thumbnail_path, &thumbnail).inspect_err(|error| {
        tracing::error!("Could not upload {thumbnail_path}: {error}");
    })?;

    tracing::info!(
        "Uploaded \"{}\" ({} bytes) as {} bytes and a {} byte thumbnail",
        file.file_name,
        file.bytes.len(),
        full_size.len(),
        thumbnail.len()
    );

    Ok(NewPhoto {
        url,
        thumbnail_url: Some(thumbnail_url),
        category,
    })
}

/// `file_name` with its extension swapped for one that matches the format of
/// `bytes`. Names are kept as they are when the format is unknown or the
/// extension already matches.
fn file_name_for(file_name: &str, bytes: &[u8]) -> String {
    let Ok(format) = image::guess_format(bytes) else {
        return file_name.to_owned();
    };
    let Some(&extension) = format.extensions_str().first() else {
        return file_name.to_owned();
    };

    let (stem, current) = match file_name.rsplit_once('.') {
        Some((stem, current)) if !stem.is_empty() => (stem, Some(current)),
        _ => (file_name, None),
    };

    match current {
        Some(current)
            if format
                .extensions_str()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(current)) =>
        {
            file_name.to_owned()
        }
        _ => format!("{stem}.{extension}"),
    }
}

/// Upload a batch of files and create a record for each one.
///
/// At most `config.max_concurrent_uploads` files are processed at the same
/// time, each on the blocking thread pool. The results are returned in the
/// same order as `files`, and every file succeeds or fails on its own.
///
/// File `i` in the batch is stored with the timestamp `batch_start_ms + i` so
/// that files with the same name do not collide.
pub async fn upload_many(
    files: Vec<UploadFile>,
    category: Category,
    batch_start_ms: i64,
    config: Arc<GalleryConfig>,
    backend: BackendClient,
) -> Vec<Result<Photo, Error>> {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_uploads.max(1)));

    let tasks: Vec<_> = files
        .into_iter()
        .enumerate()
        .map(|(index, file)| {
            let semaphore = semaphore.clone();
            let config = config.clone();
            let storage = backend.storage_handle();
            let photos = backend.photos_handle();
            let timestamp_ms = batch_start_ms + index as i64;

            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|error| Error::TaskError(error.to_string()))?;

                tokio::task::spawn_blocking(move || {
                    let new_photo =
                        process_upload(&file, category, timestamp_ms, &config, storage.as_ref())?;
                    photos.create(new_photo)
                })
                .await
                .map_err(|error| Error::TaskError(error.to_string()))?
            })
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());

    for task in tasks {
        let result = task
            .await
            .map_err(|error| Error::TaskError(error.to_string()))
            .and_then(|result| result);
        results.push(result);
    }

    results
}

/// Upload a batch with [upload_many] and add each created photo to `gallery`.
///
/// The batch and the cache update run together on their own task. Dropping
/// the returned future does not stop them, so every record written to the
/// store also reaches the cache.
///
/// # Errors
///
/// Returns [Error::TaskError] if the task panicked, or [Error::CacheLockError]
/// if the cache could not be updated. The per-file results are returned
/// otherwise.
pub async fn upload_into_gallery(
    files: Vec<UploadFile>,
    category: Category,
    batch_start_ms: i64,
    config: Arc<GalleryConfig>,
    backend: BackendClient,
    gallery: PhotoCache,
) -> Result<Vec<Result<Photo, Error>>, Error> {
    let batch = tokio::spawn(async move {
        let results = upload_many(files, category, batch_start_ms, config, backend).await;

        for result in &results {
            gallery.apply_create(result)?;
        }

        Ok(results)
    });

    batch
        .await
        .map_err(|error| Error::TaskError(error.to_string()))?
}
