//! Settings that control how uploads are compressed, stored and limited.

use crate::upload::CompressionOptions;

/// The default folder in object storage that photos are written under.
pub const DEFAULT_STORAGE_PREFIX: &str = "wedding-photos";

/// The default limit for the size of a multipart upload request.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// The default number of photos that are compressed and uploaded at once.
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 4;

/// Configuration for the photo gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// The folder in object storage that photos and thumbnails are written under.
    pub storage_prefix: String,

    /// Limits for the full-size variant of an uploaded photo.
    pub full_size: CompressionOptions,

    /// Limits for the thumbnail of an uploaded photo.
    pub thumbnail: CompressionOptions,

    /// The largest request body accepted by the upload endpoint, in bytes.
    pub max_upload_bytes: usize,

    /// How many photos from one upload batch may be processed at the same time.
    pub max_concurrent_uploads: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
            full_size: CompressionOptions::FULL_SIZE,
            thumbnail: CompressionOptions::THUMBNAIL,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
        }
    }
}

impl GalleryConfig {
    /// Set the number of concurrent uploads, using at least one worker.
    #[must_use]
    pub fn with_max_concurrent_uploads(mut self, max_concurrent_uploads: usize) -> Self {
        self.max_concurrent_uploads = max_concurrent_uploads.max(1);
        self
    }
}
