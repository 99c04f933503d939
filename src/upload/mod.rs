//! Photo uploads: the form, the multipart endpoint and the compression pipeline.

mod compression;
mod endpoint;
mod form;
mod pipeline;

pub use compression::{CompressionOptions, compress_image};
pub use endpoint::{UploadState, upload_photos_endpoint};
pub use form::upload_form_view;
pub use pipeline::{UploadFile, process_upload};

#[cfg(test)]
pub(crate) use compression::test_images;
