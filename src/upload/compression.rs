//! Image compression for uploaded photos.
//!
//! Images are decoded, rotated upright according to their EXIF orientation,
//! downscaled so the longest edge fits the configured limit and re-encoded as
//! JPEG at decreasing quality until they fit the byte limit. If even the lowest
//! quality is too large the image is shrunk further and the search repeats.

use std::io::Cursor;

use image::{
    DynamicImage, GenericImageView, ImageDecoder, ImageReader, codecs::jpeg::JpegEncoder,
    imageops::FilterType, metadata::Orientation,
};

use crate::Error;

/// JPEG qualities tried in order until the encoded image is small enough.
const QUALITY_STEPS: [u8; 5] = [85, 70, 55, 40, 25];

/// How much to shrink each edge by when no quality step fits the byte limit.
const SHRINK_FACTOR: f64 = 0.8;

/// Stop shrinking once the longest edge would fall below this many pixels.
const MIN_DIMENSION: u32 = 16;

/// Size limits for one compressed variant of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    /// The largest allowed width or height, in pixels.
    pub max_dimension: u32,
    /// The largest allowed encoded size, in bytes.
    pub max_size_bytes: usize,
}

impl CompressionOptions {
    /// Limits for the full-size image: 1920 px and 1 MiB.
    pub const FULL_SIZE: CompressionOptions = CompressionOptions {
        max_dimension: 1920,
        max_size_bytes: 1_048_576,
    };

    /// Limits for the thumbnail: 300 px and 0.1 MiB.
    pub const THUMBNAIL: CompressionOptions = CompressionOptions {
        max_dimension: 300,
        max_size_bytes: 104_857,
    };
}

/// Compress `bytes` so they fit within `options`.
///
/// Images that already fit both limits are returned unchanged.
///
/// # Errors
///
/// Returns [Error::CompressionError] if the image cannot be decoded or encoded,
/// or if it cannot be made small enough.
pub fn compress_image(bytes: &[u8], options: &CompressionOptions) -> Result<Vec<u8>, Error> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| Error::CompressionError(error.to_string()))?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|error| Error::CompressionError(error.to_string()))?;

    let (width, height) = decoder.dimensions();
    if bytes.len() <= options.max_size_bytes && width.max(height) <= options.max_dimension {
        return Ok(bytes.to_vec());
    }

    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|error| Error::CompressionError(error.to_string()))?;
    image.apply_orientation(orientation);

    let mut image = fit_within(image, options.max_dimension);

    loop {
        if let Some(encoded) = encode_within_limit(&image, options.max_size_bytes)? {
            return Ok(encoded);
        }

        let (width, height) = image.dimensions();
        let new_width = (width as f64 * SHRINK_FACTOR).round() as u32;
        let new_height = (height as f64 * SHRINK_FACTOR).round() as u32;

        if new_width.max(new_height) < MIN_DIMENSION {
            return Err(Error::CompressionError(format!(
                "could not fit image within {} bytes",
                options.max_size_bytes
            )));
        }

        tracing::debug!(
            "Image still too large at {width}x{height}, shrinking to {new_width}x{new_height}"
        );
        image = image.resize_exact(new_width.max(1), new_height.max(1), FilterType::Triangle);
    }
}

/// Compress `bytes`, falling back to the original bytes if compression fails.
pub fn compress_or_original(bytes: &[u8], options: &CompressionOptions, file_name: &str) -> Vec<u8> {
    match compress_image(bytes, options) {
        Ok(compressed) => compressed,
        Err(error) => {
            tracing::warn!("Could not compress \"{file_name}\", uploading original: {error}");
            bytes.to_vec()
        }
    }
}

/// Downscale `image` so its longest edge is at most `max_dimension`.
///
/// Images that are already small enough are not upscaled.
fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = image.dimensions();

    if width.max(height) <= max_dimension {
        image
    } else {
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    }
}

/// Encode `image` as JPEG at the highest quality step that fits `max_size_bytes`.
///
/// Returns `None` if no quality step is small enough.
fn encode_within_limit(image: &DynamicImage, max_size_bytes: usize) -> Result<Option<Vec<u8>>, Error> {
    let rgb = image.to_rgb8();

    for quality in QUALITY_STEPS {
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, quality)
            .encode_image(&rgb)
            .map_err(|error| Error::CompressionError(error.to_string()))?;

        if encoded.len() <= max_size_bytes {
            tracing::debug!(
                "Encoded {}x{} image at quality {quality}: {} bytes",
                rgb.width(),
                rgb.height(),
                encoded.len()
            );
            return Ok(Some(encoded));
        }
    }

    Ok(None)
}
