//! Validated paths into object storage.

use std::fmt::Display;

use crate::Error;

/// The file name used when sanitizing leaves nothing behind.
const FALLBACK_FILE_NAME: &str = "photo";

/// A relative, slash separated path to an object in storage.
///
/// Paths never start with a slash and never contain empty, `.` or `..`
/// segments, so they cannot escape the storage root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Validate a raw storage path.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidStoragePath] if the path is empty, absolute,
    /// contains a backslash or has an empty, `.` or `..` segment.
    pub fn new(raw_path: &str) -> Result<Self, Error> {
        let is_valid = !raw_path.is_empty()
            && !raw_path.contains('\\')
            && raw_path
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

        if is_valid {
            Ok(Self(raw_path.to_owned()))
        } else {
            Err(Error::InvalidStoragePath(raw_path.to_owned()))
        }
    }

    /// The path of a full-size photo: `<prefix>/<timestamp>_<file name>`.
    pub fn for_photo(prefix: &str, timestamp_ms: i64, file_name: &str) -> Result<Self, Error> {
        Self::new(&format!(
            "{prefix}/{timestamp_ms}_{}",
            sanitize_file_name(file_name)
        ))
    }

    /// The path of a thumbnail: `<prefix>/thumbnails/<timestamp>_<file name>`.
    pub fn for_thumbnail(prefix: &str, timestamp_ms: i64, file_name: &str) -> Result<Self, Error> {
        Self::new(&format!(
            "{prefix}/thumbnails/{timestamp_ms}_{}",
            sanitize_file_name(file_name)
        ))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segments of the path, from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reduce a client supplied file name to something safe to use in a path.
///
/// Only the last path segment is kept and any character outside
/// `[A-Za-z0-9._-]` is replaced with an underscore.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base_name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let sanitized: String = base_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // A name made only of dots would become a `.` or `..` segment.
    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        sanitized
    }
}
