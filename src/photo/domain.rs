//! Core photo domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::photo::Category;

/// The opaque identifier the document store assigns to a photo record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Wrap an identifier issued by the document store.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The HTML element ID of the photo's card in the gallery grid.
    pub fn element_id(&self) -> String {
        format!("photo-{}", self.0)
    }
}

impl AsRef<str> for PhotoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo that has been uploaded and recorded in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// The ID assigned by the document store.
    pub id: PhotoId,
    /// URL of the full-size image.
    pub url: String,
    /// URL of the thumbnail, if one was uploaded.
    pub thumbnail_url: Option<String>,
    /// The group the photo is shown under.
    pub category: Category,
}

impl Photo {
    /// The URL to show while the full-size image is loading.
    ///
    /// Falls back to the full-size URL when there is no thumbnail.
    pub fn placeholder_url(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.url)
    }

    /// The HTML element ID of the photo's card in the gallery grid.
    pub fn element_id(&self) -> String {
        self.id.element_id()
    }
}

/// A photo record that has not been written to the document store yet.
///
/// This is what the upload pipeline produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhoto {
    /// URL of the full-size image.
    pub url: String,
    /// URL of the thumbnail, if one was uploaded.
    pub thumbnail_url: Option<String>,
    /// The group the photo is shown under.
    pub category: Category,
}

impl NewPhoto {
    /// Attach the ID issued by the document store.
    pub fn with_id(self, id: PhotoId) -> Photo {
        Photo {
            id,
            url: self.url,
            thumbnail_url: self.thumbnail_url,
            category: self.category,
        }
    }
}
