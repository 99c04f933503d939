//! The fixed set of categories a photo can belong to.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::photo::Photo;

/// A label used to group photos in the gallery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The vows, the aisle and everything in between.
    Ceremony,
    /// Speeches, dancing and the rest of the evening.
    Party,
    /// Photos of and by the guests.
    Guests,
    /// Decorations, flowers, the cake.
    Details,
    /// Photos uploaded without a category.
    #[default]
    Uncategorized,
}

impl Category {
    /// Every category, in the order they are shown to users.
    pub const ALL: [Category; 5] = [
        Category::Ceremony,
        Category::Party,
        Category::Guests,
        Category::Details,
        Category::Uncategorized,
    ];

    /// The label used in URLs, forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ceremony => "Ceremony",
            Category::Party => "Party",
            Category::Guests => "Guests",
            Category::Details => "Details",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Read a category label from a stored record.
    ///
    /// Records written before categories existed, or with a label that is no
    /// longer recognised, are treated as [Category::Uncategorized].
    pub fn from_stored_label(label: Option<&str>) -> Self {
        match label {
            Some(label) => label.parse().unwrap_or_else(|_| {
                tracing::debug!("Unknown stored category {label:?}, using Uncategorized");
                Category::Uncategorized
            }),
            None => Category::Uncategorized,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is not one of the category labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown category \"{}\"", self.0)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Restricts the gallery to a single category, or shows everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// The query parameter value that selects every category.
    pub const ALL_QUERY_VALUE: &'static str = "all";

    /// Parse the `category` query parameter.
    ///
    /// A missing value, "all" or an unknown label all mean [CategoryFilter::All].
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None => CategoryFilter::All,
            Some(value) if value.eq_ignore_ascii_case(Self::ALL_QUERY_VALUE) => CategoryFilter::All,
            Some(value) => match value.parse() {
                Ok(category) => CategoryFilter::Only(category),
                Err(error) => {
                    tracing::debug!("Ignoring category filter: {error}");
                    CategoryFilter::All
                }
            },
        }
    }

    /// The value to put in the `category` query parameter to reproduce this filter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_QUERY_VALUE,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    /// Whether `photo` should be shown under this filter.
    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => photo.category == *category,
        }
    }

    /// The photos from `photos` that match the filter, in their original order.
    pub fn apply(&self, photos: &[Photo]) -> Vec<Photo> {
        photos
            .iter()
            .filter(|photo| self.matches(photo))
            .cloned()
            .collect()
    }
}
