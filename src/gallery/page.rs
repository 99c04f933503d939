//! The public gallery page.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    gallery::{GalleryMode, PhotoCache, photo_grid},
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::{Section, nav_bar},
    photo::{CategoryFilter, Photo},
};

/// The state needed to render the gallery and its lightbox.
#[derive(Debug, Clone)]
pub struct GalleryState {
    pub gallery: PhotoCache,
}

impl FromRef<AppState> for GalleryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            gallery: state.gallery.clone(),
        }
    }
}

/// The query parameters for pages that show the gallery.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    /// A category label, or "all".
    pub category: Option<String>,
}

impl GalleryQuery {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_query(self.category.as_deref())
    }
}

/// Render the read-only gallery for guests.
pub async fn get_gallery_page(
    State(state): State<GalleryState>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let filter = query.filter();

    match state.gallery.filtered(filter) {
        Ok(photos) => gallery_view(&photos, filter).into_response(),
        Err(error) => error.into_response(),
    }
}

fn gallery_view(photos: &[Photo], filter: CategoryFilter) -> Markup {
    let nav_bar = nav_bar(Section::Gallery);
    let grid = photo_grid(photos, filter, GalleryMode::Public);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold text-center" { "Our Wedding" }
            p class="mt-2 text-center text-gray-600 dark:text-gray-400"
            {
                "Thank you for celebrating with us. Tap a photo to see it up close."
            }

            (grid)
        }
    };

    base("Gallery", &content)
}
