//! The photo grid shared by the public gallery and the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{ICON_BUTTON_STYLE, TAB_ACTIVE_STYLE, TAB_STYLE},
    lightbox::lightbox_vals,
    photo::{Category, CategoryFilter, Photo},
    progressive_image::progressive_image,
};

/// The ID of the element the lightbox is rendered into.
pub const LIGHTBOX_CONTAINER_ID: &str = "lightbox";

/// Which variant of the gallery is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryMode {
    /// The read-only gallery shown to guests.
    Public,
    /// The gallery in the dashboard, where photos can be deleted.
    Dashboard,
}

impl GalleryMode {
    /// The page the gallery is shown on.
    pub fn page_endpoint(&self) -> &'static str {
        match self {
            GalleryMode::Public => endpoints::ROOT,
            GalleryMode::Dashboard => endpoints::DASHBOARD_VIEW,
        }
    }

    /// The endpoint that renders the lightbox for this variant.
    pub fn lightbox_endpoint(&self) -> &'static str {
        match self {
            GalleryMode::Public => endpoints::LIGHTBOX,
            GalleryMode::Dashboard => endpoints::DASHBOARD_LIGHTBOX,
        }
    }

    /// Whether photos can be deleted from this variant.
    pub fn can_delete(&self) -> bool {
        matches!(self, GalleryMode::Dashboard)
    }
}

/// Render the category tabs, the grid of `photos` and the lightbox container.
///
/// `photos` should already be filtered by `filter`.
pub fn photo_grid(photos: &[Photo], filter: CategoryFilter, mode: GalleryMode) -> Markup {
    html! {
        div class="w-full max-w-screen-xl mx-auto px-4"
        {
            (category_tabs(filter, mode))

            @if photos.is_empty() {
                (empty_state(filter))
            } @else {
                div
                    id="photo-grid"
                    class="grid grid-cols-2 sm:grid-cols-3 lg:grid-cols-4 gap-2 md:gap-4"
                {
                    @for photo in photos {
                        (photo_card(photo, filter, mode))
                    }
                }
            }

            div id=(LIGHTBOX_CONTAINER_ID) {}
        }
    }
}

fn category_tabs(filter: CategoryFilter, mode: GalleryMode) -> Markup {
    let tab = |label: &str, tab_filter: CategoryFilter| {
        let href = format!(
            "{}?category={}",
            mode.page_endpoint(),
            tab_filter.as_query_value()
        );
        let style = if tab_filter == filter {
            TAB_ACTIVE_STYLE
        } else {
            TAB_STYLE
        };

        html! {
            a
                href=(href)
                class=(style)
                aria-current=[(tab_filter == filter).then_some("page")]
            {
                (label)
            }
        }
    };

    html! {
        nav class="flex flex-wrap gap-2 py-4" aria-label="Categories"
        {
            (tab("All", CategoryFilter::All))

            @for category in Category::ALL {
                (tab(category.as_str(), CategoryFilter::Only(category)))
            }
        }
    }
}

fn photo_card(photo: &Photo, filter: CategoryFilter, mode: GalleryMode) -> Markup {
    let element_id = photo.element_id();
    let alt = format!("{} photo", photo.category);

    html! {
        div id=(element_id) class="relative"
        {
            div class="overflow-hidden rounded-lg bg-gray-200 dark:bg-gray-800 aspect-square"
            {
                button
                    type="button"
                    class="block w-full h-full cursor-zoom-in"
                    aria-label="Open photo"
                    hx-get=(mode.lightbox_endpoint())
                    hx-vals=(lightbox_vals(&photo.id, filter, None, None))
                    hx-target={ "#" (LIGHTBOX_CONTAINER_ID) }
                    hx-swap="innerHTML"
                {
                    (progressive_image(
                        photo.placeholder_url(),
                        &photo.url,
                        &alt,
                        "w-full h-full object-cover",
                    ))
                }
            }

            p class="photo-category mt-1 text-xs text-gray-500 dark:text-gray-400 truncate"
            {
                (photo.category)
            }

            @if mode.can_delete() {
                button
                    type="button"
                    class={ (ICON_BUTTON_STYLE) " absolute top-2 right-2" }
                    aria-label="Delete photo"
                    title="Delete photo"
                    hx-delete=(format_endpoint(endpoints::DELETE_PHOTO, photo.id.as_str()))
                    hx-confirm="Delete this photo? This cannot be undone."
                    hx-target={ "#" (element_id) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    "✕"
                }
            }
        }
    }
}

fn empty_state(filter: CategoryFilter) -> Markup {
    let message = match filter {
        CategoryFilter::All => "No photos have been shared yet.".to_owned(),
        CategoryFilter::Only(category) => format!("No photos in {category} yet."),
    };

    html! {
        p
            id="empty-gallery"
            class="py-16 text-center text-gray-500 dark:text-gray-400"
        {
            (message)
        }
    }
}
