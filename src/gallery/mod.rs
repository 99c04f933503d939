//! The gallery of uploaded photos: the shared cache and the grid views.

mod cache;
mod grid;
mod page;

pub use cache::{PhotoCache, after_create, after_delete};
pub use grid::{GalleryMode, LIGHTBOX_CONTAINER_ID, photo_grid};
pub use page::{GalleryQuery, GalleryState, get_gallery_page};
