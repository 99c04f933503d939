//! The authenticated dashboard for managing the gallery.
//!
//! The dashboard toggles between the gallery, where photos can be deleted,
//! and the upload form.

mod delete;
mod page;

pub use delete::{DeletePhotoState, delete_photo, delete_photo_endpoint};
pub use page::{DashboardQuery, get_dashboard_page};
