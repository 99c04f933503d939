//! The full-screen photo viewer with navigation, zoom and delete.

mod endpoints;
mod state;
mod view;

pub use endpoints::{
    LightboxQuery, delete_lightbox_photo, get_dashboard_lightbox, get_lightbox, lightbox_vals,
};
pub use state::{LightboxAction, LightboxState, Zoom};
pub use view::lightbox_view;
