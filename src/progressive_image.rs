//! Images that show a low-resolution placeholder until the full image loads.
//!
//! The swap happens in the browser: `/static/app.js` preloads every image
//! with a `data-full-src` attribute and, once it has loaded, replaces the
//! source and removes the blur. If the full image fails to load the
//! placeholder stays.

use maud::{Markup, html};

/// The class that blurs an image while its full-size source is loading.
pub const BLUR_CLASS: &str = "progressive-blur";

/// Render an `img` that shows `placeholder_src` until `src` has loaded.
///
/// When the two sources are the same the image is rendered directly, without
/// a blur.
pub fn progressive_image(placeholder_src: &str, src: &str, alt: &str, class: &str) -> Markup {
    if placeholder_src == src {
        return html! {
            img src=(src) alt=(alt) class=(class) loading="lazy" draggable="false";
        };
    }

    let class = format!("{class} {BLUR_CLASS}");

    html! {
        img
            src=(placeholder_src)
            data-full-src=(src)
            alt=(alt)
            class=(class)
            loading="lazy"
            draggable="false";
    }
}
