//! The bar across the top of each page.
//!
//! Guests only see the gallery and a way in. Once logged in, the couple can
//! switch between their photos and the upload form.

use maud::{Markup, html};

use crate::endpoints;

/// The URL of the dashboard's upload view.
pub const UPLOAD_VIEW: &str = "/dashboard?view=upload";

/// The page the navigation bar is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The public gallery.
    Gallery,
    /// The dashboard's photo grid.
    Photos,
    /// The dashboard's upload form.
    Upload,
}

impl Section {
    /// The links as `(url, label, section)`, where `section` is the section
    /// the link leads to, if any.
    fn links(self) -> &'static [(&'static str, &'static str, Option<Section>)] {
        match self {
            Section::Gallery => &[
                (endpoints::ROOT, "Gallery", Some(Section::Gallery)),
                (endpoints::LOG_IN_VIEW, "Log in", None),
            ],
            Section::Photos | Section::Upload => &[
                (endpoints::DASHBOARD_VIEW, "Photos", Some(Section::Photos)),
                (UPLOAD_VIEW, "Upload", Some(Section::Upload)),
                (endpoints::ROOT, "Public gallery", None),
                (endpoints::LOG_OUT, "Log out", None),
            ],
        }
    }
}

const LINK_STYLE: &str = "px-3 py-2 rounded-md text-sm font-medium \
    text-gray-700 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-800";
const CURRENT_LINK_STYLE: &str = "px-3 py-2 rounded-md text-sm font-semibold \
    bg-rose-50 text-rose-700 dark:bg-rose-900/30 dark:text-rose-200";

/// The navigation bar for `current`, with that section's link highlighted.
pub fn nav_bar(current: Section) -> Markup {
    html! {
        header class="sticky top-0 z-40 border-b border-gray-200 dark:border-gray-700 bg-white/95 dark:bg-gray-900/95 backdrop-blur" {
            nav class="mx-auto flex max-w-screen-xl flex-wrap items-center justify-between gap-2 p-4" aria-label="Primary" {
                a href=(endpoints::ROOT) class="text-xl font-semibold text-gray-900 dark:text-white" {
                    "Wedding Gallery"
                }

                ul class="flex flex-wrap gap-1" {
                    @for &(url, label, section) in current.links() {
                        @let is_current = section == Some(current);
                        li {
                            a
                                href=(url)
                                class=(if is_current { CURRENT_LINK_STYLE } else { LINK_STYLE })
                                aria-current=[is_current.then_some("page")]
                            { (label) }
                        }
                    }
                }
            }
        }
    }
}
