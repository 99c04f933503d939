//! The page shell and the Tailwind classes shared by every view.

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::endpoints;

/// A full-width submit or call-to-action button.
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded text-white \
    bg-rose-600 dark:bg-rose-700 hover:enabled:bg-rose-700 \
    dark:hover:enabled:bg-rose-800 disabled:bg-rose-900";

/// A round icon button drawn over a photo or the lightbox backdrop.
pub const ICON_BUTTON_STYLE: &str = "inline-flex items-center justify-center \
    w-10 h-10 rounded-full bg-black/50 hover:bg-black/70 text-white text-lg \
    cursor-pointer";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center w-full \
    max-w-md mx-auto px-6 py-8 text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600 disabled:text-gray-500 \
    focus:border-rose-500 focus:ring-rose-500";

pub const TAB_STYLE: &str = "px-3 py-1.5 rounded-full text-sm font-medium \
    border border-gray-300 dark:border-gray-600 text-gray-700 dark:text-gray-300 \
    hover:bg-gray-100 dark:hover:bg-gray-800";
pub const TAB_ACTIVE_STYLE: &str = "px-3 py-1.5 rounded-full text-sm font-medium \
    border border-rose-600 bg-rose-600 text-white";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center w-full mx-auto px-4 py-6 text-gray-900 dark:text-white";

const SITE_NAME: &str = "Wedding Gallery";

const HTMX_SCRIPTS: [&str; 2] = [
    "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js",
    "https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js",
];

/// Hides spinners until htmx marks the element making the request, and blurs
/// thumbnails until `app.js` swaps in the full image.
const STYLES: &str = r#"
.spinner {
    display: none;
    width: 1em;
    height: 1em;
    vertical-align: -0.125em;
    border: 2px solid currentColor;
    border-right-color: transparent;
    border-radius: 9999px;
    animation: spin 0.7s linear infinite;
}

.htmx-request .spinner,
.htmx-request.spinner {
    display: inline-block;
}

@keyframes spin {
    to { transform: rotate(360deg); }
}

img.progressive-blur {
    filter: blur(12px);
    transition: filter 0.3s ease-out;
}
"#;

/// Wrap `content` in a complete HTML document titled `title`.
///
/// The body ends with `#alert-container`, the target for error responses and
/// out-of-band alerts.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (SITE_NAME) }

                script src="https://cdn.tailwindcss.com" {}
                @for src in HTMX_SCRIPTS {
                    script src=(src) {}
                }
                style { (PreEscaped(STYLES)) }
                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                div
                    id="alert-container"
                    class="fixed bottom-4 left-1/2 z-50 w-full max-w-md -translate-x-1/2 px-4"
                {}
            }
        }
    }
}

/// A spinner that is only visible while an htmx request it sits inside of is
/// in flight.
pub fn spinner() -> Markup {
    html! { span class="spinner me-2" aria-hidden="true" {} }
}

/// A full page for an error response, headed by the numeric `status`.
pub fn error_page(status: StatusCode, description: &str, fix: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    let content = html! {
        main class="flex flex-col items-center px-4 py-16 text-center text-gray-900 dark:text-white" {
            h1 class="text-7xl lg:text-9xl font-extrabold text-rose-600 dark:text-rose-500" {
                (status.as_str())
            }
            p class="mt-4 text-3xl font-bold" { (description) }
            p class="mt-4 text-xl" { (fix) }
            a href=(endpoints::ROOT) class={ (BUTTON_PRIMARY_STYLE) " mt-8 max-w-fit" } {
                "Back to the gallery"
            }
        }
    };

    base(title, &content)
}
