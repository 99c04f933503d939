//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element in the base page,
//! either as the target of an htmx error swap or out-of-band alongside a
//! successful response.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// An alert message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    fn message(&self) -> &str {
        match self {
            Alert::Success { message }
            | Alert::Error { message, .. }
            | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Error { details, .. } => Some(details),
            Alert::Success { .. } | Alert::ErrorSimple { .. } => None,
        }
    }

    /// Render the alert on its own, for swapping into the alert container.
    pub fn into_html(self) -> Markup {
        let style = if self.is_error() {
            "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 border border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 border border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                role="alert"
                class=(style)
                onclick="this.remove()"
            {
                p class="font-medium" { (self.message()) }

                @if let Some(details) = self.details() {
                    @if !details.is_empty() {
                        span class="block mt-1" { (details) }
                    }
                }
            }
        }
    }

    /// Render the alert wrapped in an out-of-band swap for the alert container.
    ///
    /// Use this when the main response body targets a different element.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, Html(self.into_html().into_string())).into_response()
    }
}
