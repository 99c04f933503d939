use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    gallery::{GalleryMode, LIGHTBOX_CONTAINER_ID},
    html::ICON_BUTTON_STYLE,
    lightbox::{
        endpoints::lightbox_vals,
        state::{LightboxAction, LightboxState, Zoom},
    },
    photo::{CategoryFilter, Photo},
    progressive_image::progressive_image,
};

/// Render the lightbox for `state` over the filtered list `photos`.
///
/// A closed lightbox renders nothing, which clears the lightbox container.
pub fn lightbox_view(
    photos: &[Photo],
    state: LightboxState,
    filter: CategoryFilter,
    mode: GalleryMode,
) -> Markup {
    let LightboxState::Open { index, zoom } = state else {
        return html! {};
    };
    let Some(photo) = photos.get(index) else {
        return html! {};
    };

    let controls = Controls {
        photo,
        filter,
        zoom,
        mode,
    };
    let alt = format!("{} photo", photo.category);
    let scale = format!("transform: scale({});", zoom.value());

    html! {
        div
            id="lightbox-modal"
            role="dialog"
            aria-modal="true"
            aria-label="Photo viewer"
            class="fixed inset-0 z-50 flex flex-col bg-black/90 text-white"
        {
            div class="flex items-center justify-between gap-2 p-4"
            {
                span class="text-sm text-gray-300"
                {
                    (photo.category.as_str()) " · " (index + 1) " / " (photos.len())
                }

                div class="flex items-center gap-2"
                {
                    (controls.button(LightboxAction::ZoomOut, "−", "Zoom out", "'-'", !zoom.can_zoom_out()))
                    span class="w-12 text-center text-sm" { (format!("{:.0}%", zoom.value() * 100.0)) }
                    (controls.button(LightboxAction::ZoomIn, "+", "Zoom in", "'+'", !zoom.can_zoom_in()))

                    @if mode.can_delete() {
                        (controls.delete_button())
                    }

                    (controls.button(LightboxAction::Close, "✕", "Close", "'Escape'", false))
                }
            }

            div class="relative flex flex-1 items-center justify-center overflow-hidden"
            {
                (controls.button(LightboxAction::Previous, "‹", "Previous photo", "'ArrowLeft'", false))

                div class="flex-1 flex items-center justify-center overflow-auto h-full"
                {
                    div
                        id="lightbox-image"
                        class="transition-transform duration-200"
                        style=(scale)
                    {
                        (progressive_image(
                            photo.placeholder_url(),
                            &photo.url,
                            &alt,
                            "max-h-[80vh] max-w-[85vw] object-contain select-none",
                        ))
                    }
                }

                (controls.button(LightboxAction::Next, "›", "Next photo", "'ArrowRight'", false))
            }
        }
    }
}

struct Controls<'a> {
    photo: &'a Photo,
    filter: CategoryFilter,
    zoom: Zoom,
    mode: GalleryMode,
}

impl Controls<'_> {
    /// A button that sends `action` when clicked or when `key` is released.
    fn button(
        &self,
        action: LightboxAction,
        label: &str,
        description: &str,
        key: &str,
        disabled: bool,
    ) -> Markup {
        let trigger = format!("click, keyup[key=={key}] from:body");

        html! {
            button
                type="button"
                class={ (ICON_BUTTON_STYLE) " disabled:opacity-40 shrink-0" }
                aria-label=(description)
                title=(description)
                data-action=(action.as_str())
                disabled[disabled]
                hx-get=(self.mode.lightbox_endpoint())
                hx-vals=(lightbox_vals(&self.photo.id, self.filter, Some(self.zoom), Some(action)))
                hx-trigger=(trigger)
                hx-target={ "#" (LIGHTBOX_CONTAINER_ID) }
                hx-swap="innerHTML"
            {
                (label)
            }
        }
    }

    fn delete_button(&self) -> Markup {
        html! {
            button
                type="button"
                class={ (ICON_BUTTON_STYLE) " bg-red-600/80 hover:bg-red-700 shrink-0" }
                aria-label="Delete photo"
                title="Delete photo"
                hx-delete=(format_endpoint(endpoints::DELETE_LIGHTBOX_PHOTO, self.photo.id.as_str()))
                hx-vals=(lightbox_vals(&self.photo.id, self.filter, Some(self.zoom), None))
                hx-confirm="Delete this photo? This cannot be undone."
                hx-target={ "#" (LIGHTBOX_CONTAINER_ID) }
                hx-swap="innerHTML"
                hx-target-error="#alert-container"
            {
                "🗑"
            }
        }
    }
}
