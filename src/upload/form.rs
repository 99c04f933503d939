use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, spinner},
    photo::Category,
};

/// The multipart form field holding the selected category.
pub(super) const CATEGORY_FIELD: &str = "category";
/// The multipart form field holding the photo files.
pub(super) const PHOTOS_FIELD: &str = "photos";

/// The form for uploading photos, with `selected` chosen in the category list.
pub fn upload_form_view(selected: Category) -> Markup {
    html! {
        form
            hx-post=(endpoints::PHOTOS_API)
            enctype="multipart/form-data"
            hx-disabled-elt="#category, #photos, #submit-button"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6 w-full max-w-md"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category"
                    name=(CATEGORY_FIELD)
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option value=(category.as_str()) selected[category == selected] { (category.as_str()) }
                    }
                }
            }

            div
            {
                label for="photos" class=(FORM_LABEL_STYLE) { "Choose photos to upload" }

                input
                    id="photos"
                    type="file"
                    name=(PHOTOS_FIELD)
                    accept="image/*"
                    multiple
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Photos are resized and compressed before they are added to the gallery."
                }
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                (spinner())
                "Upload Photos"
            }
        }
    }
}
