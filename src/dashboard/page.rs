//! The dashboard page, which shows either the gallery or the upload form.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    gallery::{GalleryMode, GalleryState, photo_grid},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::{Section, UPLOAD_VIEW, nav_bar},
    photo::{Category, CategoryFilter, Photo},
    upload::upload_form_view,
};

/// The `view` query value that shows the upload form.
const UPLOAD_VIEW_VALUE: &str = "upload";

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// "upload" to show the upload form, otherwise the gallery is shown.
    pub view: Option<String>,
    /// A category label, or "all".
    pub category: Option<String>,
}

impl DashboardQuery {
    fn shows_upload_form(&self) -> bool {
        self.view.as_deref() == Some(UPLOAD_VIEW_VALUE)
    }

    fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_query(self.category.as_deref())
    }
}

/// Render the dashboard.
pub async fn get_dashboard_page(
    State(state): State<GalleryState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let filter = query.filter();

    if query.shows_upload_form() {
        let selected = match filter {
            CategoryFilter::Only(category) => category,
            CategoryFilter::All => Category::default(),
        };

        return upload_view(selected).into_response();
    }

    match state.gallery.filtered(filter) {
        Ok(photos) => dashboard_gallery_view(&photos, filter).into_response(),
        Err(error) => error.into_response(),
    }
}

fn dashboard_gallery_view(photos: &[Photo], filter: CategoryFilter) -> Markup {
    let nav_bar = nav_bar(Section::Photos);
    let grid = photo_grid(photos, filter, GalleryMode::Dashboard);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-screen-xl items-center justify-between px-4"
            {
                h1 class="text-2xl font-bold" { "Photos" }

                a href=(UPLOAD_VIEW) class={ (BUTTON_PRIMARY_STYLE) " max-w-fit" }
                {
                    "Upload Photos"
                }
            }

            (grid)
        }
    };

    base("Dashboard", &content)
}

fn upload_view(selected: Category) -> Markup {
    let nav_bar = nav_bar(Section::Upload);
    let form = upload_form_view(selected);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-6 text-2xl font-bold" { "Upload Photos" }
            (form)
        }
    };

    base("Upload Photos", &content)
}

#[cfg(test)]
mod dashboard_page_tests {
    use axum::extract::{Query, State};
    use scraper::Selector;

    use crate::{
        endpoints,
        gallery::{GalleryState, PhotoCache},
        photo::{Category, NewPhoto, Photo, PhotoId},
        test_utils::{
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{DashboardQuery, get_dashboard_page};

    fn photo(id: &str, category: Category) -> Photo {
        NewPhoto {
            url: format!("/media/{id}.jpg"),
            thumbnail_url: None,
            category,
        }
        .with_id(PhotoId::new(id))
    }

    fn state() -> GalleryState {
        GalleryState {
            gallery: PhotoCache::new(vec![
                photo("1", Category::Guests),
                photo("2", Category::Details),
            ]),
        }
    }

    #[tokio::test]
    async fn shows_gallery_with_delete_buttons_by_default() {
        let response = get_dashboard_page(State(state()), Query(DashboardQuery::default())).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            html.select(&Selector::parse("#photo-grid button[hx-delete]").unwrap())
                .count(),
            2
        );
        assert!(
            html.select(&Selector::parse("form").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn gallery_view_applies_category_filter() {
        let query = DashboardQuery {
            view: None,
            category: Some("Details".to_owned()),
        };

        let response = get_dashboard_page(State(state()), Query(query)).await;

        let html = parse_html_document(response).await;
        let ids: Vec<_> = html
            .select(&Selector::parse("#photo-grid > div").unwrap())
            .map(|card| card.value().attr("id").unwrap().to_owned())
            .collect();
        assert_eq!(ids, vec!["photo-2"]);
    }

    #[tokio::test]
    async fn upload_view_shows_form_with_selected_category() {
        let query = DashboardQuery {
            view: Some("upload".to_owned()),
            category: Some("Guests".to_owned()),
        };

        let response = get_dashboard_page(State(state()), Query(query)).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::PHOTOS_API, "hx-post");
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("No selected option");
        assert_eq!(selected.value().attr("value"), Some("Guests"));
        assert!(
            html.select(&Selector::parse("#photo-grid").unwrap())
                .next()
                .is_none()
        );
    }
}
