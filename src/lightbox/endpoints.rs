//! The endpoints that render the lightbox and delete from it.
//!
//! The lightbox state travels in the query string, so each request carries
//! the displayed photo, the category filter, the zoom and the action to apply.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;
use serde_json::json;

use crate::{
    alert::Alert,
    dashboard::{DeletePhotoState, delete_photo},
    gallery::{GalleryMode, GalleryState, PhotoCache},
    lightbox::{
        state::{LightboxAction, LightboxState, Zoom},
        view::lightbox_view,
    },
    photo::{CategoryFilter, Photo, PhotoId},
};

/// The lightbox state sent by the client.
#[derive(Debug, Default, Deserialize)]
pub struct LightboxQuery {
    /// The ID of the displayed photo.
    pub photo_id: Option<String>,
    /// The category filter the photo was opened from.
    pub category: Option<String>,
    /// The current zoom level.
    pub zoom: Option<f64>,
    /// The action to apply, if any.
    pub action: Option<LightboxAction>,
}

impl LightboxQuery {
    fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_query(self.category.as_deref())
    }

    fn zoom(&self) -> Zoom {
        self.zoom.map(Zoom::new).unwrap_or_default()
    }

    /// The position of the displayed photo in `photos`.
    fn index_in(&self, photos: &[Photo]) -> Option<usize> {
        let photo_id = self.photo_id.as_deref()?;

        photos.iter().position(|photo| photo.id.as_str() == photo_id)
    }

    /// The state after applying the requested action to the displayed photo.
    ///
    /// A photo that is not in `photos` gives a closed lightbox.
    fn resolve(&self, photos: &[Photo]) -> LightboxState {
        let Some(index) = self.index_in(photos) else {
            return LightboxState::Closed;
        };

        let state = LightboxState::Open {
            index,
            zoom: self.zoom(),
        };

        match self.action {
            Some(action) => state.apply(action, photos.len()),
            None => state,
        }
    }
}

/// The `hx-vals` JSON that reproduces a lightbox query.
pub fn lightbox_vals(
    photo_id: &PhotoId,
    filter: CategoryFilter,
    zoom: Option<Zoom>,
    action: Option<LightboxAction>,
) -> String {
    let mut vals = json!({
        "photo_id": photo_id.as_str(),
        "category": filter.as_query_value(),
    });

    if let Some(zoom) = zoom {
        vals["zoom"] = json!(zoom.value());
    }

    if let Some(action) = action {
        vals["action"] = json!(action.as_str());
    }

    vals.to_string()
}

/// Render the read-only lightbox for the public gallery.
pub async fn get_lightbox(
    State(state): State<GalleryState>,
    Query(query): Query<LightboxQuery>,
) -> Response {
    render_lightbox(&state.gallery, &query, GalleryMode::Public)
}

/// Render the lightbox for the dashboard, which includes a delete button.
pub async fn get_dashboard_lightbox(
    State(state): State<GalleryState>,
    Query(query): Query<LightboxQuery>,
) -> Response {
    render_lightbox(&state.gallery, &query, GalleryMode::Dashboard)
}

fn render_lightbox(gallery: &PhotoCache, query: &LightboxQuery, mode: GalleryMode) -> Response {
    let filter = query.filter();

    let photos = match gallery.filtered(filter) {
        Ok(photos) => photos,
        Err(error) => return error.into_alert_response(),
    };

    let state = query.resolve(&photos);
    tracing::debug!("Lightbox {:?} -> {state:?}", query.action);

    lightbox_view(&photos, state, filter, mode).into_response()
}

/// Delete the photo shown in the dashboard lightbox.
///
/// On success the lightbox moves on to the photo that took the deleted
/// photo's place, or closes if none are left, and the photo's card is removed
/// from the grid. On failure an alert is shown and the lightbox is left as is.
pub async fn delete_lightbox_photo(
    State(state): State<DeletePhotoState>,
    Path(photo_id): Path<String>,
    Query(query): Query<LightboxQuery>,
) -> Response {
    let photo_id = PhotoId::new(&photo_id);
    let filter = query.filter();

    let index = match state.gallery.filtered(filter) {
        Ok(photos) => photos.iter().position(|photo| photo.id == photo_id),
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = delete_photo(&state.backend, &state.gallery, &photo_id).await {
        return error.into_alert_response();
    }

    let remaining = match state.gallery.filtered(filter) {
        Ok(photos) => photos,
        Err(error) => return error.into_alert_response(),
    };

    let lightbox = match index {
        Some(index) => LightboxState::Open {
            index,
            zoom: query.zoom(),
        }
        .after_delete(remaining.len()),
        None => LightboxState::Closed,
    };

    let alert = Alert::Success {
        message: "Photo deleted".to_owned(),
    };

    html! {
        (lightbox_view(&remaining, lightbox, filter, GalleryMode::Dashboard))
        div id=(photo_id.element_id()) hx-swap-oob="delete" {}
        (alert.into_oob_html())
    }
    .into_response()
}

#[cfg(test)]
mod lightbox_query_tests {
    use crate::{
        lightbox::state::{LightboxAction, LightboxState, Zoom},
        photo::{Category, CategoryFilter, NewPhoto, Photo, PhotoId},
    };

    use super::{LightboxQuery, lightbox_vals};

    fn photos() -> Vec<Photo> {
        ["a", "b", "c"]
            .into_iter()
            .map(|id| {
                NewPhoto {
                    url: format!("/media/{id}.jpg"),
                    thumbnail_url: None,
                    category: Category::Guests,
                }
                .with_id(PhotoId::new(id))
            })
            .collect()
    }

    #[test]
    fn opening_a_photo_uses_default_zoom() {
        let query = LightboxQuery {
            photo_id: Some("b".to_owned()),
            ..Default::default()
        };

        assert_eq!(query.resolve(&photos()), LightboxState::open(1));
    }

    #[test]
    fn action_is_applied_to_displayed_photo() {
        let query = LightboxQuery {
            photo_id: Some("c".to_owned()),
            zoom: Some(2.0),
            action: Some(LightboxAction::Next),
            ..Default::default()
        };

        assert_eq!(query.resolve(&photos()), LightboxState::open(0));
    }

    #[test]
    fn zoom_from_query_is_clamped() {
        let query = LightboxQuery {
            photo_id: Some("a".to_owned()),
            zoom: Some(99.0),
            action: Some(LightboxAction::ZoomIn),
            ..Default::default()
        };

        assert_eq!(
            query.resolve(&photos()),
            LightboxState::Open {
                index: 0,
                zoom: Zoom::new(Zoom::MAX)
            }
        );
    }

    #[test]
    fn missing_photo_closes() {
        let query = LightboxQuery {
            photo_id: Some("deleted".to_owned()),
            ..Default::default()
        };

        assert_eq!(query.resolve(&photos()), LightboxState::Closed);
        assert_eq!(LightboxQuery::default().resolve(&photos()), LightboxState::Closed);
    }

    #[test]
    fn vals_round_trip_through_query_string() {
        let vals = lightbox_vals(
            &PhotoId::new("b"),
            CategoryFilter::Only(Category::Guests),
            Some(Zoom::new(1.2)),
            Some(LightboxAction::ZoomOut),
        );
        let vals: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&vals).unwrap();
        let query_string = vals
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(value) => format!("{key}={value}"),
                value => format!("{key}={value}"),
            })
            .collect::<Vec<_>>()
            .join("&");

        let query: LightboxQuery = serde_urlencoded::from_str(&query_string).unwrap();

        assert_eq!(query.photo_id.as_deref(), Some("b"));
        assert_eq!(query.category.as_deref(), Some("Guests"));
        assert_eq!(query.zoom, Some(1.2));
        assert_eq!(query.action, Some(LightboxAction::ZoomOut));
    }
}
