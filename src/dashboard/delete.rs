//! Deleting photos from the dashboard.

use axum::{
    extract::{FromRef, Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppState, Error,
    alert::Alert,
    backend::{BackendClient, ObjectStorage, PhotoStore},
    gallery::PhotoCache,
    photo::{Photo, PhotoId},
};

/// The state needed for deleting photos.
#[derive(Debug, Clone)]
pub struct DeletePhotoState {
    /// The services the photo and its binaries are deleted from.
    pub backend: BackendClient,
    /// The cache the photo is removed from.
    pub gallery: PhotoCache,
}

impl FromRef<AppState> for DeletePhotoState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            gallery: state.gallery.clone(),
        }
    }
}

/// Delete a photo's record, its image and its thumbnail, then update the cache.
///
/// The steps run in that order and stop at the first failure. Steps that
/// already succeeded are not undone, and the cache is only changed when every
/// step succeeded.
///
/// # Errors
///
/// Returns [Error::DeleteMissingPhoto] if the photo is not in the gallery, or
/// the first error from the document store or object storage.
pub async fn delete_photo(
    backend: &BackendClient,
    gallery: &PhotoCache,
    photo_id: &PhotoId,
) -> Result<(), Error> {
    let Some(photo) = gallery.get(photo_id)? else {
        tracing::debug!("Tried to delete photo {photo_id} which is not in the gallery");
        return Err(Error::DeleteMissingPhoto);
    };

    let photos = backend.photos_handle();
    let storage = backend.storage_handle();

    let result =
        tokio::task::spawn_blocking(move || delete_remote(photos.as_ref(), storage.as_ref(), &photo))
            .await
            .map_err(|error| Error::TaskError(error.to_string()))
            .and_then(|result| result);

    if let Err(error) = &result {
        tracing::error!("Could not delete photo {photo_id}: {error}");
    }

    gallery.apply_delete(photo_id, &result)?;

    result
}

fn delete_remote(
    photos: &dyn PhotoStore,
    storage: &dyn ObjectStorage,
    photo: &Photo,
) -> Result<(), Error> {
    photos.delete(&photo.id)?;

    let path = storage.path_from_url(&photo.url)?;
    storage.delete(&path)?;

    if let Some(thumbnail_url) = &photo.thumbnail_url {
        let path = storage.path_from_url(thumbnail_url)?;
        storage.delete(&path)?;
    }

    tracing::info!("Deleted photo {}", photo.id);

    Ok(())
}

/// Delete a photo from the dashboard grid.
///
/// The response body is empty so that the photo's card is swapped out of the
/// grid, with a success alert swapped in out of band.
pub async fn delete_photo_endpoint(
    State(state): State<DeletePhotoState>,
    Path(photo_id): Path<String>,
) -> Response {
    let photo_id = PhotoId::new(&photo_id);

    match delete_photo(&state.backend, &state.gallery, &photo_id).await {
        Ok(()) => Html(
            Alert::Success {
                message: "Photo deleted".to_owned(),
            }
            .into_oob_html()
            .into_string(),
        )
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
