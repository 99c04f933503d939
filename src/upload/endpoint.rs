//! The endpoint that receives the upload form.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    alert::Alert,
    backend::BackendClient,
    config::GalleryConfig,
    endpoints,
    gallery::PhotoCache,
    photo::Category,
    upload::{
        form::{CATEGORY_FIELD, PHOTOS_FIELD},
        pipeline::{UploadFile, upload_into_gallery},
    },
};

/// The state needed for uploading photos.
#[derive(Debug, Clone)]
pub struct UploadState {
    /// The services photos and their records are written to.
    pub backend: BackendClient,
    /// The cache new photos are added to.
    pub gallery: PhotoCache,
    /// Compression and concurrency settings.
    pub config: Arc<GalleryConfig>,
}

impl FromRef<AppState> for UploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            gallery: state.gallery.clone(),
            config: state.config.clone(),
        }
    }
}

/// The parsed contents of the upload form.
#[derive(Debug)]
struct UploadForm {
    category: Category,
    files: Vec<UploadFile>,
}

/// Upload the photos in the form and add them to the gallery.
///
/// On success the client is redirected to the dashboard showing the
/// category the photos were uploaded to. Otherwise an alert is returned.
pub async fn upload_photos_endpoint(
    State(state): State<UploadState>,
    multipart: Multipart,
) -> Response {
    let start_time = std::time::Instant::now();

    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    let file_count = form.files.len();
    let batch_start_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;

    let results = match upload_into_gallery(
        form.files,
        form.category,
        batch_start_ms,
        state.config.clone(),
        state.backend.clone(),
        state.gallery.clone(),
    )
    .await
    {
        Ok(results) => results,
        Err(error) => return error.into_alert_response(),
    };

    let mut errors: Vec<Error> = results.into_iter().filter_map(Result::err).collect();

    tracing::info!(
        "Uploaded {} of {file_count} photos to {} in {}ms",
        file_count - errors.len(),
        form.category,
        start_time.elapsed().as_millis()
    );

    match errors.len() {
        0 => (
            HxRedirect(format!(
                "{}?category={}",
                endpoints::DASHBOARD_VIEW,
                form.category.as_str()
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        failed if failed == file_count => errors.swap_remove(0).into_alert_response(),
        failed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Alert::Error {
                message: format!("{failed} of {file_count} photos could not be uploaded"),
                details: "The other photos were added to the gallery. \
                    Refresh the page and try the missing photos again."
                    .to_owned(),
            },
        )
            .into_response(),
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
    let mut category = Category::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })? {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            CATEGORY_FIELD => {
                let label = field
                    .text()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;
                category = Category::from_stored_label(Some(&label));
            }
            PHOTOS_FIELD => {
                if let Some(file) = read_file(field).await? {
                    files.push(file);
                }
            }
            other => tracing::debug!("Ignoring unexpected multipart field \"{other}\""),
        }
    }

    if files.is_empty() {
        return Err(Error::NoFilesSelected);
    }

    if let Some(file) = files.iter().find(|file| !file.is_image()) {
        tracing::debug!(
            "Rejected \"{}\" with content type {:?}",
            file.file_name,
            file.content_type
        );
        return Err(Error::NotAnImage(file.file_name.clone()));
    }

    Ok(UploadForm { category, files })
}

/// Read a file field, returning `None` for the empty part browsers send when
/// no file was chosen.
async fn read_file(field: Field<'_>) -> Result<Option<UploadFile>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().map(str::to_owned);

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    tracing::debug!("Received file \"{file_name}\" that is {} bytes", bytes.len());

    Ok(Some(UploadFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

#[cfg(test)]
mod upload_photos_endpoint_tests {
    use std::{sync::Arc, time::Duration};

    use axum::{extract::State, http::StatusCode};

    use crate::{
        config::GalleryConfig,
        gallery::PhotoCache,
        photo::{Category, Photo},
        test_utils::{
            InMemoryObjectStorage, MultipartFile, assert_hx_redirect, backend_with_storage,
            must_make_multipart, parse_html_fragment,
        },
        upload::compression::test_images,
    };

    use super::{UploadState, upload_photos_endpoint};

    /// Photo IDs in a stable order, since uploads finish in any order.
    fn sorted_ids(photos: &[Photo]) -> Vec<String> {
        let mut ids: Vec<String> = photos
            .iter()
            .map(|photo| photo.id.as_str().to_owned())
            .collect();
        ids.sort();
        ids
    }

    fn new_state(storage: Arc<InMemoryObjectStorage>) -> UploadState {
        UploadState {
            backend: backend_with_storage(storage),
            gallery: PhotoCache::default(),
            config: Arc::new(GalleryConfig::default()),
        }
    }

    #[tokio::test]
    async fn uploads_photos_and_redirects_to_category() {
        let storage = Arc::new(InMemoryObjectStorage::default());
        let state = new_state(storage.clone());
        let png = test_images::gradient_png(40, 30);
        let files = [
            MultipartFile::image("rings.png", &png),
            MultipartFile::image("cake.png", &png),
        ];

        let response = upload_photos_endpoint(
            State(state.clone()),
            must_make_multipart(Some("Details"), &files).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/dashboard?category=Details");

        let photos = state.gallery.all().unwrap();
        assert_eq!(photos.len(), 2);
        assert!(photos.iter().all(|photo| photo.category == Category::Details));
        assert!(photos[0].url.ends_with("_rings.png"));
        assert!(photos[1].url.ends_with("_cake.png"));
        assert_eq!(
            sorted_ids(&state.backend.photos().list().unwrap()),
            sorted_ids(&photos)
        );
        assert_eq!(storage.objects().len(), 4);
    }

    #[tokio::test]
    async fn missing_category_uses_uncategorized() {
        let storage = Arc::new(InMemoryObjectStorage::default());
        let state = new_state(storage);
        let png = test_images::gradient_png(8, 8);

        let response = upload_photos_endpoint(
            State(state.clone()),
            must_make_multipart(None, &[MultipartFile::image("a.png", &png)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            state.gallery.all().unwrap()[0].category,
            Category::Uncategorized
        );
    }

    #[tokio::test]
    async fn rejects_non_image_before_uploading() {
        let storage = Arc::new(InMemoryObjectStorage::default());
        let state = new_state(storage.clone());
        let png = test_images::gradient_png(8, 8);
        let files = [
            MultipartFile::image("a.png", &png),
            MultipartFile {
                file_name: "guest list.pdf",
                content_type: "application/pdf",
                bytes: b"%PDF-1.7",
            },
        ];

        let response = upload_photos_endpoint(
            State(state.clone()),
            must_make_multipart(Some("Party"), &files).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("guest list.pdf"), "got {text}");
        assert!(storage.objects().is_empty());
        assert!(state.gallery.all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_form_without_files() {
        let state = new_state(Arc::new(InMemoryObjectStorage::default()));
        let files = [MultipartFile {
            file_name: "",
            content_type: "application/octet-stream",
            bytes: b"",
        }];

        let response = upload_photos_endpoint(
            State(state),
            must_make_multipart(Some("Party"), &files).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn partial_failure_keeps_successful_uploads() {
        let storage = Arc::new(InMemoryObjectStorage::rejecting("broken"));
        let state = new_state(storage.clone());
        let png = test_images::gradient_png(8, 8);
        let files = [
            MultipartFile::image("a.png", &png),
            MultipartFile::image("broken.png", &png),
            MultipartFile::image("c.png", &png),
        ];

        let response = upload_photos_endpoint(
            State(state.clone()),
            must_make_multipart(Some("Guests"), &files).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("1 of 3 photos could not be uploaded"), "got {text}");

        let photos = state.gallery.all().unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(
            sorted_ids(&state.backend.photos().list().unwrap()),
            sorted_ids(&photos)
        );
    }

    #[tokio::test]
    async fn total_failure_shows_storage_alert() {
        let storage = Arc::new(InMemoryObjectStorage::rejecting("png"));
        let state = new_state(storage);
        let png = test_images::gradient_png(8, 8);

        let response = upload_photos_endpoint(
            State(state.clone()),
            must_make_multipart(Some("Guests"), &[MultipartFile::image("a.png", &png)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.gallery.all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn photos_reach_gallery_after_client_disconnects() {
        let storage = Arc::new(InMemoryObjectStorage::default());
        let state = UploadState {
            backend: backend_with_storage(storage.clone()),
            gallery: PhotoCache::default(),
            config: Arc::new(GalleryConfig::default().with_max_concurrent_uploads(1)),
        };
        let png = test_images::noisy_png(400, 300);
        let files = [
            MultipartFile::image("a.png", &png),
            MultipartFile::image("b.png", &png),
            MultipartFile::image("c.png", &png),
            MultipartFile::image("d.png", &png),
        ];
        let multipart = must_make_multipart(Some("Party"), &files).await;

        let handler = tokio::spawn(upload_photos_endpoint(State(state.clone()), multipart));

        // Drop the handler once the batch has started writing, like a client
        // going away mid-upload.
        for _ in 0..400 {
            if !storage.objects().is_empty() || handler.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        handler.abort();

        let mut cached = Vec::new();
        for _ in 0..400 {
            cached = state.gallery.all().unwrap();
            if cached.len() == files.len() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        assert_eq!(cached.len(), files.len());
        assert_eq!(
            sorted_ids(&state.backend.photos().list().unwrap()),
            sorted_ids(&cached)
        );
        assert_eq!(storage.objects().len(), 2 * files.len());
    }
}
