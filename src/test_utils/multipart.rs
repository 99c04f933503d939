use axum::{
    extract::{FromRequest, Multipart},
    http::Request,
};

use crate::endpoints;

const BOUNDARY: &str = "MY_BOUNDARY123456789";

/// A file part in a test upload form.
pub(crate) struct MultipartFile<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> MultipartFile<'a> {
    pub(crate) fn image(file_name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            file_name,
            content_type: "image/png",
            bytes,
        }
    }
}

/// The `Content-Type` header for a body built by [multipart_body].
fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Encode an upload form with an optional category and the given files.
fn multipart_body(category: Option<&str>, files: &[MultipartFile<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(category) = category {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"category\"\r\n\r\n");
        body.extend_from_slice(category.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for file in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"photos\"; filename=\"{}\"\r\n",
                file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    body
}

pub(crate) async fn must_make_multipart(
    category: Option<&str>,
    files: &[MultipartFile<'_>],
) -> Multipart {
    let request = Request::builder()
        .method("POST")
        .uri(endpoints::PHOTOS_API)
        .header("Content-Type", multipart_content_type())
        .body(multipart_body(category, files).into())
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}
