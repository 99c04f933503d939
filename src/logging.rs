//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values are replaced before a request body is logged.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Content types whose bodies are read and logged.
const TEXT_CONTENT_TYPES: [&str; 5] = [
    "text/",
    "application/json",
    "application/javascript",
    "application/x-www-form-urlencoded",
    "application/xml",
];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
///
/// Only text bodies are read. Uploads, photos and other binary bodies are
/// streamed through untouched and logged by their content type.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let body = if has_text_body(&parts.headers) {
        let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("Could not read request body: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        let body_text = String::from_utf8_lossy(&body_bytes);

        if parts.method == Method::POST && is_form(&parts.headers) {
            let display_text = REDACTED_FIELDS
                .iter()
                .fold(body_text.to_string(), |text, field| redact_field(&text, field));
            log_body("Received request", &parts, &display_text);
        } else {
            log_body("Received request", &parts, &body_text);
        }

        Body::from(body_bytes)
    } else {
        log_streamed("Received request", &parts, &parts.headers);
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    log_response(response).await
}

async fn log_response(response: Response) -> Response {
    let (parts, body) = response.into_parts();

    if !has_text_body(&parts.headers) {
        log_streamed("Sending response", &parts, &parts.headers);
        return Response::from_parts(parts, body);
    }

    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };

    log_body(
        "Sending response",
        &parts,
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Whether a body with these headers is worth reading into the log.
///
/// Bodies without a content type are usually empty, so they count as text.
fn has_text_body(headers: &HeaderMap) -> bool {
    let Some(content_type) = content_type(headers) else {
        return true;
    };

    TEXT_CONTENT_TYPES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
        || content_type.contains("+json")
        || content_type.contains("+xml")
}

fn is_form(headers: &HeaderMap) -> bool {
    content_type(headers)
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

fn redact_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name == field_name => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Cut `text` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate(text: &str) -> &str {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return text;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_streamed(message: &str, parts: &impl std::fmt::Debug, headers: &HeaderMap) {
    tracing::info!(
        "{message}: {parts:#?}\nbody: <{} not logged>",
        content_type(headers).unwrap_or("unknown")
    );
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{message}: {parts:#?}\nbody: {}...", truncate(body));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}: {parts:#?}\nbody: {body:?}");
    }
}
