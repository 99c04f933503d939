#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod multipart;
pub(crate) mod storage;

pub(crate) use form::{assert_form_submit_button, assert_hx_endpoint, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok};
pub(crate) use multipart::{MultipartFile, must_make_multipart};
pub(crate) use storage::{
    FailingObjectStorage, InMemoryObjectStorage, backend_with_storage, get_test_connection,
};
