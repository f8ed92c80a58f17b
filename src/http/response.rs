//! Response construction.
//!
//! # Responsibilities
//! - Region redirects: `307 Temporary Redirect`, `Location`, empty body
//! - Rejections for requests the edge cannot interpret
//!
//! # Design Decisions
//! - 307 keeps the method and body of the original request
//! - The redirect is temporary because it depends on the referrer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Redirect to the region-qualified URL.
pub fn temporary_redirect(location: &str) -> Response {
    Redirect::temporary(location).into_response()
}

/// Reject a request the edge cannot interpret.
pub fn bad_request(reason: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}
