//! The 404 page returned for unknown routes and missing expenses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Fallback route handler for paths that do not match any route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// The 404 page as a response, for handlers that detect a missing resource.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Whoops! That page does not exist.",
            "Check the URL for typos or head back to the homepage.",
        ),
    )
        .into_response()
}
