//! HTTP route handlers.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod orders;
pub mod requests;
pub mod users;

/// CSV download with an attachment filename.
pub(crate) fn csv_response(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
