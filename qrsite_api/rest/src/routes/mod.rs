use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{ApiError, ApiErrorDetails};

pub mod contact;
pub mod health;
pub mod qr;

pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "Ocurrió un error inesperado. Por favor, inténtalo de nuevo.";

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE)
}

pub fn error(code: StatusCode, message: impl Into<String>) -> Response {
    error_with_details(code, message, None)
}

fn error_with_details(
    code: StatusCode,
    message: impl Into<String>,
    details: Option<ApiErrorDetails>,
) -> Response {
    let body = ApiError {
        error: message.into(),
        details,
    };
    (code, Json(body)).into_response()
}
