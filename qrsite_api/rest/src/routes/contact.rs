use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use qrsite_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, DeliveryRejection,
};

use super::{error, error_with_details, internal_server_error};
use crate::{
    extractors::ApiJson,
    models::{
        contact::{ApiContactSubmission, ApiContactSuccess},
        ApiErrorDetails,
    },
};

pub const CONTACT_ROUTE: &str = "/api/contact";

const SUCCESS_MESSAGE: &str = "Correo enviado con éxito";
const DELIVERY_ERROR_MESSAGE: &str = "Failed to send email (resend error)";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(CONTACT_ROUTE, routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    ApiJson(submission): ApiJson<ApiContactSubmission>,
) -> Response {
    match service.submit(submission.into()).await {
        Ok(ticket) => Json(ApiContactSuccess {
            success: true,
            message: SUCCESS_MESSAGE,
            id: Some(ticket.id),
        })
        .into_response(),
        Err(ContactSubmitError::Validation(err)) => error(StatusCode::BAD_REQUEST, err.to_string()),
        Err(err @ ContactSubmitError::Configuration) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(ContactSubmitError::Delivery(DeliveryRejection {
            message,
            status_code,
            name,
        })) => error_with_details(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.unwrap_or_else(|| DELIVERY_ERROR_MESSAGE.into()),
            Some(ApiErrorDetails { status_code, name }),
        ),
        Err(err @ ContactSubmitError::Transport(_)) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
