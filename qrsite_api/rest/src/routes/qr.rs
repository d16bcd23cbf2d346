use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use qrsite_core_qr_contracts::{QrEncodeError, QrFeatureService};
use qrsite_models::qr::{QrImage, QrWidth};
use qrsite_shared_contracts::time::TimeService;
use serde::Deserialize;

use super::error;
use crate::{
    extractors::{ApiJson, ApiQuery},
    models::qr::{ApiQrRequest, ApiQrResponse},
};

pub const QR_ROUTE: &str = "/api/qr";
pub const QR_PNG_ROUTE: &str = "/api/qr.png";

struct QrState<Qr, Time> {
    qr: Arc<Qr>,
    time: Arc<Time>,
    default_width: QrWidth,
}

// derive(Clone) would require `Qr: Clone` and `Time: Clone`
impl<Qr, Time> Clone for QrState<Qr, Time> {
    fn clone(&self) -> Self {
        Self {
            qr: Arc::clone(&self.qr),
            time: Arc::clone(&self.time),
            default_width: self.default_width,
        }
    }
}

pub fn router<Qr: QrFeatureService, Time: TimeService>(
    qr: Arc<Qr>,
    time: Arc<Time>,
    default_width: QrWidth,
) -> Router<()> {
    Router::new()
        .route(QR_ROUTE, routing::post(encode::<Qr, Time>))
        .route(QR_PNG_ROUTE, routing::get(download::<Qr, Time>))
        .with_state(QrState {
            qr,
            time,
            default_width,
        })
}

async fn encode<Qr: QrFeatureService, Time: TimeService>(
    State(state): State<QrState<Qr, Time>>,
    ApiJson(request): ApiJson<ApiQrRequest>,
) -> Response {
    let width = state.width(request.width);
    match state.qr.encode(request.text, width).await {
        Ok(image) => Json(ApiQrResponse {
            data_url: image.as_ref().map(QrImage::to_data_url),
            width: image.as_ref().map_or(*width, |image| image.width),
        })
        .into_response(),
        Err(err) => encode_error(err),
    }
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    text: String,
    width: Option<u32>,
}

async fn download<Qr: QrFeatureService, Time: TimeService>(
    State(state): State<QrState<Qr, Time>>,
    ApiQuery(query): ApiQuery<DownloadQuery>,
) -> Response {
    let width = state.width(query.width);
    match state.qr.encode(query.text, width).await {
        Ok(Some(image)) => {
            let filename = format!("qrcode-{}.png", state.time.now().timestamp_millis());
            (
                [
                    (header::CONTENT_TYPE, "image/png".to_owned()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                image.png,
            )
                .into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => encode_error(err),
    }
}

impl<Qr, Time> QrState<Qr, Time> {
    fn width(&self, requested: Option<u32>) -> QrWidth {
        requested.map_or(self.default_width, QrWidth::new)
    }
}

fn encode_error(err: QrEncodeError) -> Response {
    match err {
        QrEncodeError::PayloadTooLong => error(StatusCode::BAD_REQUEST, err.to_string()),
        QrEncodeError::Encode => error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        QrEncodeError::Other(err) => {
            tracing::error!("Failed to generate QR code: {err:#}");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                QrEncodeError::Encode.to_string(),
            )
        }
    }
}
