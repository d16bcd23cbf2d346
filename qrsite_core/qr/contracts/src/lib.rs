use std::future::Future;

use qrsite_models::qr::{QrImage, QrWidth};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait QrFeatureService: Send + Sync + 'static {
    /// Encodes the payload as a square PNG of `width` pixels.
    ///
    /// Returns `None` if the payload is blank.
    fn encode(
        &self,
        payload: String,
        width: QrWidth,
    ) -> impl Future<Output = Result<Option<QrImage>, QrEncodeError>> + Send;
}

#[derive(Debug, Error)]
pub enum QrEncodeError {
    #[error("Text is too long. Maximum 2000 characters.")]
    PayloadTooLong,
    #[error("Failed to generate QR code. Please try again.")]
    Encode,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockQrFeatureService {
    pub fn with_encode(
        mut self,
        payload: String,
        width: QrWidth,
        result: Result<Option<QrImage>, QrEncodeError>,
    ) -> Self {
        self.expect_encode()
            .once()
            .with(
                mockall::predicate::eq(payload),
                mockall::predicate::eq(width),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
