use std::io::Cursor;

use anyhow::Context;
use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use qrsite_core_qr_contracts::{QrEncodeError, QrFeatureService};
use qrsite_models::qr::{QrImage, QrPayload, QrWidth};
use tracing::error;

pub mod preview;
pub mod terminal;

#[derive(Debug, Clone, Copy, Default)]
pub struct QrFeatureServiceImpl;

impl QrFeatureService for QrFeatureServiceImpl {
    #[tracing::instrument(skip_all, fields(chars = payload.chars().count(), width = *width))]
    async fn encode(
        &self,
        payload: String,
        width: QrWidth,
    ) -> Result<Option<QrImage>, QrEncodeError> {
        let payload = QrPayload::try_new(payload).map_err(|_| QrEncodeError::PayloadTooLong)?;
        if payload.is_blank() {
            return Ok(None);
        }

        let width = *width;
        let image = tokio::task::spawn_blocking(move || render_png(&payload, width))
            .await
            .context("QR encoder task failed")?
            .map_err(|err| {
                error!("Failed to generate QR code: {err:#}");
                QrEncodeError::Encode
            })?;

        Ok(Some(image))
    }
}

pub(crate) fn encode_symbol(payload: &str) -> anyhow::Result<QrCode> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .context("Payload does not fit into a QR code")
}

/// Renders a black on white PNG of `width` x `width` pixels.
///
/// Modules are always a whole number of pixels. Leftover space is filled
/// with light border around the symbol. A symbol wider than `width` at one
/// pixel per module is returned at that larger size.
fn render_png(payload: &str, width: u32) -> anyhow::Result<QrImage> {
    let symbol = encode_symbol(payload)?
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .dark_color(Luma([0]))
        .light_color(Luma([255]))
        .max_dimensions(width, width)
        .build();

    let image = pad(symbol, width);
    let width = image.width();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode png")?;
    Ok(QrImage { png, width })
}

fn pad(symbol: GrayImage, width: u32) -> GrayImage {
    if symbol.width() >= width {
        return symbol;
    }

    let offset = i64::from((width - symbol.width()) / 2);
    let mut canvas = GrayImage::from_pixel(width, width, Luma([255]));
    imageops::overlay(&mut canvas, &symbol, offset, offset);
    canvas
}
