use base64::{engine::general_purpose::STANDARD, Engine};
use nutype::nutype;

/// Maximum number of characters that can be encoded into a QR code.
pub const QR_CODE_MAX_LENGTH: usize = 2000;
pub const QR_CODE_DEFAULT_WIDTH: u32 = 300;
pub const QR_CODE_MIN_WIDTH: u32 = 120;
pub const QR_CODE_MAX_WIDTH: u32 = 600;
/// Width of the quiet zone around the symbol, in modules.
pub const QR_CODE_MARGIN: u32 = 4;

/// Text to be encoded. At most [`QR_CODE_MAX_LENGTH`] characters.
#[nutype(
    validate(len_char_max = 2000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct QrPayload(String);

impl QrPayload {
    /// Whether there is nothing to render.
    pub fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

/// Output width of a QR image in pixels, clamped to
/// `QR_CODE_MIN_WIDTH..=QR_CODE_MAX_WIDTH`.
#[nutype(
    sanitize(with = |width: u32| width.clamp(QR_CODE_MIN_WIDTH, QR_CODE_MAX_WIDTH)),
    default = 300,
    derive(Debug, Clone, Copy, PartialEq, Eq, Default, From, Deref, Serialize, Deserialize)
)]
pub struct QrWidth(u32);

/// A rendered QR code.
#[derive(Clone, PartialEq, Eq)]
pub struct QrImage {
    /// PNG encoded image data.
    pub png: Vec<u8>,
    /// Width and height of the image in pixels.
    pub width: u32,
}

impl QrImage {
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

impl std::fmt::Debug for QrImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrImage")
            .field("png", &format_args!("<{} bytes>", self.png.len()))
            .field("width", &self.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_length() {
        assert!(QrPayload::try_new("x".repeat(QR_CODE_MAX_LENGTH)).is_ok());
        assert!(QrPayload::try_new("x".repeat(QR_CODE_MAX_LENGTH + 1)).is_err());
        assert!(QrPayload::try_new("ü".repeat(QR_CODE_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn payload_blank() {
        assert!(QrPayload::try_new("").unwrap().is_blank());
        assert!(QrPayload::try_new(" \n\t ").unwrap().is_blank());
        assert!(!QrPayload::try_new(" a ").unwrap().is_blank());
    }

    #[test]
    fn width_is_clamped() {
        for (input, expected) in [
            (0, QR_CODE_MIN_WIDTH),
            (119, 120),
            (120, 120),
            (300, 300),
            (600, 600),
            (601, 600),
            (u32::MAX, QR_CODE_MAX_WIDTH),
        ] {
            assert_eq!(*QrWidth::new(input), expected);
        }
        assert_eq!(*QrWidth::default(), QR_CODE_DEFAULT_WIDTH);
    }

    #[test]
    fn data_url() {
        let image = QrImage {
            png: b"png".to_vec(),
            width: 120,
        };

        assert_eq!(image.to_data_url(), "data:image/png;base64,cG5n");
        assert_eq!(format!("{image:?}"), "QrImage { png: <3 bytes>, width: 120 }");
    }
}
