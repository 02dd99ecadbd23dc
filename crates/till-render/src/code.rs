//! # Code Reference Encoder
//!
//! Encodes a URL as a QR code and rasterizes it to PNG.
//!
//! ```text
//!  "http://localhost:8000/media/receipt_….pdf"
//!        │
//!        ▼  QrCode::with_error_correction_level(payload, level)
//!  module matrix (21×21 .. 177×177)
//!        │
//!        ▼  scale × scale pixels per module, 4-module quiet zone
//!  Luma8 image ──► PNG bytes
//! ```
//!
//! Output is deterministic: the same payload and settings always give the
//! same bytes.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::{RenderError, RenderResult};

/// Encodes a payload string as a raster image.
pub trait CodeEncoder: Send + Sync {
    fn encode(&self, payload: &str) -> RenderResult<Vec<u8>>;

    /// MIME type of the produced image.
    fn content_type(&self) -> &'static str;
}

// =============================================================================
// Error Correction
// =============================================================================

/// QR error-correction level; higher levels survive more damage but
/// need larger codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery
    Low,
    /// ~15% recovery
    #[default]
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl ErrorCorrection {
    fn level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = RenderError;

    /// Accepts `L`, `M`, `Q` or `H`, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::Low),
            "M" => Ok(ErrorCorrection::Medium),
            "Q" => Ok(ErrorCorrection::Quartile),
            "H" => Ok(ErrorCorrection::High),
            _ => Err(RenderError::Encoding(format!(
                "unknown error correction level '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        };
        f.write_str(letter)
    }
}

// =============================================================================
// QR Encoder
// =============================================================================

/// Default pixels per QR module.
pub const DEFAULT_MODULE_SCALE: u32 = 10;

/// QR [`CodeEncoder`] producing PNG images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrEncoder {
    pub error_correction: ErrorCorrection,
    /// Pixels per module, on both axes.
    pub scale: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        QrEncoder {
            error_correction: ErrorCorrection::default(),
            scale: DEFAULT_MODULE_SCALE,
        }
    }
}

impl QrEncoder {
    pub fn new(error_correction: ErrorCorrection, scale: u32) -> Self {
        QrEncoder {
            error_correction,
            scale: scale.max(1),
        }
    }
}

impl CodeEncoder for QrEncoder {
    fn encode(&self, payload: &str) -> RenderResult<Vec<u8>> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.error_correction.level())?;

        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.scale, self.scale)
            .quiet_zone(true)
            .build();

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Decodes the first QR code found in `png`.
    fn decode(png: &[u8]) -> String {
        let image = image::load_from_memory(png).unwrap().to_luma8();
        let (width, height) = image.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| image.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        grids[0].decode().unwrap().1
    }

    #[test]
    fn test_encode_round_trips_url() {
        let url = "http://localhost:8000/media/receipt_0f8c2d2e6d3a4b4f9a1b2c3d4e5f6a7b.pdf";
        let png = QrEncoder::default().encode(url).unwrap();

        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert_eq!(decode(&png), url);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = QrEncoder::new(ErrorCorrection::High, 4);
        assert_eq!(encoder.encode("abc").unwrap(), encoder.encode("abc").unwrap());
    }

    #[test]
    fn test_scale_changes_image_size() {
        let small = QrEncoder::new(ErrorCorrection::Medium, 2).encode("abc").unwrap();
        let large = QrEncoder::new(ErrorCorrection::Medium, 8).encode("abc").unwrap();

        let small = image::load_from_memory(&small).unwrap();
        let large = image::load_from_memory(&large).unwrap();
        assert_eq!(large.width(), small.width() * 4);
    }

    #[test]
    fn test_payload_too_long() {
        let payload = "x".repeat(8000);
        let err = QrEncoder::default().encode(&payload).unwrap_err();
        assert!(matches!(err, RenderError::Encoding(_)));
    }

    #[test]
    fn test_error_correction_parse() {
        assert_eq!("l".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::Low);
        assert_eq!("H".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::High);
        assert!("X".parse::<ErrorCorrection>().is_err());
        assert_eq!(ErrorCorrection::Quartile.to_string(), "Q");
    }
}
