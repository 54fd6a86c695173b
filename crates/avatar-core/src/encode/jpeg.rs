//! JPEG encoding of the committed crop.
//!
//! This module provides JPEG encoding using the `image` crate's JPEG encoder.
//! JPEG carries no alpha channel, so the raster is always opaque RGB; the
//! rasterizer's background fill guarantees there is nothing to lose.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::transform::OutputRaster;

/// MIME type of every encoded photo.
pub const JPEG_MIME: &str = "image/jpeg";

/// File name the upload collaborator receives.
pub const PHOTO_FILE_NAME: &str = "profile-photo.jpg";

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// An encoded crop, ready to hand to the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPhoto {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedPhoto {
    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME
    }

    pub fn file_name(&self) -> &'static str {
        PHOTO_FILE_NAME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode an output raster as a JPEG photo.
///
/// # Errors
///
/// Returns `EncodeError::EncodingFailed` if the raster is empty, or any error
/// from [`encode_jpeg`].
pub fn encode_raster(raster: &OutputRaster, quality: u8) -> Result<EncodedPhoto, EncodeError> {
    if raster.is_empty() {
        return Err(EncodeError::EncodingFailed("raster is empty".to_string()));
    }

    let bytes = encode_jpeg(&raster.pixels, raster.width, raster.height, quality)?;
    debug!(
        width = raster.width,
        height = raster.height,
        bytes = bytes.len(),
        "encoded crop"
    );

    Ok(EncodedPhoto {
        bytes,
        width: raster.width,
        height: raster.height,
    })
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    // Validate dimensions
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    // Validate pixel data length
    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decode::decode_source;
    use proptest::prelude::*;

    /// Strategy for generating raster dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=48, 1u32..=48)
    }

    proptest! {
        /// Property: Encode then decode yields the original dimensions.
        #[test]
        fn prop_roundtrip_dimensions(
            (width, height) in dimensions_strategy(),
            quality in 1u8..=100,
            seed in any::<u8>(),
        ) {
            let mut out = OutputRaster::filled(width, height, [255, 255, 255]).unwrap();
            for y in 0..height {
                for x in 0..width {
                    let v = (x * 7 + y * 13) as u8 ^ seed;
                    out.put_pixel(x, y, [v, v.wrapping_mul(3), 255 - v]);
                }
            }

            let photo = encode_raster(&out, quality).unwrap();
            let decoded = decode_source(&photo.bytes, Some(JPEG_MIME)).unwrap();

            prop_assert_eq!((decoded.width, decoded.height), (width, height));
        }

        /// Property: Mismatched pixel data length always returns an error.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in dimensions_strategy(),
            delta in 1usize..=10,
            longer in any::<bool>(),
        ) {
            let expected = (width as usize) * (height as usize) * 3;
            let actual = if longer { expected + delta } else { expected.saturating_sub(delta) };
            prop_assume!(actual != expected);

            let result = encode_jpeg(&vec![0u8; actual], width, height, 90);
            prop_assert!(
                matches!(result, Err(EncodeError::InvalidPixelData { .. })),
                "Mismatched pixel data should return InvalidPixelData error"
            );
        }

        /// Property: Same raster always produces the same bytes.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
        ) {
            let out = OutputRaster::filled(width, height, [100, 100, 100]).unwrap();
            let a = encode_raster(&out, quality).unwrap();
            let b = encode_raster(&out, quality).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
