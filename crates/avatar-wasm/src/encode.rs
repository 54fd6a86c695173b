//! Photo encoding WASM bindings.
//!
//! Lets the page encode a raster it produced itself (for example from a
//! canvas `ImageData`) the same way the editor encodes a committed crop.
//!
//! # Example
//!
//! ```typescript
//! import { encode_photo } from '@avatar/wasm';
//!
//! // RGB pixels, 3 bytes per pixel
//! const photo = encode_photo(pixels, 256, 256, 92);
//! console.log(`Encoded ${photo.byteLength} bytes as ${photo.fileName}`);
//! ```

use avatar_core::config::DEFAULT_JPEG_QUALITY;
use avatar_core::encode::encode_raster;
use avatar_core::OutputRaster;
use wasm_bindgen::prelude::*;

use crate::types::JsEncodedPhoto;

/// Encode RGB pixel data as the profile photo JPEG.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data as a `Uint8Array` (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100); omit for the browser default of 92
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 3
/// - Width or height is zero
/// - Encoding fails internally
#[wasm_bindgen]
pub fn encode_photo(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    quality: Option<u8>,
) -> Result<JsEncodedPhoto, JsValue> {
    let raster = OutputRaster {
        width,
        height,
        pixels,
    };
    encode_raster(&raster, quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100))
        .map(JsEncodedPhoto::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tests for encode bindings.
///
/// Note: Error paths return `JsValue`, which only works on wasm32 targets.
/// For comprehensive encode testing, see the tests in `avatar_core::encode`.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_photo_creates_valid_jpeg() {
        let photo = encode_photo(vec![128u8; 10 * 10 * 3], 10, 10, Some(90))
            .ok()
            .unwrap();

        assert_eq!((photo.width(), photo.height()), (10, 10));
        assert_eq!(photo.mime_type(), "image/jpeg");
        // Verify JPEG magic bytes
        assert_eq!(&photo.bytes()[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_photo_default_quality() {
        let photo = encode_photo(vec![64u8; 8 * 4 * 3], 8, 4, None).ok().unwrap();
        assert!(photo.byte_length() > 0);
    }
}
