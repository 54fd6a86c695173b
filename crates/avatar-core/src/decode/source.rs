//! Decoding of user-selected image files with EXIF orientation handling.
//!
//! The file picker hands over raw bytes plus a MIME type. The format is
//! sniffed from the bytes first and the MIME type is only consulted when
//! sniffing fails. Orientation is applied the way browsers do when an `<img>`
//! is decoded, so the crop geometry matches what the user saw.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

/// Decode an image file into RGB pixels, applying EXIF orientation.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes
/// * `mime_type` - MIME type reported by the file picker, if any
///
/// # Errors
///
/// - `DecodeError::EmptyInput` for an empty buffer
/// - `DecodeError::UnsupportedFormat` if neither the bytes nor the MIME type
///   identify a supported format
/// - `DecodeError::CorruptedFile` if decoding fails
/// - `DecodeError::EmptyImage` if the decoded image has a zero dimension
pub fn decode_source(bytes: &[u8], mime_type: Option<&str>) -> Result<SourceImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let orientation = extract_orientation(bytes);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        match mime_type.and_then(ImageFormat::from_mime_type) {
            Some(format) => reader.set_format(format),
            None => {
                return Err(DecodeError::UnsupportedFormat(
                    mime_type.unwrap_or("unknown").to_string(),
                ))
            }
        }
    }

    let img = reader.decode().map_err(map_image_error)?;
    let rgb_img = apply_orientation(img, orientation).into_rgb8();

    let (width, height) = rgb_img.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    Ok(SourceImage::from_rgb_image(rgb_img))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::UnsupportedFormat(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

/// Extract EXIF orientation from file bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
