//! Encoding of the committed crop for upload.
//!
//! This module provides functionality for:
//! - Encoding an output raster to JPEG (opaque, lossy)
//! - Wrapping the bytes with the metadata the upload collaborator needs
//!
//! # Examples
//!
//! ```ignore
//! use avatar_core::encode::encode_raster;
//!
//! let photo = encode_raster(&raster, 92).unwrap();
//! println!("Encoded {} bytes", photo.len());
//! ```

mod jpeg;

pub use jpeg::{
    encode_jpeg, encode_raster, EncodeError, EncodedPhoto, JPEG_MIME, PHOTO_FILE_NAME,
};
