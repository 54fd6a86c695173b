//! Source image decoding for the crop editor.
//!
//! This module provides functionality for:
//! - Decoding the user-selected file (JPEG, PNG, WebP) into RGB pixels
//! - Honouring EXIF orientation
//! - Tying the decoded image to the platform resource that backs it
//!
//! # Examples
//!
//! ```ignore
//! use avatar_core::decode::SourceFile;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let handle = SourceFile::new(bytes, Some("image/jpeg".into())).decode().unwrap();
//! println!("Decoded {}x{} image", handle.image().width, handle.image().height);
//! ```

mod handle;
mod source;
mod types;

pub use handle::{ReleaseHook, SourceFile, SourceHandle};
pub use source::decode_source;
pub use types::{DecodeError, Orientation, SourceImage};
