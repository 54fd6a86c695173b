//! Avatar Core - profile photo crop pipeline
//!
//! This crate provides the platform-independent half of the profile photo
//! editor: crop geometry, rasterization with rotation, JPEG encoding and the
//! crop session state machine. Bindings and the upload client live in
//! sibling crates.

pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod transform;

pub use config::CropConfig;
pub use decode::{SourceFile, SourceImage};
pub use editor::{CropController, CropError, CropEvent, CropOutcome, CropPhase};
pub use encode::EncodedPhoto;
pub use geometry::{resolve_crop_rect, CropState, Point, Rectangle};
pub use transform::{rasterize, InterpolationFilter, OutputRaster, RasterOptions};
