//! Rasterization of a crop rectangle into an output surface.
//!
//! # Pipeline
//!
//! 1. Acquire a surface sized to the crop rectangle, filled with the
//!    background colour
//! 2. Rotate about the surface centre (clockwise-positive degrees)
//! 3. Sample the source rectangle into the rotated coordinate space
//! 4. Optionally downscale so the longest side fits a limit
//!
//! A rotation of 0 (mod 360) takes an exact-copy path, so the output is
//! pixel-for-pixel identical to plain rectangle extraction.

mod extract;
mod rotation;
mod surface;

use image::imageops::FilterType;
use tracing::debug;

use crate::decode::SourceImage;
use crate::geometry::{normalize_rotation, Rectangle};

pub use rotation::InterpolationFilter;
pub use surface::{OutputRaster, RasterError, MAX_SURFACE_AREA, MAX_SURFACE_SIDE};

/// Options controlling how a crop is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Fill for exposed margins.
    pub background: [u8; 3],
    pub filter: InterpolationFilter,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: crate::config::WHITE,
            filter: InterpolationFilter::Bilinear,
        }
    }
}

/// Rasterize `rect` of `image`, rotated clockwise by `angle_degrees` about
/// the output centre.
///
/// The output is exactly `rect.width x rect.height`. Parts of the rectangle
/// outside the source, and corners exposed by rotation, are filled with
/// `options.background`.
///
/// # Errors
///
/// Returns `RasterError::SurfaceUnavailable` if a surface of that size cannot
/// be acquired.
pub fn rasterize(
    image: &SourceImage,
    rect: &Rectangle,
    angle_degrees: f64,
    options: &RasterOptions,
) -> Result<OutputRaster, RasterError> {
    let mut surface = OutputRaster::filled(rect.width, rect.height, options.background)?;
    let angle = normalize_rotation(angle_degrees);

    if angle.abs() < 0.001 {
        extract::copy_region(image, rect, &mut surface);
    } else {
        rotation::draw_rotated(image, rect, angle, options.filter, &mut surface);
    }

    debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        angle,
        "rasterized crop"
    );
    Ok(surface)
}

/// Downscale a raster so its longest side is at most `max_side`.
///
/// Rasters that already fit are returned unchanged. The aspect ratio is
/// preserved and neither side drops below 1.
pub fn fit_within(raster: OutputRaster, max_side: u32) -> Result<OutputRaster, RasterError> {
    if max_side == 0 || (raster.width <= max_side && raster.height <= max_side) {
        return Ok(raster);
    }

    let (new_width, new_height) = calculate_fit_dimensions(raster.width, raster.height, max_side);
    let rgb_image = raster
        .to_rgb_image()
        .ok_or(RasterError::SurfaceUnavailable {
            width: raster.width,
            height: raster.height,
            reason: "pixel buffer does not match dimensions",
        })?;

    let resized = image::imageops::resize(&rgb_image, new_width, new_height, FilterType::Lanczos3);
    Ok(OutputRaster::from_rgb_image(resized))
}

/// Calculate dimensions to fit within max_side while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_side as f64 / ratio).round() as u32;
        (max_side, new_height.max(1))
    } else {
        let new_width = (max_side as f64 * ratio).round() as u32;
        (new_width.max(1), max_side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    fn gradient(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(((x + y) % 200) as u8);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    /// Straight copy of a rectangle lying inside the image.
    fn direct_extract(image: &SourceImage, rect: &Rectangle) -> Vec<u8> {
        let mut out = Vec::new();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                out.extend_from_slice(&image.pixel(x, y).unwrap());
            }
        }
        out
    }

    #[test]
    fn test_zero_rotation_matches_direct_extraction() {
        let img = gradient(80, 60);
        let rect = Rectangle::new(10, 0, 60, 60);
        let out = rasterize(&img, &rect, 0.0, &RasterOptions::default()).unwrap();

        assert_eq!((out.width, out.height), (60, 60));
        assert_eq!(out.pixels, direct_extract(&img, &rect));
    }

    #[test]
    fn test_full_turn_uses_exact_path() {
        let img = gradient(40, 40);
        let rect = Rectangle::new(5, 5, 20, 20);
        let out = rasterize(&img, &rect, 360.0, &RasterOptions::default()).unwrap();
        assert_eq!(out.pixels, direct_extract(&img, &rect));
    }

    #[test]
    fn test_out_of_bounds_fills_white() {
        let img = gradient(20, 20);
        let rect = Rectangle::new(10, 10, 20, 20);
        let out = rasterize(&img, &rect, 0.0, &RasterOptions::default()).unwrap();

        assert_eq!(out.get_pixel(15, 15), WHITE);
        assert_eq!(out.get_pixel(0, 15), WHITE);
        assert_eq!(out.get_pixel(0, 0), img.pixel(10, 10).unwrap());
    }

    #[test]
    fn test_rect_at_coordinate_limit_is_background() {
        let img = gradient(10, 10);
        let far = Rectangle::new(i64::MAX - 1, i64::MAX - 1, 4, 4);

        let exact = rasterize(&img, &far, 0.0, &RasterOptions::default()).unwrap();
        assert!(exact.pixels.iter().all(|&v| v == 255));

        let rotated = rasterize(&img, &far, 45.0, &RasterOptions::default()).unwrap();
        assert!(rotated.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_custom_background() {
        let img = gradient(10, 10);
        let options = RasterOptions {
            background: [0, 0, 0],
            ..RasterOptions::default()
        };
        let out = rasterize(&img, &Rectangle::new(-5, -5, 5, 5), 0.0, &options).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rotation_keeps_dimensions() {
        let img = gradient(100, 80);
        let rect = Rectangle::new(10, 10, 60, 60);
        let out = rasterize(&img, &rect, 33.0, &RasterOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (60, 60));
    }

    #[test]
    fn test_zero_sized_rect_fails() {
        let img = gradient(10, 10);
        let result = rasterize(&img, &Rectangle::new(0, 0, 0, 5), 0.0, &RasterOptions::default());
        assert!(matches!(result, Err(RasterError::SurfaceUnavailable { .. })));
    }

    #[test]
    fn test_fit_within_downscales() {
        let raster = OutputRaster::filled(600, 300, [10, 20, 30]).unwrap();
        let out = fit_within(raster, 200).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
    }

    #[test]
    fn test_fit_within_tall() {
        let raster = OutputRaster::filled(100, 400, [10, 20, 30]).unwrap();
        let out = fit_within(raster, 100).unwrap();
        assert_eq!((out.width, out.height), (25, 100));
    }

    #[test]
    fn test_fit_within_keeps_small_raster() {
        let raster = OutputRaster::filled(50, 50, [10, 20, 30]).unwrap();
        let out = fit_within(raster.clone(), 200).unwrap();
        assert_eq!(out, raster);
    }

    #[test]
    fn test_fit_dimensions_never_zero() {
        assert_eq!(calculate_fit_dimensions(1000, 1, 10), (10, 1));
        assert_eq!(calculate_fit_dimensions(1, 1000, 10), (1, 10));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Out-of-bounds rectangles never fail and pad with background.
        #[test]
        fn prop_out_of_bounds_never_fails(
            (w, h) in (1u32..=30, 1u32..=30),
            x in -40i64..40,
            y in -40i64..40,
            (rw, rh) in (1u32..=40, 1u32..=40),
            angle in -360.0f64..360.0,
        ) {
            let img = SourceImage::new(w, h, vec![0u8; (w * h * 3) as usize]);
            let rect = Rectangle::new(x, y, rw, rh);
            let out = rasterize(&img, &rect, angle, &RasterOptions::default());

            prop_assert!(out.is_ok());
            let out = out.unwrap();
            prop_assert_eq!((out.width, out.height), (rw, rh));

            // Every pixel is either source black or background white
            for p in out.pixels.chunks(3) {
                prop_assert!(p == [255, 255, 255] || p.iter().all(|&v| v < 255));
            }
        }

        /// Property: Unrotated rectangles outside the source are pure background.
        #[test]
        fn prop_disjoint_rect_is_background(
            (w, h) in (1u32..=20, 1u32..=20),
            offset in 0i64..10,
            (rw, rh) in (1u32..=10, 1u32..=10),
        ) {
            let img = SourceImage::new(w, h, vec![7u8; (w * h * 3) as usize]);
            let rect = Rectangle::new(w as i64 + offset, 0, rw, rh);
            let out = rasterize(&img, &rect, 0.0, &RasterOptions::default()).unwrap();
            prop_assert!(out.pixels.iter().all(|&v| v == 255));
        }
    }
}
