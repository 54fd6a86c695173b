//! The in-memory drawing surface a crop is rasterized into.

use thiserror::Error;

/// Longest side a surface may have (browser canvas limit).
pub const MAX_SURFACE_SIDE: u32 = 32_767;

/// Largest pixel count a surface may have (browser canvas limit).
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Errors that can occur while rasterizing a crop.
#[derive(Debug, Error)]
pub enum RasterError {
    /// A drawing surface of the requested size could not be acquired.
    #[error("Drawing surface unavailable for {width}x{height}: {reason}")]
    SurfaceUnavailable {
        width: u32,
        height: u32,
        reason: &'static str,
    },
}

/// A fixed-size RGB pixel buffer produced once per commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRaster {
    pub width: u32,
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl OutputRaster {
    /// Acquire a surface and fill it with an opaque background colour.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::SurfaceUnavailable` for zero or oversized
    /// dimensions, or if the buffer cannot be allocated.
    pub fn filled(width: u32, height: u32, background: [u8; 3]) -> Result<Self, RasterError> {
        let unavailable = |reason| RasterError::SurfaceUnavailable {
            width,
            height,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(unavailable("zero-sized surface"));
        }
        if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
            return Err(unavailable("side exceeds surface limit"));
        }
        if width as u64 * height as u64 > MAX_SURFACE_AREA {
            return Err(unavailable("area exceeds surface limit"));
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| unavailable("buffer size overflow"))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| unavailable("allocation failed"))?;
        for _ in 0..(len / 3) {
            pixels.extend_from_slice(&background);
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create an OutputRaster from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = self.index(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 3].copy_from_slice(&rgb);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Check if this is an empty/invalid raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
