//! Axis-aligned extraction of a pixel rectangle.
//!
//! This is the unrotated drawing path: source pixels are copied one-to-one
//! into the surface. Any part of the rectangle that falls outside the source
//! keeps the surface's background colour.

use crate::decode::SourceImage;
use crate::geometry::Rectangle;

use super::OutputRaster;

/// Copy `rect` from `image` into `surface`, which must be `rect`-sized.
///
/// Pixels of `rect` outside the source image are left untouched.
pub(crate) fn copy_region(image: &SourceImage, rect: &Rectangle, surface: &mut OutputRaster) {
    debug_assert_eq!((surface.width, surface.height), (rect.width, rect.height));

    // Intersection of the rectangle with the source, in source coordinates
    let src_left = rect.x.max(0);
    let src_top = rect.y.max(0);
    let src_right = rect.right().min(image.width as i64);
    let src_bottom = rect.bottom().min(image.height as i64);

    if src_left >= src_right || src_top >= src_bottom {
        return;
    }

    let row_bytes = ((src_right - src_left) * 3) as usize;
    let dst_x = (src_left - rect.x) as usize;

    // Copy pixel data row by row for efficiency
    for src_y in src_top..src_bottom {
        let dst_y = (src_y - rect.y) as usize;
        let src_start = (src_y as usize * image.width as usize + src_left as usize) * 3;
        let dst_start = (dst_y * surface.width as usize + dst_x) * 3;

        surface.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }
}
