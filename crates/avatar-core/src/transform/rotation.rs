//! Rotated drawing of a crop rectangle with bilinear and Lanczos3 interpolation.
//!
//! The surface behaves like a 2D canvas with a rotation transform about its
//! centre: the crop rectangle is drawn unscaled at the surface origin, then
//! rotated clockwise by the given angle. Exposed corners keep the background.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each output pixel centre `p` we find
//! the point `q` of the unrotated drawing that lands on it, with `c` the
//! surface centre:
//! ```text
//! q_x = (p_x - c_x) * cos(θ) + (p_y - c_y) * sin(θ) + c_x
//! q_y = -(p_x - c_x) * sin(θ) + (p_y - c_y) * cos(θ) + c_y
//! ```
//! `q` outside the surface, or `rect.origin + q` outside the source, leaves
//! the background in place.

use serde::{Deserialize, Serialize};

use crate::decode::SourceImage;
use crate::geometry::Rectangle;

use super::OutputRaster;

/// Interpolation filter for rotated sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation.
    Lanczos3,
}

/// Draw `rect` of `image` into `surface`, rotated clockwise about the
/// surface centre.
pub(crate) fn draw_rotated(
    image: &SourceImage,
    rect: &Rectangle,
    angle_degrees: f64,
    filter: InterpolationFilter,
    surface: &mut OutputRaster,
) {
    let (w, h) = (surface.width as f64, surface.height as f64);
    let cx = w / 2.0;
    let cy = h / 2.0;

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let (origin_x, origin_y) = (rect.x as f64, rect.y as f64);
    let (img_w, img_h) = (image.width as f64, image.height as f64);

    for out_y in 0..surface.height {
        for out_x in 0..surface.width {
            // Translate pixel centre to origin at surface centre
            let dx = out_x as f64 + 0.5 - cx;
            let dy = out_y as f64 + 0.5 - cy;

            // Undo the clockwise rotation
            let qx = dx * cos + dy * sin + cx;
            let qy = -dx * sin + dy * cos + cy;

            if qx < 0.0 || qy < 0.0 || qx >= w || qy >= h {
                continue;
            }

            let src_x = origin_x + qx;
            let src_y = origin_y + qy;

            if src_x < 0.0 || src_y < 0.0 || src_x >= img_w || src_y >= img_h {
                continue;
            }

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };
            surface.put_pixel(out_x, out_y, pixel);
        }
    }
}

/// Get a pixel as [f64; 3], clamping coordinates to the image edge.
#[inline]
fn get_pixel_f64(image: &SourceImage, px: i64, py: i64) -> [f64; 3] {
    let px = px.clamp(0, image.width as i64 - 1) as usize;
    let py = py.clamp(0, image.height as i64 - 1) as usize;
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// `x`/`y` are continuous coordinates where pixel `i` covers `[i, i + 1)`,
/// so sampling exactly at a pixel centre returns that pixel unchanged.
fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> [u8; 3] {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();

    // Fractional distances
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - tx) * (1.0 - ty)
            + p10[i] * tx * (1.0 - ty)
            + p01[i] * (1.0 - tx) * ty
            + p11[i] * tx * ty;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels. Neighbours past the edge
/// repeat the edge pixel.
fn sample_lanczos3(image: &SourceImage, x: f64, y: f64) -> [u8; 3] {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(fx - px as f64, 3.0) * lanczos_weight(fy - py as f64, 3.0);

            let pixel = get_pixel_f64(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }

    let mut result = [0u8; 3];
    for i in 0..3 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
