//! Crop editor configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::MIN_ZOOM;
use crate::transform::InterpolationFilter;

/// Opaque white, the fill behind rotated corners and out-of-bounds crops.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Browser default quality for `canvas.toBlob(cb, "image/jpeg")`.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Settings for one crop editor instance.
///
/// Deserializes from a partial object: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Target aspect ratio (width / height). 1.0 for round avatars.
    pub aspect_ratio: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom increment applied per `ZoomBy` step.
    pub zoom_step: f64,
    /// RGB fill for exposed margins.
    pub background: [u8; 3],
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// Downscale the output so its longest side is at most this many pixels.
    pub max_output_side: Option<u32>,
    pub interpolation: InterpolationFilter,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: 3.0,
            zoom_step: 0.1,
            background: WHITE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_output_side: None,
            interpolation: InterpolationFilter::Bilinear,
        }
    }
}

impl CropConfig {
    /// Create a config for a square avatar crop with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with out-of-range values replaced by usable ones.
    ///
    /// - aspect ratio must be finite and positive
    /// - `min_zoom >= 1` and `max_zoom >= min_zoom`
    /// - zoom step must be finite and positive
    /// - quality is clamped to 1-100
    /// - `max_output_side` of 0 means no limit
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            self.aspect_ratio = defaults.aspect_ratio;
        }
        if !self.min_zoom.is_finite() || self.min_zoom < MIN_ZOOM {
            self.min_zoom = MIN_ZOOM;
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            self.max_zoom = self.min_zoom.max(defaults.max_zoom);
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            self.zoom_step = defaults.zoom_step;
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.max_output_side == Some(0) {
            self.max_output_side = None;
        }
        self
    }

    /// Clamp a zoom value into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.min_zoom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CropConfig::new();
        assert_eq!(config.aspect_ratio, 1.0);
        assert_eq!(config.min_zoom, 1.0);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.background, [255, 255, 255]);
        assert_eq!(config.jpeg_quality, 92);
        assert_eq!(config.max_output_side, None);
    }

    #[test]
    fn test_sanitized_fixes_bad_values() {
        let config = CropConfig {
            aspect_ratio: 0.0,
            min_zoom: 0.5,
            max_zoom: f64::NAN,
            zoom_step: -1.0,
            jpeg_quality: 0,
            max_output_side: Some(0),
            ..CropConfig::default()
        }
        .sanitized();

        assert_eq!(config.aspect_ratio, 1.0);
        assert_eq!(config.min_zoom, 1.0);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.zoom_step, 0.1);
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.max_output_side, None);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = CropConfig {
            aspect_ratio: 4.0 / 3.0,
            min_zoom: 1.5,
            max_zoom: 5.0,
            max_output_side: Some(512),
            ..CropConfig::default()
        };
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_max_zoom_below_min_is_raised() {
        let config = CropConfig {
            min_zoom: 4.0,
            max_zoom: 2.0,
            ..CropConfig::default()
        }
        .sanitized();
        assert_eq!(config.max_zoom, 4.0);
    }

    #[test]
    fn test_clamp_zoom() {
        let config = CropConfig::default();
        assert_eq!(config.clamp_zoom(0.5), 1.0);
        assert_eq!(config.clamp_zoom(2.0), 2.0);
        assert_eq!(config.clamp_zoom(9.0), 3.0);
        assert_eq!(config.clamp_zoom(f64::NAN), 1.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CropConfig =
            serde_json::from_str(r#"{"aspectRatio": 1.5, "jpegQuality": 80}"#).unwrap();
        assert_eq!(config.aspect_ratio, 1.5);
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.interpolation, InterpolationFilter::Bilinear);
    }

    #[test]
    fn test_deserialize_filter_and_background() {
        let config: CropConfig = serde_json::from_str(
            r#"{"interpolation": "lanczos3", "background": [0, 0, 0], "maxOutputSide": 256}"#,
        )
        .unwrap();
        assert_eq!(config.interpolation, InterpolationFilter::Lanczos3);
        assert_eq!(config.background, [0, 0, 0]);
        assert_eq!(config.max_output_side, Some(256));
    }
}
