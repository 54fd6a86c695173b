//! Events and outcomes of the crop state machine.

use serde::{Deserialize, Serialize};

use crate::decode::SourceFile;
use crate::encode::EncodedPhoto;
use crate::geometry::Point;

/// Lifecycle phase of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropPhase {
    /// No image loaded.
    #[default]
    Idle,
    /// Image loaded; pan, zoom and rotation accepted.
    Editing,
    /// Photo produced and awaiting the upload outcome; input locked.
    Committing,
}

/// Input to the crop state machine.
#[derive(Debug)]
pub enum CropEvent {
    /// A file was picked; decode it and start a fresh session.
    Load(SourceFile),
    /// Drag by a fraction of the viewport (one unit = one crop width/height).
    PanBy { dx: f64, dy: f64 },
    SetPan(Point),
    SetZoom(f64),
    /// Change zoom by a number of configured zoom steps.
    ZoomBy(f64),
    SetRotation(f64),
    RotateBy(f64),
    /// Restore pan, zoom and rotation defaults.
    Reset,
    Commit,
    UploadSucceeded,
    UploadFailed(String),
    Cancel,
}

/// Result of a successfully handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// Source or crop state changed; the cached rectangle is current.
    Updated,
    /// Rasterize and encode finished; hand the photo to the uploader.
    ReadyForUpload(EncodedPhoto),
    /// Upload acknowledged; session closed and source released.
    Completed,
    /// Session cancelled and source released.
    Cancelled,
    /// Cancel recorded; applied when the in-flight upload resolves.
    CancelPending,
    /// Event had no effect in the current phase.
    Ignored,
}
