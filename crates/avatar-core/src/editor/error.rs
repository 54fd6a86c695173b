//! Error taxonomy of the crop editor.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::transform::RasterError;

/// Errors surfaced by the crop controller.
///
/// None of these leave the controller unusable; each one is recorded as the
/// controller's last error and the state machine settles in a valid phase.
#[derive(Debug, Error)]
pub enum CropError {
    /// The selected file could not be decoded.
    #[error("Could not load image: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// No drawing surface could be acquired for the crop.
    #[error("Could not rasterize crop: {0}")]
    SurfaceUnavailable(#[from] RasterError),

    /// The rasterized crop could not be compressed.
    #[error("Could not encode crop: {0}")]
    EncodingFailed(#[from] EncodeError),

    /// The upload collaborator returned a non-success response.
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// Commit requested without a resolved crop rectangle.
    #[error("No crop selected")]
    NoCropSelected,

    /// Crop input received while no image is loaded.
    #[error("No image loaded")]
    NoImageLoaded,

    /// Input received while a commit is in flight.
    #[error("Input is locked while a commit is in flight")]
    InputLocked,
}

impl CropError {
    /// Short message suitable for showing next to the editor.
    pub fn user_message(&self) -> String {
        match self {
            CropError::DecodeFailed(_) => "Could not load the selected image".to_string(),
            CropError::SurfaceUnavailable(_) | CropError::EncodingFailed(_) => {
                "Could not process the photo".to_string()
            }
            CropError::UploadRejected(message) => message.clone(),
            CropError::NoCropSelected => "Select an area to crop first".to_string(),
            CropError::NoImageLoaded => "Select an image first".to_string(),
            CropError::InputLocked => "Please wait for the upload to finish".to_string(),
        }
    }

    /// Whether the user can retry without selecting the image again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CropError::DecodeFailed(_))
    }
}
