//! Commit-then-upload as one awaited operation.

use avatar_core::{CropController, CropError, CropOutcome};
use tracing::{debug, warn};

use crate::{PhotoUploader, SessionToken};

/// Commit the controller's crop, upload it, and feed the result back.
///
/// Holding `&mut CropController` across the upload keeps a single commit in
/// flight per controller.
///
/// Returns `CropOutcome::Completed` once the photo is stored. A rejected or
/// failed upload returns `CropError::UploadRejected` with the message to show
/// and leaves the controller in `Editing`, crop preserved. Commit failures
/// (`NoCropSelected`, `SurfaceUnavailable`, `EncodingFailed`) are returned
/// without contacting the uploader.
pub async fn commit_and_upload<U: PhotoUploader>(
    controller: &mut CropController,
    uploader: &U,
    session: &SessionToken,
) -> Result<CropOutcome, CropError> {
    let photo = match controller.commit()? {
        CropOutcome::ReadyForUpload(photo) => photo,
        other => return Ok(other),
    };

    debug!(bytes = photo.len(), "uploading committed photo");
    match uploader.upload(session, &photo).await {
        Ok(()) => controller.upload_succeeded(),
        Err(err) => {
            warn!(error = %err, "upload failed, returning to editor");
            controller.upload_failed(err.user_message())
        }
    }
}
