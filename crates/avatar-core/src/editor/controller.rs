//! The interactive crop controller.
//!
//! Owns the crop state and the loaded source image, and moves between
//! [`CropPhase`]s in response to [`CropEvent`]s. Events can be dispatched
//! directly or queued and drained in order.
//!
//! ```text
//!            Load                  Commit
//!   Idle ───────────▶ Editing ───────────▶ Committing
//!    ▲                 │   ▲                  │  │
//!    │     Cancel      │   │  UploadFailed    │  │ UploadSucceeded
//!    └─────────────────┘   └──────────────────┘  │
//!    ▲                                           │
//!    └───────────────────────────────────────────┘
//! ```
//!
//! A cancel received while committing does not interrupt the in-flight
//! upload. It is recorded and applied when the upload resolves, so the
//! session always ends in `Idle` with the source released.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::config::CropConfig;
use crate::decode::{SourceFile, SourceHandle, SourceImage};
use crate::encode::{encode_raster, EncodedPhoto};
use crate::geometry::{
    clamp_pan, normalize_rotation, resolve_crop_rect, CropState, Point, Rectangle,
};
use crate::transform::{fit_within, rasterize, RasterOptions};

use super::{CropError, CropEvent, CropOutcome, CropPhase};

/// State machine behind the crop editor.
#[derive(Debug, Default)]
pub struct CropController {
    config: CropConfig,
    phase: CropPhase,
    state: CropState,
    source: Option<SourceHandle>,
    crop_rect: Option<Rectangle>,
    cancel_requested: bool,
    last_error: Option<String>,
    queue: VecDeque<CropEvent>,
}

impl CropController {
    pub fn new(config: CropConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    /// The crop rectangle resolved after the latest input.
    pub fn crop_rect(&self) -> Option<Rectangle> {
        self.crop_rect
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.source.as_ref().map(SourceHandle::image)
    }

    /// Message of the most recent failure, cleared by the next successful event.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_input_locked(&self) -> bool {
        self.phase == CropPhase::Committing
    }

    pub fn is_cancel_pending(&self) -> bool {
        self.cancel_requested
    }

    /// Queue an event for [`process_pending`](Self::process_pending).
    pub fn enqueue(&mut self, event: CropEvent) {
        self.queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch every queued event in order.
    pub fn process_pending(&mut self) -> Vec<Result<CropOutcome, CropError>> {
        let mut results = Vec::with_capacity(self.queue.len());
        while let Some(event) = self.queue.pop_front() {
            results.push(self.dispatch(event));
        }
        results
    }

    /// Apply one event.
    ///
    /// On `Err` the transition has already been applied (for example a failed
    /// upload returns to `Editing`) and the error is recorded as
    /// [`last_error`](Self::last_error).
    pub fn dispatch(&mut self, event: CropEvent) -> Result<CropOutcome, CropError> {
        let result = self.handle(event);
        match &result {
            Ok(CropOutcome::Ignored) => {}
            Ok(_) => self.last_error = None,
            Err(err) => {
                warn!(phase = ?self.phase, error = %err, "crop event failed");
                self.last_error = Some(err.user_message());
            }
        }
        result
    }

    pub fn load(&mut self, file: SourceFile) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::Load(file))
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::PanBy { dx, dy })
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::SetZoom(zoom))
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::SetRotation(degrees))
    }

    pub fn reset(&mut self) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::Reset)
    }

    pub fn commit(&mut self) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::Commit)
    }

    pub fn upload_succeeded(&mut self) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::UploadSucceeded)
    }

    pub fn upload_failed(&mut self, message: impl Into<String>) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::UploadFailed(message.into()))
    }

    pub fn cancel(&mut self) -> Result<CropOutcome, CropError> {
        self.dispatch(CropEvent::Cancel)
    }

    fn handle(&mut self, event: CropEvent) -> Result<CropOutcome, CropError> {
        match event {
            CropEvent::Load(file) => self.on_load(file),
            CropEvent::PanBy { dx, dy } => self.edit(|state| {
                state.pan = Point::new(state.pan.x + dx, state.pan.y + dy);
            }),
            CropEvent::SetPan(pan) => self.edit(|state| state.pan = pan),
            CropEvent::SetZoom(zoom) => self.edit(|state| state.zoom = zoom),
            CropEvent::ZoomBy(steps) => {
                let step = self.config.zoom_step;
                self.edit(|state| state.zoom += steps * step)
            }
            CropEvent::SetRotation(degrees) => self.edit(|state| state.rotation_degrees = degrees),
            CropEvent::RotateBy(degrees) => {
                self.edit(|state| state.rotation_degrees += degrees)
            }
            CropEvent::Reset => self.edit(|state| *state = CropState::default()),
            CropEvent::Commit => self.on_commit(),
            CropEvent::UploadSucceeded => self.on_upload_succeeded(),
            CropEvent::UploadFailed(message) => self.on_upload_failed(message),
            CropEvent::Cancel => self.on_cancel(),
        }
    }

    fn on_load(&mut self, file: SourceFile) -> Result<CropOutcome, CropError> {
        if self.phase == CropPhase::Committing {
            return Err(CropError::InputLocked);
        }

        // A new selection replaces any previous session outright
        self.close_session();

        let handle = file.decode()?;
        info!(
            width = handle.image().width,
            height = handle.image().height,
            mime = handle.mime_type().unwrap_or("unknown"),
            "source image loaded"
        );

        self.source = Some(handle);
        self.phase = CropPhase::Editing;
        self.refresh_crop_rect();
        Ok(CropOutcome::Updated)
    }

    /// Apply a pan/zoom/rotation change, then normalize and re-resolve.
    fn edit(&mut self, apply: impl FnOnce(&mut CropState)) -> Result<CropOutcome, CropError> {
        match self.phase {
            CropPhase::Idle => return Err(CropError::NoImageLoaded),
            CropPhase::Committing => return Err(CropError::InputLocked),
            CropPhase::Editing => {}
        }

        apply(&mut self.state);
        self.normalize_state();
        self.refresh_crop_rect();
        Ok(CropOutcome::Updated)
    }

    fn normalize_state(&mut self) {
        self.state.zoom = self.config.clamp_zoom(self.state.zoom);
        self.state.rotation_degrees = normalize_rotation(self.state.rotation_degrees);

        if let Some(image) = self.source_image() {
            let (width, height) = (image.width, image.height);
            self.state.pan = clamp_pan(
                self.state.pan,
                width,
                height,
                self.state.zoom,
                self.config.aspect_ratio,
            );
        }
    }

    fn refresh_crop_rect(&mut self) {
        self.crop_rect = self.source_image().map(|image| {
            resolve_crop_rect(image.width, image.height, &self.state, self.config.aspect_ratio)
        });
        if let Some(rect) = self.crop_rect {
            debug!(
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                "crop rectangle resolved"
            );
        }
    }

    fn on_commit(&mut self) -> Result<CropOutcome, CropError> {
        match self.phase {
            CropPhase::Committing => return Err(CropError::InputLocked),
            CropPhase::Idle => return Err(CropError::NoCropSelected),
            CropPhase::Editing => {}
        }

        let (Some(rect), Some(source)) = (self.crop_rect, self.source.as_ref()) else {
            return Err(CropError::NoCropSelected);
        };

        self.phase = CropPhase::Committing;
        match render_photo(source.image(), &rect, &self.state, &self.config) {
            Ok(photo) => {
                info!(
                    width = photo.width,
                    height = photo.height,
                    bytes = photo.len(),
                    "crop committed, awaiting upload"
                );
                Ok(CropOutcome::ReadyForUpload(photo))
            }
            Err(err) => {
                self.phase = CropPhase::Editing;
                Err(err)
            }
        }
    }

    fn on_upload_succeeded(&mut self) -> Result<CropOutcome, CropError> {
        if self.phase != CropPhase::Committing {
            warn!(phase = ?self.phase, "upload acknowledgement outside of a commit");
            return Ok(CropOutcome::Ignored);
        }

        info!("profile photo uploaded");
        self.close_session();
        Ok(CropOutcome::Completed)
    }

    fn on_upload_failed(&mut self, message: String) -> Result<CropOutcome, CropError> {
        if self.phase != CropPhase::Committing {
            warn!(phase = ?self.phase, "upload failure outside of a commit");
            return Ok(CropOutcome::Ignored);
        }

        if self.cancel_requested {
            info!("applying deferred cancel after failed upload");
            self.close_session();
        } else {
            // Keep the crop state so the user can retry without re-cropping
            self.phase = CropPhase::Editing;
        }
        Err(CropError::UploadRejected(message))
    }

    fn on_cancel(&mut self) -> Result<CropOutcome, CropError> {
        match self.phase {
            CropPhase::Idle => Ok(CropOutcome::Ignored),
            CropPhase::Editing => {
                info!("crop session cancelled");
                self.close_session();
                Ok(CropOutcome::Cancelled)
            }
            CropPhase::Committing => {
                info!("cancel requested during commit, deferring");
                self.cancel_requested = true;
                Ok(CropOutcome::CancelPending)
            }
        }
    }

    /// Release the source and return to `Idle` with default crop state.
    fn close_session(&mut self) {
        if let Some(source) = self.source.take() {
            source.release();
        }
        self.phase = CropPhase::Idle;
        self.state = CropState::default();
        self.crop_rect = None;
        self.cancel_requested = false;
    }
}

/// Rasterize and encode the current crop.
fn render_photo(
    image: &SourceImage,
    rect: &Rectangle,
    state: &CropState,
    config: &CropConfig,
) -> Result<EncodedPhoto, CropError> {
    let options = RasterOptions {
        background: config.background,
        filter: config.interpolation,
    };

    let mut raster = rasterize(image, rect, state.rotation_degrees, &options)?;
    if let Some(max_side) = config.max_output_side {
        raster = fit_within(raster, max_side)?;
    }

    Ok(encode_raster(&raster, config.jpeg_quality)?)
}
