//! Crop editor WASM bindings.
//!
//! Exposes [`CropController`] to the page as `JsCropEditor`. The page feeds
//! it the picked file and slider/drag input, calls `commit()` to get the JPEG
//! to upload, and reports the upload result back.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropEditor } from '@avatar/wasm';
//!
//! const editor = JsCropEditor.withConfig({ maxOutputSide: 512 });
//! const url = URL.createObjectURL(file);
//! editor.load(new Uint8Array(await file.arrayBuffer()), file.type, url);
//!
//! editor.setZoom(1.5);
//! editor.setRotation(90);
//!
//! const photo = editor.commit();
//! const body = new FormData();
//! body.append('profilePhoto', new Blob([photo.bytes()], { type: photo.mimeType }), photo.fileName);
//! const res = await fetch('/users/profile-photo', { method: 'POST', body });
//! res.ok ? editor.uploadSucceeded() : editor.uploadFailed((await res.json()).message);
//! ```

use avatar_core::decode::SourceFile;
use avatar_core::{CropConfig, CropController, CropError, CropEvent, CropOutcome, Point};
use wasm_bindgen::prelude::*;

use crate::types::{crop_error_to_js, phase_name, JsEncodedPhoto};

/// Interactive crop session for JavaScript.
#[wasm_bindgen]
pub struct JsCropEditor {
    inner: CropController,
}

impl Default for JsCropEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Create an editor with the default square avatar configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(CropConfig::default())
    }

    /// Create an editor from a partial config object.
    ///
    /// Missing fields take their defaults, e.g. `{ aspectRatio: 1, jpegQuality: 85 }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<JsCropEditor, JsValue> {
        let config: CropConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?;
        Ok(Self::from_config(config))
    }

    /// Load a picked file and start a fresh crop session.
    ///
    /// `object_url`, when given, is revoked once the session no longer needs
    /// the file: on cancel, on successful upload, on decode failure, or when
    /// another file is loaded.
    pub fn load(
        &mut self,
        bytes: Vec<u8>,
        mime_type: Option<String>,
        object_url: Option<String>,
    ) -> Result<(), JsValue> {
        let mut file = SourceFile::new(bytes, mime_type.filter(|m| !m.is_empty()));
        if let Some(url) = object_url {
            file = file.with_release_hook(move || revoke_object_url(&url));
        }
        self.apply(CropEvent::Load(file))
    }

    /// Pan by a fraction of the crop size (1.0 = one full crop width/height).
    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::PanBy { dx, dy })
    }

    #[wasm_bindgen(js_name = setPan)]
    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::SetPan(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::SetZoom(zoom))
    }

    /// Change zoom by a number of slider steps (negative zooms out).
    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&mut self, steps: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::ZoomBy(steps))
    }

    /// Set rotation in degrees, clockwise-positive.
    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::SetRotation(degrees))
    }

    #[wasm_bindgen(js_name = rotateBy)]
    pub fn rotate_by(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.apply(CropEvent::RotateBy(degrees))
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.apply(CropEvent::Reset)
    }

    /// Rasterize and encode the current crop.
    ///
    /// On success the editor is locked until `uploadSucceeded()` or
    /// `uploadFailed()` is called.
    pub fn commit(&mut self) -> Result<JsEncodedPhoto, JsValue> {
        match self.inner.commit() {
            Ok(CropOutcome::ReadyForUpload(photo)) => Ok(photo.into()),
            Ok(_) => Err(crop_error_to_js(&CropError::NoCropSelected)),
            Err(err) => Err(crop_error_to_js(&err)),
        }
    }

    #[wasm_bindgen(js_name = uploadSucceeded)]
    pub fn upload_succeeded(&mut self) -> Result<(), JsValue> {
        self.apply(CropEvent::UploadSucceeded)
    }

    /// Report a rejected upload with the server's message.
    ///
    /// The editor returns to editing with the crop preserved, unless a cancel
    /// was requested during the upload. The message is available afterwards
    /// as `lastError`. Returns `false` if no upload was in flight.
    #[wasm_bindgen(js_name = uploadFailed)]
    pub fn upload_failed(&mut self, message: String) -> bool {
        match self.inner.upload_failed(message) {
            Err(CropError::UploadRejected(_)) => true,
            Ok(_) | Err(_) => false,
        }
    }

    /// Cancel the session. Returns `true` if the cancel is deferred until the
    /// in-flight upload resolves.
    pub fn cancel(&mut self) -> bool {
        matches!(self.inner.cancel(), Ok(CropOutcome::CancelPending))
    }

    /// One of `"idle"`, `"editing"` or `"committing"`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        phase_name(self.inner.phase()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.state().zoom
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.state().rotation_degrees
    }

    #[wasm_bindgen(getter = panX)]
    pub fn pan_x(&self) -> f64 {
        self.inner.state().pan.x
    }

    #[wasm_bindgen(getter = panY)]
    pub fn pan_y(&self) -> f64 {
        self.inner.state().pan.y
    }

    #[wasm_bindgen(getter = inputLocked)]
    pub fn input_locked(&self) -> bool {
        self.inner.is_input_locked()
    }

    #[wasm_bindgen(getter = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(str::to_string)
    }

    /// Natural width of the loaded image, or 0 when idle.
    #[wasm_bindgen(getter = imageWidth)]
    pub fn image_width(&self) -> u32 {
        self.inner.source_image().map_or(0, |image| image.width)
    }

    /// Natural height of the loaded image, or 0 when idle.
    #[wasm_bindgen(getter = imageHeight)]
    pub fn image_height(&self) -> u32 {
        self.inner.source_image().map_or(0, |image| image.height)
    }

    /// The resolved crop rectangle as `{ x, y, width, height }`, or `undefined`.
    #[wasm_bindgen(js_name = cropRect)]
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        match self.inner.crop_rect() {
            Some(rect) => serde_wasm_bindgen::to_value(&rect)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl JsCropEditor {
    pub(crate) fn from_config(config: CropConfig) -> Self {
        Self {
            inner: CropController::new(config),
        }
    }

    fn apply(&mut self, event: CropEvent) -> Result<(), JsValue> {
        self.inner
            .dispatch(event)
            .map(|_| ())
            .map_err(|err| crop_error_to_js(&err))
    }
}

#[cfg(target_arch = "wasm32")]
fn revoke_object_url(url: &str) {
    if let Err(err) = web_sys::Url::revoke_object_url(url) {
        web_sys::console::warn_2(&JsValue::from_str("Failed to revoke object URL"), &err);
    }
}

// Object URLs only exist in the browser
#[cfg(not(target_arch = "wasm32"))]
fn revoke_object_url(_url: &str) {}
