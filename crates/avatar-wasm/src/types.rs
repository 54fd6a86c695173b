//! WASM-compatible wrapper types for crop editor data.
//!
//! This module provides JavaScript-friendly types that wrap the core avatar
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use avatar_core::{CropError, CropPhase, EncodedPhoto};
use wasm_bindgen::prelude::*;

/// An encoded profile photo for JavaScript.
///
/// Returned by `JsCropEditor.commit()`. The page uploads `bytes()` as a file
/// named `fileName` with content type `mimeType`, then reports the outcome
/// back to the editor.
#[wasm_bindgen]
pub struct JsEncodedPhoto {
    inner: EncodedPhoto,
}

#[wasm_bindgen]
impl JsEncodedPhoto {
    /// Width of the encoded image in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Height of the encoded image in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    #[wasm_bindgen(getter = fileName)]
    pub fn file_name(&self) -> String {
        self.inner.file_name().to_string()
    }

    #[wasm_bindgen(getter = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    /// Returns the JPEG bytes as Uint8Array.
    ///
    /// Note: This creates a copy of the encoded data.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

impl From<EncodedPhoto> for JsEncodedPhoto {
    fn from(inner: EncodedPhoto) -> Self {
        Self { inner }
    }
}

/// Lowercase name of a phase, as exposed to JavaScript.
pub(crate) fn phase_name(phase: CropPhase) -> &'static str {
    match phase {
        CropPhase::Idle => "idle",
        CropPhase::Editing => "editing",
        CropPhase::Committing => "committing",
    }
}

/// Convert a crop error into a JavaScript `Error` carrying the user message.
///
/// The error's `name` is set to `CropError` so the page can tell editor
/// failures apart from binding failures. Its `recoverable` property is `false`
/// when the user has to pick the image again before retrying.
pub(crate) fn crop_error_to_js(err: &CropError) -> JsValue {
    let error = js_sys::Error::new(&err.user_message());
    error.set_name("CropError");
    let recoverable = JsValue::from_bool(err.is_recoverable());
    if let Err(reflect_err) =
        js_sys::Reflect::set(&error, &JsValue::from_str("recoverable"), &recoverable)
    {
        web_sys::console::warn_2(&JsValue::from_str("Failed to tag crop error"), &reflect_err);
    }
    error.into()
}
