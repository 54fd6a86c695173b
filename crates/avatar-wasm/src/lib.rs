//! Avatar WASM - WebAssembly bindings for the profile photo editor
//!
//! This crate provides WASM bindings to expose the avatar-core crop editor
//! to the profile page.
//!
//! # Module Structure
//!
//! - `editor` - Interactive crop session (load, pan, zoom, rotate, commit)
//! - `encode` - Standalone photo encoding
//! - `types` - WASM-compatible wrapper types and error conversion
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@avatar/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsCropEditor();
//! editor.load(new Uint8Array(await file.arrayBuffer()), file.type);
//! console.log(`Loaded ${editor.imageWidth}x${editor.imageHeight}`);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod encode;
mod types;

// Re-export public types
pub use editor::JsCropEditor;
pub use encode::encode_photo;
pub use types::JsEncodedPhoto;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
