//! Interactive crop editing.
//!
//! [`CropController`] drives a crop session: it accepts a selected file,
//! applies pan, zoom and rotation input, and on commit produces an encoded
//! photo for the upload collaborator. Upload outcomes are fed back as events.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_core::editor::{CropController, CropOutcome};
//! use avatar_core::decode::SourceFile;
//!
//! let mut editor = CropController::default();
//! editor.load(SourceFile::new(bytes, Some("image/jpeg".into())))?;
//! editor.set_zoom(1.5)?;
//! if let CropOutcome::ReadyForUpload(photo) = editor.commit()? {
//!     // send photo.bytes, then report the result
//!     editor.upload_succeeded()?;
//! }
//! ```

mod controller;
mod error;
mod event;

pub use controller::CropController;
pub use error::CropError;
pub use event::{CropEvent, CropOutcome, CropPhase};
