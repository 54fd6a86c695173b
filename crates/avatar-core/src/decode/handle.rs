//! Scoped ownership of the selected file and its decoded image.
//!
//! A file picked in the browser is backed by a temporary object URL. The
//! [`ReleaseHook`] carries whatever frees that resource and runs it exactly
//! once: on explicit release, or when the owner is dropped. Both the success
//! path and the cancel/failure paths therefore free the resource without the
//! caller having to remember it.

use std::fmt;

use tracing::debug;

use super::{decode_source, DecodeError, SourceImage};

/// One-shot callback that frees the platform resource behind a source image.
pub struct ReleaseHook(Option<Box<dyn FnOnce()>>);

impl ReleaseHook {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(release)))
    }

    /// Run the hook now.
    pub fn release(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

impl Drop for ReleaseHook {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for ReleaseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReleaseHook")
            .field(&if self.0.is_some() { "pending" } else { "released" })
            .finish()
    }
}

/// A file as supplied by the platform file picker.
#[derive(Debug)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
    release: Option<ReleaseHook>,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self {
            bytes,
            mime_type,
            release: None,
        }
    }

    /// Attach the hook that frees the file's temporary resource.
    pub fn with_release_hook(mut self, release: impl FnOnce() + 'static) -> Self {
        self.release = Some(ReleaseHook::new(release));
        self
    }

    /// Decode the file, moving its release hook into the returned handle.
    ///
    /// On failure the file is dropped here, which runs the hook.
    pub fn decode(self) -> Result<SourceHandle, DecodeError> {
        let image = decode_source(&self.bytes, self.mime_type.as_deref())?;
        Ok(SourceHandle {
            image,
            mime_type: self.mime_type,
            release: self.release,
        })
    }
}

/// A decoded source image together with the resource that backs it.
#[derive(Debug)]
pub struct SourceHandle {
    image: SourceImage,
    mime_type: Option<String>,
    release: Option<ReleaseHook>,
}

impl SourceHandle {
    pub fn new(image: SourceImage) -> Self {
        Self {
            image,
            mime_type: None,
            release: None,
        }
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Drop the pixels and free the backing resource.
    pub fn release(mut self) {
        debug!(
            width = self.image.width,
            height = self.image.height,
            "releasing source image"
        );
        if let Some(hook) = self.release.take() {
            hook.release();
        }
    }
}
