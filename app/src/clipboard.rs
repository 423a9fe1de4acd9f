//! Copying the rendered flyer to the system clipboard.
//!
//! [`ClipboardProvider`] keeps the session testable; [`SystemClipboard`]
//! is the arboard-backed implementation and [`UnavailableClipboard`]
//! stands in when no clipboard can be opened (headless sessions).

use std::borrow::Cow;

use image::RgbaImage;

/// Image payload handed to the clipboard.
///
/// Raw RGBA pixels; the platform clipboard publishes them as `image/png`.
#[derive(Debug, Clone)]
pub struct ClipboardImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl ClipboardImage {
    pub fn from_flyer(flyer: &RgbaImage) -> Self {
        Self {
            width: flyer.width() as usize,
            height: flyer.height() as usize,
            rgba: flyer.as_raw().clone(),
        }
    }
}

/// Error types for clipboard operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard access denied: {0}")]
    PermissionDenied(String),

    #[error("clipboard does not accept images")]
    NotSupported,

    #[error("clipboard write failed: {0}")]
    Failed(String),
}

impl ClipboardError {
    /// Alert text shown when a write fails.
    pub fn alert_message(&self) -> String {
        let hint = match self {
            Self::PermissionDenied(_) => " Please grant clipboard permissions to use this feature.",
            Self::NotSupported => " Your browser does not support this feature.",
            Self::Failed(_) => " Please try again.",
        };
        format!("Failed to copy image to clipboard.{hint}")
    }
}

pub trait ClipboardProvider {
    /// Whether image writes can be attempted at all.
    fn is_supported(&self) -> bool;

    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError>;
}

/// Production clipboard using arboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(map_arboard_error)?;
        Ok(Self { inner })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn is_supported(&self) -> bool {
        true
    }

    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError> {
        let data = arboard::ImageData {
            width: image.width,
            height: image.height,
            bytes: Cow::Borrowed(image.rgba.as_slice()),
        };
        self.inner.set_image(data).map_err(map_arboard_error)?;
        tracing::debug!(
            width = image.width,
            height = image.height,
            "Flyer written to clipboard"
        );
        Ok(())
    }
}

fn map_arboard_error(e: arboard::Error) -> ClipboardError {
    match e {
        arboard::Error::ClipboardNotSupported | arboard::Error::ConversionFailure => {
            ClipboardError::NotSupported
        }
        arboard::Error::ClipboardOccupied => ClipboardError::PermissionDenied(e.to_string()),
        other => ClipboardError::Failed(other.to_string()),
    }
}

/// Used when no system clipboard could be opened.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

impl ClipboardProvider for UnavailableClipboard {
    fn is_supported(&self) -> bool {
        false
    }

    fn write_image(&mut self, _image: &ClipboardImage) -> Result<(), ClipboardError> {
        Err(ClipboardError::NotSupported)
    }
}

/// Open the system clipboard, falling back to [`UnavailableClipboard`].
pub fn open_clipboard() -> Box<dyn ClipboardProvider> {
    match SystemClipboard::new() {
        Ok(cb) => Box::new(cb),
        Err(e) => {
            tracing::warn!("Failed to access clipboard: {e}");
            Box::new(UnavailableClipboard)
        }
    }
}
