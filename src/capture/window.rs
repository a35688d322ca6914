//! Live window capture.
//!
//! Only the focused, non-minimized window whose title matches exactly is
//! captured; anything else is an unavailable cycle.

use super::{Acquisition, Snapshot, SnapshotSource};
use crate::error::{CaptureError, OcrError};
use crate::ocr::OcrManager;
use xcap::Window;

pub struct WindowOcrSource {
    title: String,
    ocr: OcrManager,
}

impl WindowOcrSource {
    pub fn new(title: impl Into<String>, ocr: OcrManager) -> Self {
        Self {
            title: title.into(),
            ocr,
        }
    }

    fn find_target(&self) -> Result<Option<Window>, CaptureError> {
        let windows = Window::all().map_err(|e| CaptureError::EnumerationFailed(e.to_string().into()))?;
        Ok(windows
            .into_iter()
            .find(|w| w.title().map(|t| t == self.title).unwrap_or(false)))
    }
}

impl SnapshotSource for WindowOcrSource {
    fn acquire(&mut self) -> Result<Acquisition, CaptureError> {
        let Some(window) = self.find_target()? else {
            return Ok(Acquisition::Unavailable);
        };

        let minimized = window.is_minimized().unwrap_or(true);
        let focused = window.is_focused().unwrap_or(false);
        if minimized || !focused {
            return Ok(Acquisition::Unavailable);
        }

        let image = window
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed {
                title: self.title.clone(),
                source: e.to_string().into(),
            })?;

        let fragments = self.ocr.recognize(&image).map_err(|e: OcrError| {
            CaptureError::CaptureFailed {
                title: self.title.clone(),
                source: Box::new(e),
            }
        })?;

        let snapshot = Snapshot::from_fragments(fragments);
        if snapshot.is_empty() {
            return Ok(Acquisition::Unavailable);
        }
        Ok(Acquisition::Captured(snapshot))
    }

    fn name(&self) -> &'static str {
        "window"
    }
}

/// Titles of visible, non-minimized windows
pub fn list_windows() -> Result<Vec<String>, CaptureError> {
    let windows = Window::all().map_err(|e| CaptureError::EnumerationFailed(e.to_string().into()))?;
    Ok(windows
        .into_iter()
        .filter(|w| !w.is_minimized().unwrap_or(true))
        .filter_map(|w| w.title().ok())
        .filter(|t| !t.is_empty())
        .collect())
}
