/// Snapshot acquisition
///
/// A snapshot is one cycle's recognized text lines, ordered top to bottom.
/// Sources produce snapshots; the capture loop consumes them.
///
/// ```text
/// SnapshotSource
///   ├── ReplaySource     (recorded frames from a text file)
///   └── WindowOcrSource  (live window capture + Tesseract, feature `live-capture`)
/// ```
///
/// Sources may deliver fragments in any order. `Snapshot::from_fragments`
/// sorts them by vertical position before anything classifies them.
use crate::error::CaptureError;

pub mod replay;
#[cfg(feature = "live-capture")]
pub mod window;

pub use replay::ReplaySource;
#[cfg(feature = "live-capture")]
pub use window::WindowOcrSource;

/// One recognized text line and its vertical position on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    /// Top edge in pixels; smaller is higher on screen
    pub top: i32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, top: i32) -> Self {
        Self {
            text: text.into(),
            top,
        }
    }
}

/// Recognized lines for a single capture, top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    lines: Vec<String>,
}

impl Snapshot {
    /// Order fragments by vertical position (stable for equal positions)
    /// and trim them.
    pub fn from_fragments(mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by_key(|f| f.top);
        Self::from_lines(fragments.into_iter().map(|f| f.text))
    }

    /// Lines already in top-to-bottom order. Blank lines are kept (as empty
    /// strings) so "the line above" still means the line above.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// No line carries any text
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }
}

/// Outcome of one acquisition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// Text was recognized this cycle
    Captured(Snapshot),
    /// Nothing to read (window missing, not focused, no text); skip the cycle
    Unavailable,
    /// The source has no more frames and the loop should stop
    Finished,
}

/// Produces one snapshot per capture cycle
pub trait SnapshotSource {
    /// Acquire the current snapshot. Errors are transient: the loop logs
    /// them and treats the cycle as skipped.
    fn acquire(&mut self) -> Result<Acquisition, CaptureError>;

    /// Source name (for logging)
    fn name(&self) -> &'static str;
}
