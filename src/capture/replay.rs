//! Recorded snapshot playback.
//!
//! File format: one recognized line per text line, frames separated by one
//! or more blank lines. A frame consisting only of `--` is a cycle where the
//! window could not be captured. A line may carry an explicit vertical
//! position as `<y>|<text>`; unprefixed lines are positioned by file order.
//!
//! ```text
//! Dragon Deck
//! Random Match Battle
//!
//! --
//!
//! 900|Victory
//! 120|Results
//! ```

use super::{Acquisition, Snapshot, SnapshotSource, TextFragment};
use crate::error::CaptureError;
use std::collections::VecDeque;
use std::path::Path;

const UNAVAILABLE_FRAME: &str = "--";

pub struct ReplaySource {
    frames: VecDeque<Option<Snapshot>>,
}

impl ReplaySource {
    pub fn from_file(path: &Path) -> Result<Self, CaptureError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CaptureError::ReplayUnreadable {
                path: path.display().to_string(),
                source: e,
            })?;
        let source = Self::from_text(&content);
        tracing::info!(
            "Loaded {} replay frame(s) from {}",
            source.remaining(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            frames: parse_frames(content).into(),
        }
    }

    /// Frames supplied directly, `None` meaning an unavailable cycle
    pub fn from_frames(frames: impl IntoIterator<Item = Option<Snapshot>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl SnapshotSource for ReplaySource {
    fn acquire(&mut self) -> Result<Acquisition, CaptureError> {
        Ok(match self.frames.pop_front() {
            Some(Some(snapshot)) => Acquisition::Captured(snapshot),
            Some(None) => Acquisition::Unavailable,
            None => Acquisition::Finished,
        })
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

fn parse_frames(content: &str) -> Vec<Option<Snapshot>> {
    let mut frames = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                frames.push(parse_frame(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        frames.push(parse_frame(&current));
    }

    frames
}

fn parse_frame(lines: &[&str]) -> Option<Snapshot> {
    if lines.len() == 1 && lines[0].trim() == UNAVAILABLE_FRAME {
        return None;
    }

    let fragments = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.split_once('|')
                .and_then(|(pos, text)| {
                    pos.trim()
                        .parse::<i32>()
                        .ok()
                        .map(|top| TextFragment::new(text, top))
                })
                .unwrap_or_else(|| TextFragment::new(*line, i as i32))
        })
        .collect();

    Some(Snapshot::from_fragments(fragments))
}
