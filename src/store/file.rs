//! Persisted counter file.
//!
//! One deck per row: `<deck-name>,<wins>,<losses>`. The file is rewritten in
//! full on every persist and only lists decks with at least one game.
//! Deck names containing `,` or `"` are double-quoted with embedded quotes
//! doubled; everything else is written verbatim.

use super::counter::CounterStore;
use super::record::DeckRecord;
use crate::error::StoreError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub struct CounterFile {
    path: PathBuf,
}

impl CounterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted counters.
    ///
    /// A missing file is an empty store. Rows that don't parse are skipped.
    /// Only an unreadable (but present) file is an error.
    pub fn load(&self) -> Result<CounterStore, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No counter file at {}, starting empty", self.path.display());
                return Ok(CounterStore::new());
            }
            Err(e) => {
                return Err(StoreError::LoadFailed {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (line_no, raw) in content.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(_) => {
                    skipped += 1;
                    tracing::warn!(
                        "Skipping counter row {} with invalid UTF-8: {}",
                        line_no + 1,
                        String::from_utf8_lossy(raw)
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Some(record) => rows.push(record),
                None => {
                    skipped += 1;
                    tracing::warn!("Skipping malformed counter row {}: {:?}", line_no + 1, line);
                }
            }
        }

        let store = CounterStore::from_records(rows);
        tracing::info!(
            "Loaded {} deck(s) from {} ({} row(s) skipped)",
            store.len(),
            self.path.display(),
            skipped
        );
        Ok(store)
    }

    /// Overwrite the file with every active record in `store`.
    ///
    /// Written to a sibling temp file first and renamed into place, so a
    /// reader sees either the old file or the new one.
    pub fn persist(&self, store: &CounterStore) -> Result<(), StoreError> {
        let content = render(store);
        let save_err = |source| StoreError::SaveFailed {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(save_err)?;
        }

        let tmp_path = self.tmp_path();
        let mut file = fs::File::create(&tmp_path).map_err(save_err)?;
        file.write_all(content.as_bytes()).map_err(save_err)?;
        file.sync_all().map_err(save_err)?;
        drop(file);
        fs::rename(&tmp_path, &self.path).map_err(save_err)?;

        tracing::debug!("Persisted counters to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Serialize the active records, one row each, in store order
pub fn render(store: &CounterStore) -> String {
    let mut out = String::new();
    for record in store.active_records() {
        out.push_str(&encode_field(&record.name));
        out.push(',');
        out.push_str(&record.wins.to_string());
        out.push(',');
        out.push_str(&record.losses.to_string());
        out.push('\n');
    }
    out
}

/// Parse one row. `None` for a wrong field count or non-numeric counters.
pub fn parse_row(line: &str) -> Option<DeckRecord> {
    let fields = split_fields(line)?;
    let [name, wins, losses]: [String; 3] = fields.try_into().ok()?;
    if name.is_empty() {
        return None;
    }
    let wins = wins.trim().parse().ok()?;
    let losses = losses.trim().parse().ok()?;
    Some(DeckRecord::with_counts(name, wins, losses))
}

fn encode_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split a row on commas, honoring double-quoted fields.
/// `None` if a quote is left unterminated.
fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}
