//! Tesseract TSV output -> positioned text lines.
//!
//! TSV columns: `level page_num block_num par_num line_num word_num left top
//! width height conf text`. Word rows (level 5) are grouped by
//! (page, block, paragraph, line); a line's position is the smallest `top` of
//! its words.

use crate::capture::TextFragment;

const WORD_LEVEL: u32 = 5;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
struct LineKey {
    page: u32,
    block: u32,
    par: u32,
    line: u32,
}

struct WordRow<'a> {
    key: LineKey,
    top: i32,
    text: &'a str,
}

/// Assemble recognized lines from TSV text, in recognition order.
/// Unparseable rows (including the header) are ignored.
pub fn lines_from_tsv(tsv: &str) -> Vec<TextFragment> {
    let mut lines: Vec<(LineKey, TextFragment)> = Vec::new();

    for word in tsv.lines().filter_map(parse_word_row) {
        match lines.iter_mut().find(|(key, _)| *key == word.key) {
            Some((_, fragment)) => {
                fragment.text.push(' ');
                fragment.text.push_str(word.text);
                fragment.top = fragment.top.min(word.top);
            }
            None => lines.push((word.key, TextFragment::new(word.text, word.top))),
        }
    }

    lines.into_iter().map(|(_, fragment)| fragment).collect()
}

fn parse_word_row(row: &str) -> Option<WordRow<'_>> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 {
        return None;
    }

    let level: u32 = cols[0].parse().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let text = cols[11].trim();
    if text.is_empty() {
        return None;
    }

    Some(WordRow {
        key: LineKey {
            page: cols[1].parse().ok()?,
            block: cols[2].parse().ok()?,
            par: cols[3].parse().ok()?,
            line: cols[4].parse().ok()?,
        },
        top: cols[7].parse().ok()?,
        text,
    })
}
