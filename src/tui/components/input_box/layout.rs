//! Visual layout of the draft: word-wrapped rows measured in terminal cells.
//!
//! Rows are byte ranges into the draft, so the rendered text, the box
//! height and the cursor position all come from the same wrapping.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Visible draft rows before the box scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Left border + left padding
pub(super) const CONTENT_OFFSET_X: u16 = 2;
/// Top border
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// Width available to text inside the box; 0 when too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// textwrap options for the box's inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(usize::from(inner_width.max(1)))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Split `text` into rows of at most `width` cells, breaking between words
/// where possible. A newline ends a row and is not part of it; the spaces at
/// a soft wrap stay on the row they follow. There is always at least one row.
pub(super) fn rows(text: &str, width: u16) -> Vec<Row> {
    let options = wrap_options(width);
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        let line_end = line_start + line.len();
        let starts = fragment_starts(line, &options);
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            rows.push(Row {
                start: line_start + start,
                end: line_start + end,
            });
        }
        line_start = line_end + 1;
    }
    rows
}

/// Byte offsets within `line` where each wrapped fragment begins.
fn fragment_starts(line: &str, options: &textwrap::Options<'_>) -> Vec<usize> {
    let mut starts = vec![0];
    for fragment in textwrap::wrap(line, options).iter().skip(1) {
        let prev = starts.last().copied().unwrap_or(0);
        let start = match fragment {
            // Borrowed fragments point into `line`
            Cow::Borrowed(s) => (s.as_ptr() as usize).checked_sub(line.as_ptr() as usize),
            Cow::Owned(s) => line[prev..].find(s.as_str()).map(|i| prev + i),
        };
        match start {
            Some(start) if start > prev && start <= line.len() && line.is_char_boundary(start) => {
                starts.push(start)
            }
            _ => {}
        }
    }
    starts
}

pub(super) fn cell_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// (row index, column in cells) of byte offset `pos`.
///
/// At a soft wrap the cursor belongs to the start of the following row.
pub(super) fn locate(text: &str, rows: &[Row], pos: usize) -> (usize, usize) {
    let row = rows
        .iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start);
    (row, cell_width(&text[start..pos]))
}

/// Byte offset in `row` closest to `column` cells without passing it.
pub(super) fn offset_at_column(text: &str, row: Row, column: usize) -> usize {
    let mut cells = 0;
    for (i, c) in text[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0);
        if cells + w > column {
            return row.start + i;
        }
        cells += w;
    }
    row.end
}
