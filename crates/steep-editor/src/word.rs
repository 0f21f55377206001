//! Word boundaries and word motions.
//!
//! | Function            | Vim key    | Description                          |
//! |---------------------|------------|--------------------------------------|
//! | [`next_word_start`] | `w`        | Forward to start of next word        |
//! | [`prev_word_start`] | `b`        | Backward to start of previous word   |
//! | [`word_boundary`]   | `iw` ops   | Half-open span of the run at a column|
//!
//! # Words
//!
//! A **word** is a run of non-separator characters. Separators are blanks
//! plus the punctuation an SQL query is full of (see [`is_word_separator`]).
//! Runs of separators are themselves spans for [`word_boundary`], so `diw`
//! on `", "` deletes the punctuation run, while `w` and `b` only ever land on
//! the first character of a non-separator run.
//!
//! Motions stay on the current line except at its edges: `w` past the last
//! word falls to column 0 of the next line, `b` at column 0 climbs to the last
//! column of the previous line.

use std::ops::Range;

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// True for characters that end a word.
#[must_use]
pub const fn is_word_separator(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '.'
            | ','
            | ';'
            | ':'
            | '!'
            | '?'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '/'
            | '\\'
            | '+'
            | '-'
            | '*'
            | '&'
            | '^'
            | '%'
            | '$'
            | '#'
            | '@'
            | '='
            | '|'
            | '`'
            | '~'
            | '"'
            | '\''
    )
}

/// True when a word starts at `i`: the char is not a separator and the one
/// before it is (or there is none).
fn starts_word(line: &[char], i: usize) -> bool {
    !is_word_separator(line[i]) && (i == 0 || is_word_separator(line[i - 1]))
}

// ---------------------------------------------------------------------------
// Boundaries
// ---------------------------------------------------------------------------

/// The half-open span `[start, end)` of the run containing `col`.
///
/// Separator runs and word runs are treated the same way: the span extends
/// in both directions while the class matches. `col` past the end is pulled
/// back to the last character. An empty line yields `0..0`.
#[must_use]
pub fn word_boundary(line: &[char], col: usize) -> Range<usize> {
    if line.is_empty() {
        return 0..0;
    }
    let col = col.min(line.len() - 1);
    let sep = is_word_separator(line[col]);

    let mut start = col;
    while start > 0 && is_word_separator(line[start - 1]) == sep {
        start -= 1;
    }
    let mut end = col + 1;
    while end < line.len() && is_word_separator(line[end]) == sep {
        end += 1;
    }
    start..end
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// `w`: the start of the next word after `pos`.
///
/// At (or past) the last column the motion wraps to column 0 of the next
/// line; on the last line it stays put. With no further word on the line,
/// it lands on the last column.
#[must_use]
pub fn next_word_start(buf: &Buffer, pos: Position) -> Position {
    let line: Vec<char> = line_chars(buf, pos.row);
    let from = pos.col + 1;

    if from >= line.len() {
        if pos.row + 1 < buf.line_count() {
            return Position::new(pos.row + 1, 0);
        }
        return pos;
    }

    (from..line.len())
        .find(|&i| starts_word(&line, i))
        .map_or_else(
            || pos.with_col(line.len().saturating_sub(1)),
            |i| pos.with_col(i),
        )
}

/// `b`: the start of the previous word before `pos`.
///
/// At column 0 the motion climbs to the last column of the previous line;
/// on the first line it stays put. With no earlier word on the line, it
/// lands on column 0.
#[must_use]
pub fn prev_word_start(buf: &Buffer, pos: Position) -> Position {
    if pos.col == 0 {
        if pos.row > 0 {
            let row = pos.row - 1;
            return Position::new(row, buf.line_len(row).saturating_sub(1));
        }
        return pos;
    }

    let line: Vec<char> = line_chars(buf, pos.row);
    let upto = pos.col.min(line.len());
    (0..upto)
        .rev()
        .find(|&i| starts_word(&line, i))
        .map_or_else(|| pos.with_col(0), |i| pos.with_col(i))
}

/// The chars of `row`, empty when out of range.
pub(crate) fn line_chars(buf: &Buffer, row: usize) -> Vec<char> {
    buf.line(row)
        .map(|line| line.chars().collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    // -- Separators ---------------------------------------------------------

    #[test]
    fn separators() {
        for ch in " \t.,;:!?()[]{}<>/\\+-*&^%$#@=|`~\"'".chars() {
            assert!(is_word_separator(ch), "{ch:?} should separate");
        }
        for ch in ['a', 'Z', '0', '_', 'é'] {
            assert!(!is_word_separator(ch), "{ch:?} should not separate");
        }
    }

    // -- word_boundary ------------------------------------------------------

    #[test]
    fn boundary_of_word_and_punctuation() {
        let line = chars("foo.bar baz");
        assert_eq!(word_boundary(&line, 0), 0..3);
        assert_eq!(word_boundary(&line, 2), 0..3);
        assert_eq!(word_boundary(&line, 3), 3..4);
        assert_eq!(word_boundary(&line, 5), 4..7);
        assert_eq!(word_boundary(&line, 10), 8..11);
    }

    #[test]
    fn boundary_of_separator_run() {
        let line = chars("a, (b)");
        assert_eq!(word_boundary(&line, 2), 1..4);
    }

    #[test]
    fn boundary_on_empty_line() {
        assert_eq!(word_boundary(&[], 0), 0..0);
        assert_eq!(word_boundary(&[], 7), 0..0);
    }

    #[test]
    fn boundary_clamps_column() {
        let line = chars("select x");
        assert_eq!(word_boundary(&line, 99), 7..8);
    }

    // -- next_word_start ----------------------------------------------------

    #[test]
    fn w_skips_punctuation() {
        let buf = Buffer::from_text("count(*) as n");
        let pos = next_word_start(&buf, Position::ZERO);
        assert_eq!(pos, Position::new(0, 9));
    }

    #[test]
    fn w_without_further_word_goes_to_last_column() {
        let buf = Buffer::from_text("select ;;");
        let pos = next_word_start(&buf, Position::ZERO);
        assert_eq!(pos, Position::new(0, 8));
    }

    #[test]
    fn w_at_end_of_line_wraps() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(next_word_start(&buf, Position::new(0, 1)), Position::new(1, 0));
    }

    #[test]
    fn w_at_end_of_buffer_stays() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(next_word_start(&buf, Position::new(1, 1)), Position::new(1, 1));
    }

    // -- prev_word_start ----------------------------------------------------

    #[test]
    fn b_goes_to_previous_word() {
        let buf = Buffer::from_text("from users u");
        assert_eq!(prev_word_start(&buf, Position::new(0, 11)), Position::new(0, 5));
        assert_eq!(prev_word_start(&buf, Position::new(0, 7)), Position::new(0, 5));
        assert_eq!(prev_word_start(&buf, Position::new(0, 5)), Position::new(0, 0));
    }

    #[test]
    fn b_without_earlier_word_goes_to_column_zero() {
        let buf = Buffer::from_text("  (x");
        assert_eq!(prev_word_start(&buf, Position::new(0, 2)), Position::new(0, 0));
    }

    #[test]
    fn b_at_column_zero_climbs() {
        let buf = Buffer::from_text("select\nfrom");
        assert_eq!(prev_word_start(&buf, Position::new(1, 0)), Position::new(0, 5));
        assert_eq!(prev_word_start(&buf, Position::ZERO), Position::ZERO);
    }
}
