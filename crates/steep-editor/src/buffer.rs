//! Text buffer: an ordered sequence of lines with undo/redo.
//!
//! A `Buffer` wraps a [`ropey::Rope`] holding the lines joined by `\n`, and
//! owns the [`History`] of snapshots taken before each edit.
//!
//! # Design choices
//!
//! - **Only `\n` separates lines.** Every text entry point normalizes `\r\n`
//!   and lone `\r` to `\n`, and the rope is built without ropey's CR or
//!   Unicode line-break recognition. `"a\nb".split('\n')` and the buffer agree
//!   on what the lines are.
//!
//! - **There is always at least one line.** An empty rope is one empty line.
//!   Deleting the only line clears it instead.
//!
//! - **Columns are char offsets**, not byte offsets. Out-of-range rows make
//!   an operation a no-op; out-of-range columns are clamped to the line.
//!
//! - **Undo is explicit.** Editing methods never snapshot on their own. The
//!   caller invokes [`save_undo_state`](Buffer::save_undo_state) right before
//!   a mutation, which lets one user-level command span several buffer calls
//!   and still undo as one step.
//!
//! # Range semantics
//!
//! [`get_range`](Buffer::get_range) and [`delete_range`](Buffer::delete_range)
//! take two positions in any order and treat the **end column as inclusive**,
//! the way a visual selection reads. Selecting from the end of one line to
//! column 0 of the next is a line join: only the line break goes away.

use std::borrow::Cow;
use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::history::{DEFAULT_UNDO_LIMIT, History};
use crate::position::{Position, ordered};
use crate::view::char_col_to_display_col;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A line-oriented text buffer backed by a rope.
pub struct Buffer {
    rope: Rope,
    history: History,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create a buffer holding a single empty line.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a buffer from a string, split on `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::with_undo_limit(text, DEFAULT_UNDO_LIMIT)
    }

    /// Create a buffer whose undo stack holds at most `limit` entries.
    #[must_use]
    pub fn with_undo_limit(text: &str, limit: usize) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_breaks(text)),
            history: History::with_limit(limit),
        }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The full content, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Every line as an owned string, without line breaks.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|row| self.line_text(row)).collect()
    }

    /// Number of lines. Never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// True when the buffer is one empty line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// A line without its trailing `\n`, or `None` past the last line.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        let (start, end) = self.line_bounds(row)?;
        Some(self.rope.slice(start..end))
    }

    /// A line as an owned string. Empty when `row` is out of range.
    #[must_use]
    pub fn line_text(&self, row: usize) -> String {
        self.line(row).map(String::from).unwrap_or_default()
    }

    /// Number of chars in a line. 0 when `row` is out of range.
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.line_bounds(row).map_or(0, |(start, end)| end - start)
    }

    /// Display width of a line with tabs expanded to `tab_width` stops.
    #[must_use]
    pub fn visual_line_len(&self, row: usize, tab_width: u8) -> usize {
        self.line(row)
            .map_or(0, |line| char_col_to_display_col(line.chars(), usize::MAX, tab_width))
    }

    /// The character at a position, or `None` if it is past the line end.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        let (start, end) = self.line_bounds(pos.row)?;
        (start + pos.col < end).then(|| self.rope.char(start + pos.col))
    }

    // -- Line editing -------------------------------------------------------

    /// Replace the content of a line. No-op if `row` is out of range.
    pub fn set_line(&mut self, row: usize, content: &str) {
        let Some((start, end)) = self.line_bounds(row) else {
            return;
        };
        self.rope.remove(start..end);
        self.rope.insert(start, &normalize_line_breaks(content));
    }

    /// Insert a new line so that it becomes line `idx`.
    ///
    /// `idx == line_count()` appends after the last line. Larger indices are
    /// a no-op.
    pub fn insert_line(&mut self, idx: usize, content: &str) {
        let count = self.line_count();
        if idx > count {
            return;
        }
        let content = normalize_line_breaks(content);
        if idx < count {
            let at = self.rope.line_to_char(idx);
            self.rope.insert_char(at, '\n');
            self.rope.insert(at, &content);
        } else {
            let at = self.rope.len_chars();
            self.rope.insert_char(at, '\n');
            self.rope.insert(at + 1, &content);
        }
    }

    /// Remove line `idx` and return its content.
    ///
    /// Deleting the only line clears it and the buffer keeps one empty line.
    /// Returns `None` (and changes nothing) if `idx` is out of range.
    pub fn delete_line(&mut self, idx: usize) -> Option<String> {
        let (start, end) = self.line_bounds(idx)?;
        let removed = self.rope.slice(start..end).to_string();
        let count = self.line_count();
        if count == 1 {
            self.rope.remove(start..end);
        } else if idx + 1 < count {
            // Take the line's own trailing break.
            self.rope.remove(start..end + 1);
        } else {
            // Last line: take the break that precedes it.
            self.rope.remove(start - 1..end);
        }
        Some(removed)
    }

    /// Replace everything with a single empty line. History is kept.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
    }

    // -- Range editing ------------------------------------------------------

    /// Insert `text` at `(row, col)`.
    ///
    /// Embedded `\n` split the line: the text before `col` joins the first
    /// inserted line and the text after `col` follows the last one. `col` is
    /// clamped to the line length; an out-of-range `row` is a no-op.
    pub fn insert_at(&mut self, row: usize, col: usize, text: &str) {
        let Some((start, end)) = self.line_bounds(row) else {
            return;
        };
        let col = col.min(end - start);
        self.rope.insert(start + col, &normalize_line_breaks(text));
    }

    /// Delete the range `(start_row, start_col) ..= (end_row, end_col)` and
    /// return the removed text. See [`delete_range`](Self::delete_range).
    pub fn delete_at(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> String {
        self.delete_range(
            Position::new(start_row, start_col),
            Position::new(end_row, end_col),
        )
    }

    /// Delete an end-inclusive range given in either order and return the
    /// removed text.
    ///
    /// From the end of line N to column 0 of line N+1 is a join: only the
    /// line break is removed and `"\n"` is returned.
    pub fn delete_range(&mut self, a: Position, b: Position) -> String {
        let (start, end) = ordered(a, b);
        if end.row == start.row + 1
            && end.col == 0
            && end.row < self.line_count()
            && start.col >= self.line_len(start.row)
        {
            let Some((_, line_end)) = self.line_bounds(start.row) else {
                return String::new();
            };
            self.rope.remove(line_end..=line_end);
            return "\n".to_string();
        }

        let Some((from, to)) = self.char_span(start, end) else {
            return String::new();
        };
        let removed = self.rope.slice(from..to).to_string();
        self.rope.remove(from..to);
        removed
    }

    /// True when [`delete_range`](Self::delete_range) over the same range
    /// would remove nothing.
    #[must_use]
    pub fn range_is_empty(&self, a: Position, b: Position) -> bool {
        let (start, end) = ordered(a, b);
        self.char_span(start, end).is_none_or(|(from, to)| from == to)
    }

    /// The text of an end-inclusive range given in either order.
    #[must_use]
    pub fn get_range(&self, a: Position, b: Position) -> String {
        let (start, end) = ordered(a, b);
        self.char_span(start, end)
            .map(|(from, to)| self.rope.slice(from..to).to_string())
            .unwrap_or_default()
    }

    // -- Undo / redo --------------------------------------------------------

    /// Snapshot the current content and `cursor` before a mutation.
    ///
    /// Returns `false` when the content equals the newest snapshot, in which
    /// case nothing is pushed and the redo stack survives.
    pub fn save_undo_state(&mut self, cursor: Position) -> bool {
        self.history.record(&self.rope, cursor)
    }

    /// Restore the previous snapshot. `cursor` is stored for the matching
    /// redo. Returns the snapshot's cursor, or `None` if there is nothing to
    /// undo.
    pub fn undo(&mut self, cursor: Position) -> Option<Position> {
        self.history.undo(&mut self.rope, cursor)
    }

    /// Re-apply the last undone change. Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, cursor: Position) -> Option<Position> {
        self.history.redo(&mut self.rope, cursor)
    }

    /// True if [`undo`](Self::undo) would succeed.
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if [`redo`](Self::redo) would succeed.
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undo snapshots.
    #[inline]
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    /// Number of redo snapshots.
    #[inline]
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_count()
    }

    /// Replace the content and forget all history.
    pub(crate) fn reset_to(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_line_breaks(text));
        self.history.clear();
    }

    // -- Internals ----------------------------------------------------------

    /// Char indices `[start, end)` of a line's content (break excluded).
    fn line_bounds(&self, row: usize) -> Option<(usize, usize)> {
        let count = self.rope.len_lines();
        if row >= count {
            return None;
        }
        let start = self.rope.line_to_char(row);
        let end = if row + 1 < count {
            self.rope.line_to_char(row + 1) - 1
        } else {
            self.rope.len_chars()
        };
        Some((start, end))
    }

    /// Char indices covered by the end-inclusive range `start ..= end`.
    ///
    /// Columns are clamped to their lines and an `end.row` past the buffer
    /// clamps to the end of the text. `None` when `start.row` is out of range.
    fn char_span(&self, start: Position, end: Position) -> Option<(usize, usize)> {
        let (first_start, first_end) = self.line_bounds(start.row)?;
        let last_row = end.row.min(self.line_count() - 1);
        let end_col = if last_row == end.row { end.col } else { usize::MAX };
        let (last_start, last_end) = self.line_bounds(last_row)?;

        let from = first_start + start.col.min(first_end - first_start);
        let to = last_start + end_col.saturating_add(1).min(last_end - last_start);
        Some((from, to.max(from)))
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.rope.len_chars())
            .field("undo", &self.history.undo_count())
            .field("redo", &self.history.redo_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert `\r\n` and lone `\r` to `\n`. Borrows when there is nothing to do.
pub(crate) fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            out.push('\n');
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
