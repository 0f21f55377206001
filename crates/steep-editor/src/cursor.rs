//! Cursor: position tracking with a desired column and per-mode clamping.
//!
//! The `Cursor` tracks a position in a buffer and the column it *wants* to be
//! on when moving vertically. It provides movement primitives that respect
//! buffer boundaries and the active mode's column limit.
//!
//! # Column limits
//!
//! Movement methods take a `past_end: bool` parameter rather than a mode:
//!
//! - **Normal / Visual**: `past_end = false`, the cursor sits ON a character
//!   (`col ∈ [0, len-1]`, or `0` on an empty line).
//! - **Insert / Replace**: `past_end = true`, the cursor may sit after the last
//!   character (`col ∈ [0, len]`).
//!
//! The caller picks the limit via [`Mode::cursor_past_end`].
//!
//! # Desired column
//!
//! `j`/`k`/`gg`/`G` land on `min(desired_col, last column)` of the target
//! line. Horizontal movement resets the desired column to wherever the cursor
//! ends up, so passing through a short line does not lose the original column.
//!
//! [`Mode::cursor_past_end`]: crate::mode::Mode::cursor_past_end

use crate::buffer::Buffer;
use crate::position::Position;
use crate::view::char_col_to_display_col;
use crate::word;

/// A cursor in a text buffer.
///
/// Lightweight value type. It does not own or reference the buffer; the
/// buffer is passed to movement methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    desired_col: usize,
}

impl Cursor {
    /// A cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            desired_col: 0,
        }
    }

    /// A cursor at `pos`, desiring its column.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            desired_col: pos.col,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.pos.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    /// The column vertical motions aim for.
    #[inline]
    #[must_use]
    pub const fn desired_col(&self) -> usize {
        self.desired_col
    }

    /// Screen column of the cursor on its line, with tabs expanded.
    #[must_use]
    pub fn display_col(&self, buf: &Buffer, tab_width: u8) -> usize {
        buf.line(self.pos.row).map_or(0, |line| {
            char_col_to_display_col(line.chars(), self.pos.col, tab_width)
        })
    }

    // -- Direct positioning -------------------------------------------------

    /// Move to `pos`, clamped. The desired column follows.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = clamp(pos, buf, past_end);
        self.desired_col = self.pos.col;
    }

    /// Pull the cursor back inside the buffer without touching the desired
    /// column.
    pub fn clamp(&mut self, buf: &Buffer, past_end: bool) {
        self.pos = clamp(self.pos, buf, past_end);
    }

    // -- Horizontal movement ------------------------------------------------

    /// `h`: left by `count`, stopping at column 0.
    pub fn move_left(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        let max_col = max_col_for_row(buf, self.pos.row, past_end);
        self.pos.col = self.pos.col.min(max_col).saturating_sub(count);
        self.desired_col = self.pos.col;
    }

    /// `l`: right by `count`, stopping at the column limit.
    pub fn move_right(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        let max_col = max_col_for_row(buf, self.pos.row, past_end);
        self.pos.col = self.pos.col.saturating_add(count).min(max_col);
        self.desired_col = self.pos.col;
    }

    /// `space`: one character right, wrapping to the next line's start at
    /// the end of a line.
    pub fn move_right_or_next_line(&mut self, count: usize, buf: &Buffer) {
        for _ in 0..count {
            let len = buf.line_len(self.pos.row);
            if len > 0 && self.pos.col + 1 < len {
                self.pos.col += 1;
            } else if self.pos.row + 1 < buf.line_count() {
                self.pos = Position::new(self.pos.row + 1, 0);
            } else {
                break;
            }
        }
        self.desired_col = self.pos.col;
    }

    /// `0`: first column.
    pub const fn move_to_line_start(&mut self) {
        self.pos.col = 0;
        self.desired_col = 0;
    }

    /// `^`: first non-blank character of the line.
    pub fn move_to_first_non_blank(&mut self, buf: &Buffer, past_end: bool) {
        let blanks = buf
            .line(self.pos.row)
            .map_or(0, |line| line.chars().take_while(|ch| ch.is_whitespace()).count());
        self.pos.col = blanks.min(max_col_for_row(buf, self.pos.row, past_end));
        self.desired_col = self.pos.col;
    }

    /// `$`: last character of the line (past it when `past_end`).
    pub fn move_to_line_end(&mut self, buf: &Buffer, past_end: bool) {
        self.pos.col = max_col_for_row(buf, self.pos.row, past_end);
        self.desired_col = self.pos.col;
    }

    // -- Vertical movement --------------------------------------------------

    /// `k`: up by `count` rows, aiming for the desired column.
    pub fn move_up(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        self.goto_row(self.pos.row.saturating_sub(count), buf, past_end);
    }

    /// `j`: down by `count` rows, aiming for the desired column.
    pub fn move_down(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        self.goto_row(self.pos.row.saturating_add(count), buf, past_end);
    }

    /// Jump to `row` (clamped), aiming for the desired column. This backs
    /// `gg` and `G`.
    pub fn goto_row(&mut self, row: usize, buf: &Buffer, past_end: bool) {
        let row = row.min(buf.line_count().saturating_sub(1));
        let col = self.desired_col.min(max_col_for_row(buf, row, past_end));
        self.pos = Position::new(row, col);
    }

    // -- Word motions -------------------------------------------------------

    /// `w`: forward to the start of the `count`th next word.
    pub fn word_forward(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        for _ in 0..count {
            self.pos = word::next_word_start(buf, self.pos);
        }
        self.clamp(buf, past_end);
        self.desired_col = self.pos.col;
    }

    /// `b`: back to the start of the `count`th previous word.
    pub fn word_backward(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        for _ in 0..count {
            self.pos = word::prev_word_start(buf, self.pos);
        }
        self.clamp(buf, past_end);
        self.desired_col = self.pos.col;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The largest legal column on `row`.
pub(crate) fn max_col_for_row(buf: &Buffer, row: usize, past_end: bool) -> usize {
    let len = buf.line_len(row);
    if past_end { len } else { len.saturating_sub(1) }
}

/// Clamp a position into the buffer under the given column limit.
pub(crate) fn clamp(pos: Position, buf: &Buffer, past_end: bool) -> Position {
    let row = pos.row.min(buf.line_count().saturating_sub(1));
    let col = pos.col.min(max_col_for_row(buf, row, past_end));
    Position::new(row, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
