//! View: what a renderer reads from the editor.
//!
//! The engine does not paint. A host renderer asks the editor for a
//! [`ViewState`], a borrowed snapshot of everything drawn on screen, and
//! turns it into terminal cells however it likes:
//!
//! ```text
//!  Editor              ViewState                  Host renderer
//! ┌────────┐   view()  ┌───────────────────┐      ┌──────────────────────┐
//! │ buffer │──────────▶│ lines, cursor     │─────▶│    1 select *        │
//! │ cursor │           │ mode, selection   │      │    2 from users      │
//! │ mode   │           │ highlight, status │      │ NORMAL | yanked 1:3  │
//! │ ...    │           │ viewport, numbers │      └──────────────────────┘
//! └────────┘           └───────────────────┘
//! ```
//!
//! The helpers here do the coordinate work every renderer needs: tab and
//! wide-character expansion, line number labels, per-row selection spans,
//! and keeping the cursor row inside the [`Viewport`].

use std::ops::Range;

use ropey::RopeSlice;
use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::command::CommandLine;
use crate::mode::{CursorShape, Mode};
use crate::position::{Position, Selection};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a char column offset to a display column position.
///
/// Walks the character iterator, expanding tabs to the next tab stop and
/// accounting for wide characters (which consume 2 display columns). Stops
/// at `char_col` or when the characters run out.
#[must_use]
pub fn char_col_to_display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: u8,
) -> usize {
    let tab_w = usize::from(tab_width.max(1));
    let mut display_col = 0;

    for (i, ch) in chars.enumerate() {
        if i >= char_col {
            break;
        }
        match ch {
            '\n' => break,
            '\t' => display_col = (display_col / tab_w + 1) * tab_w,
            _ => display_col += ch.width().unwrap_or(0),
        }
    }

    display_col
}

/// The 4-wide, right-aligned gutter label for `row`.
///
/// The cursor row always shows its 1-indexed number. Other rows show theirs
/// too, unless `relative` is set, in which case they show their distance
/// from the cursor row.
#[must_use]
pub fn line_number_label(row: usize, cursor_row: usize, relative: bool) -> String {
    let n = if relative && row != cursor_row {
        row.abs_diff(cursor_row)
    } else {
        row + 1
    };
    format!("{n:>4}")
}

/// The half-open column span `sel` covers on `row`, given that row's length.
///
/// Line-wise selections cover the whole row. `None` when the row is outside
/// the selection.
#[must_use]
pub fn row_span(sel: Selection, row: usize, line_len: usize) -> Option<Range<usize>> {
    if row < sel.start.row || row > sel.end.row {
        return None;
    }
    if sel.linewise {
        return Some(0..line_len);
    }
    let start = if row == sel.start.row { sel.start.col } else { 0 };
    let end = if row == sel.end.row {
        (sel.end.col + 1).min(line_len.max(start))
    } else {
        line_len
    };
    Some(start.min(end)..end)
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The rows of the buffer the host shows.
///
/// `height` is the number of text rows; the editor subtracts the status bar
/// from what the host reports. A height of zero means "unknown" and never
/// scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top: usize,
    pub height: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(height: usize) -> Self {
        Self { top: 0, height }
    }

    /// Scroll the minimum amount that puts `row` on screen.
    pub const fn scroll_to(&mut self, row: usize) {
        if self.height == 0 {
            return;
        }
        if row < self.top {
            self.top = row;
        } else if row >= self.top + self.height {
            self.top = row + 1 - self.height;
        }
    }

    /// Buffer rows on screen, clipped to `line_count`.
    #[must_use]
    pub fn visible_rows(&self, line_count: usize) -> Range<usize> {
        let end = if self.height == 0 {
            line_count
        } else {
            (self.top + self.height).min(line_count)
        };
        self.top.min(end)..end
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A borrowed snapshot of everything a renderer draws.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub buffer: &'a Buffer,
    pub cursor: Position,
    pub mode: Mode,
    pub selection: Option<Selection>,
    pub yank_highlight: Option<Selection>,
    pub status: &'a str,
    pub pending_keys: &'a [String],
    pub command_line: &'a CommandLine,
    pub relative_numbers: bool,
    pub status_bar: bool,
    pub file_name: Option<&'a str>,
    pub viewport: Viewport,
    pub tab_width: u8,
    pub focused: bool,
}

impl<'a> ViewState<'a> {
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'a>> {
        self.buffer.line(row)
    }

    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.buffer.line_len(row)
    }

    /// The rows to draw, top to bottom.
    #[must_use]
    pub fn visible_rows(&self) -> Range<usize> {
        self.viewport.visible_rows(self.line_count())
    }

    /// Gutter label for `row`; blank past the end of the buffer.
    #[must_use]
    pub fn line_number(&self, row: usize) -> String {
        if row >= self.line_count() {
            return " ".repeat(4);
        }
        line_number_label(row, self.cursor.row, self.relative_numbers)
    }

    /// How the host should draw the cursor in the current mode.
    #[must_use]
    pub const fn cursor_shape(&self) -> CursorShape {
        self.mode.cursor_shape()
    }

    /// Cursor column on screen, with tabs and wide characters expanded.
    #[must_use]
    pub fn cursor_display_col(&self) -> usize {
        self.buffer.line(self.cursor.row).map_or(0, |line| {
            char_col_to_display_col(line.chars(), self.cursor.col, self.tab_width)
        })
    }

    /// Columns of `row` inside the visual selection.
    #[must_use]
    pub fn selection_span(&self, row: usize) -> Option<Range<usize>> {
        row_span(self.selection?, row, self.line_len(row))
    }

    /// Columns of `row` inside the yank highlight.
    #[must_use]
    pub fn highlight_span(&self, row: usize) -> Option<Range<usize>> {
        row_span(self.yank_highlight?, row, self.line_len(row))
    }

    /// Left part of the status bar: the command line in Command mode,
    /// otherwise the mode name, pending keys and status message.
    #[must_use]
    pub fn status_text(&self) -> String {
        if self.mode == Mode::Command {
            return format!(":{}", self.command_line.input());
        }
        let mut text = format!(" {}", self.mode);
        if let Some(name) = self.file_name {
            text.push_str(" | ");
            text.push_str(name);
        }
        if !self.pending_keys.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.pending_keys.concat());
        }
        if !self.status.is_empty() {
            text.push_str(" | ");
            text.push_str(self.status);
        }
        text
    }

    /// The full status bar padded to `width`, cursor position on the right.
    #[must_use]
    pub fn status_line(&self, width: usize) -> String {
        let left = self.status_text();
        let right = format!(" {} ", self.cursor);
        let used = display_width(&left) + display_width(&right);
        let padding = width.saturating_sub(used);
        format!("{left}{}{right}", " ".repeat(padding))
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
