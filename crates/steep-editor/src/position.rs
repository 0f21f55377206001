//! Position and selection types.
//!
//! All coordinates are **0-indexed**. Row 0 is the first line, column 0 is the
//! first character. Columns count Unicode scalar values (chars), not bytes,
//! matching how `ropey` indexes text.
//!
//! Display layers should convert to 1-indexed for the user; that conversion
//! never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (row, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte offset.
/// For the line `"café"`, column 3 is `'é'` and column 4 is the
/// cursor-after-last-char position used in insert mode.
///
/// # Ordering
///
/// Positions are ordered row first, then column, so
/// `Position { row: 0, col: 5 }` < `Position { row: 1, col: 0 }`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// The origin, row 0 column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Same row, different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self { row: self.row, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, like Vim's `line:col` ruler.
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

/// Order two positions so that the first is `<=` the second.
#[inline]
#[must_use]
pub fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A normalized visual selection: `[start, end]`, **both ends inclusive**.
///
/// Unlike a half-open range, `end` names the last selected character. That
/// is how visual mode thinks: the character under the cursor is part of the
/// selection. Line-wise selections cover whole rows; their columns are
/// widened to `0` and the last column of `end.row` by whoever builds them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub linewise: bool,
}

impl Selection {
    /// Build a selection from an anchor and a head in any order.
    #[must_use]
    pub fn ordered(anchor: Position, head: Position, linewise: bool) -> Self {
        let (start, end) = ordered(anchor, head);
        Self {
            start,
            end,
            linewise,
        }
    }

    /// True when `pos` falls inside the selection. For line-wise selections
    /// only the row matters.
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        if self.linewise {
            return (self.start.row..=self.end.row).contains(&pos.row);
        }
        pos >= self.start && pos <= self.end
    }

    /// Number of rows touched. A single-row selection returns 1.
    #[inline]
    #[must_use]
    pub const fn line_span(self) -> usize {
        self.end.row - self.start.row + 1
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Selection({}:{} ..= {}:{}{})",
            self.start.row,
            self.start.col,
            self.end.row,
            self.end.col,
            if self.linewise { ", line" } else { "" }
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
