//! Undo/redo history: whole-text snapshots with cursors.
//!
//! Every mutating editor operation calls [`History::record`] with the buffer
//! content *before* the mutation. Each entry is a full snapshot of the text
//! plus the cursor at that moment:
//!
//! ```text
//! record(text, cursor)   // before the edit
//! // mutate the buffer
//! undo(&mut text, cursor) -> Some(cursor_at_snapshot)
//! redo(&mut text, cursor) -> Some(cursor_passed_to_undo)
//! ```
//!
//! Snapshots are [`ropey::Rope`] clones, which share tree nodes with the
//! live buffer until either side is edited.
//!
//! Recording the same content twice in a row is a no-op: the second call
//! neither pushes an entry nor clears the redo stack.

use ropey::Rope;

use crate::position::Position;

/// Maximum undo depth unless configured otherwise.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One restorable state: the whole text and where the cursor was.
#[derive(Debug, Clone)]
struct Snapshot {
    text: Rope,
    cursor: Position,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo stacks for one buffer.
///
/// New snapshots clear the redo stack (branching history is not supported).
/// The undo stack holds at most `limit` entries; the oldest fall off first.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl History {
    /// Create an empty history with the default depth.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Create an empty history holding at most `limit` undo entries
    /// (at least one).
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: if limit == 0 { 1 } else { limit },
        }
    }

    /// Push a snapshot of `text` taken before a mutation.
    ///
    /// Returns `false` (and changes nothing) when `text` is identical to the
    /// newest undo entry.
    pub fn record(&mut self, text: &Rope, cursor: Position) -> bool {
        if self.undo_stack.last().is_some_and(|top| top.text == *text) {
            return false;
        }
        self.undo_stack.push(Snapshot {
            text: text.clone(),
            cursor,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
        true
    }

    /// Restore the newest undo snapshot into `text`.
    ///
    /// The replaced content and `cursor` go onto the redo stack. Returns the
    /// cursor stored with the snapshot, or `None` when there is nothing to
    /// undo (in which case `text` is untouched).
    pub fn undo(&mut self, text: &mut Rope, cursor: Position) -> Option<Position> {
        let snapshot = self.undo_stack.pop()?;
        let replaced = std::mem::replace(text, snapshot.text);
        self.redo_stack.push(Snapshot {
            text: replaced,
            cursor,
        });
        Some(snapshot.cursor)
    }

    /// Restore the newest redo snapshot into `text`. Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, text: &mut Rope, cursor: Position) -> Option<Position> {
        let snapshot = self.redo_stack.pop()?;
        let replaced = std::mem::replace(text, snapshot.text);
        self.undo_stack.push(Snapshot {
            text: replaced,
            cursor,
        });
        Some(snapshot.cursor)
    }

    /// True if there is at least one entry to undo.
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there is at least one entry to redo.
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo entries.
    #[inline]
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo entries.
    #[inline]
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// The configured maximum undo depth.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
