//! Yank highlight: a short flash over the text that was just yanked.
//!
//! The editor arms a [`YankHighlight`] on every yank and the host clears it
//! by calling [`Editor::tick`](crate::editor::Editor::tick) with the current
//! time. Ranges are inclusive, like visual selections.

use std::time::{Duration, Instant};

use crate::position::{Position, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YankHighlight {
    active: bool,
    start: Position,
    end: Position,
    linewise: bool,
    expires_at: Option<Instant>,
}

impl YankHighlight {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: false,
            start: Position::ZERO,
            end: Position::ZERO,
            linewise: false,
            expires_at: None,
        }
    }

    /// Highlight `[start, end]` until `now + lifetime`.
    pub fn arm(
        &mut self,
        start: Position,
        end: Position,
        linewise: bool,
        now: Instant,
        lifetime: Duration,
    ) {
        *self = Self {
            active: true,
            start,
            end,
            linewise,
            expires_at: Some(now + lifetime),
        };
    }

    /// Clear the highlight once its time is up. Returns `true` when this
    /// call turned it off (the host should redraw).
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.active && self.expires_at.is_some_and(|at| now >= at) {
            self.clear();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The highlighted region, if active.
    #[must_use]
    pub fn region(&self) -> Option<Selection> {
        self.active.then(|| Selection::ordered(self.start, self.end, self.linewise))
    }

    /// True when `pos` is inside the active highlight.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.region().is_some_and(|sel| sel.contains(pos))
    }
}
