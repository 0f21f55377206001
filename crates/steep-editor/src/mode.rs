//! Vim-style modal editing.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how input
//! is interpreted and how the cursor behaves:
//!
//! | Mode        | Keymap  | Cursor shape | Cursor limit      | Purpose              |
//! |-------------|---------|--------------|-------------------|----------------------|
//! | Normal      | Normal  | Block        | `0..len-1`        | Navigation, commands |
//! | Insert      | Insert  | Bar          | `0..len`          | Typing text          |
//! | Visual      | Visual  | Block        | `0..len-1`        | Selecting characters |
//! | Visual Line | Visual  | Block        | `0..len-1`        | Selecting rows       |
//! | Replace     | Replace | Underline    | `0..len`          | Overwriting text     |
//! | Command     | Command | Bar          | buffer: `0..len-1`| `:` commands         |
//!
//! Both visual kinds read the same binding table, which is why bindings are
//! keyed by [`Keymap`] rather than by `Mode`.

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise selection.
    Char,
    /// `V`: line-wise selection (always selects full lines).
    Line,
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("VISUAL"),
            Self::Line => f.write_str("VISUAL LINE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data. Key dispatch and transition side effects live in the editor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default mode. Keys are commands, not text input.
    #[default]
    Normal,
    /// Text entry mode. Keys produce characters in the buffer.
    Insert,
    /// Selection mode. Movement extends the selection.
    Visual(VisualKind),
    /// `R`: continuous overwrite until Esc.
    Replace,
    /// `:` command line. Keys edit the command line, not the buffer.
    Command,
}

impl Mode {
    /// Shorthand for `Mode::Visual(VisualKind::Line)`.
    pub const VISUAL_LINE: Self = Self::Visual(VisualKind::Line);
    /// Shorthand for `Mode::Visual(VisualKind::Char)`.
    pub const VISUAL: Self = Self::Visual(VisualKind::Char);

    /// Human-readable name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
            Self::Replace => "REPLACE",
            Self::Command => "COMMAND",
        }
    }

    /// The binding table this mode reads.
    #[must_use]
    pub const fn keymap(self) -> Keymap {
        match self {
            Self::Normal => Keymap::Normal,
            Self::Insert => Keymap::Insert,
            Self::Visual(_) => Keymap::Visual,
            Self::Replace => Keymap::Replace,
            Self::Command => Keymap::Command,
        }
    }

    /// The terminal cursor shape for this mode.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal | Self::Visual(_) => CursorShape::Block,
            Self::Insert | Self::Command => CursorShape::Bar,
            Self::Replace => CursorShape::Underline,
        }
    }

    /// True if the buffer cursor can sit one past the last char.
    ///
    /// Replace mode allows it so that typing at the end of a line appends.
    /// Command mode does not: the buffer cursor stays where Normal left it.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// True if this mode accepts text input (insert, replace, command).
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert | Self::Replace | Self::Command)
    }

    /// True if we're in any visual sub-mode.
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    /// True for line-wise visual mode.
    #[inline]
    #[must_use]
    pub const fn is_visual_line(self) -> bool {
        matches!(self, Self::Visual(VisualKind::Line))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

/// Which binding table a key is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keymap {
    Normal,
    Insert,
    Visual,
    Replace,
    Command,
}

impl Keymap {
    /// Every keymap, in help-listing order.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Insert,
        Self::Visual,
        Self::Replace,
        Self::Command,
    ];

    /// True for keymaps that dispatch multi-key sequences with counts.
    /// The rest do a single-key lookup and type everything else.
    #[inline]
    #[must_use]
    pub const fn uses_sequences(self) -> bool {
        matches!(self, Self::Normal | Self::Visual)
    }

    /// Lowercase name, as used in help listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Insert => "insert",
            Self::Visual => "visual",
            Self::Replace => "replace",
            Self::Command => "command",
        }
    }
}

impl From<Mode> for Keymap {
    fn from(mode: Mode) -> Self {
        mode.keymap()
    }
}

impl fmt::Display for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

/// Cursor shape hint for the host's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// `█`, solid block cursor.
    Block,
    /// `▏`, thin vertical bar.
    Bar,
    /// `▁`, underline.
    Underline,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
