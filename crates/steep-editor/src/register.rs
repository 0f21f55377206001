//! Yank register: the single slot yank, delete and paste share.
//!
//! The register stores exactly what the host clipboard sees. Line-wise
//! content is marked by a leading `"\n"`, so a yanked line round-trips through
//! the system clipboard without losing its kind:
//!
//! | Operation          | Stored value          | Kind  |
//! |--------------------|-----------------------|-------|
//! | `yy` on `"a"`      | `"\na"`               | Line  |
//! | `V j y` on a, b    | `"\na\nb"`            | Line  |
//! | `yiw` on `"foo"`   | `"foo"`               | Char  |
//! | `x` on `"b"`       | `"b"`                 | Char  |
//!
//! Paste behaves differently for each kind:
//!
//! - **Char-wise**: `p` inserts after the cursor, `P` at the cursor.
//! - **Line-wise**: `p` inserts whole lines below, `P` above.

/// How register content was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// Inline text.
    Char,
    /// Whole lines (value starts with `"\n"`).
    Line,
}

// ── Register ─────────────────────────────────────────────────────────────

/// The yank register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YankRegister {
    content: String,
}

impl YankRegister {
    /// Create an empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Replace the content with raw text. A leading `"\n"` makes it
    /// line-wise.
    pub fn set(&mut self, text: impl Into<String>) {
        self.content = text.into();
    }

    /// Store whole lines: `"\n"` followed by the lines joined with `"\n"`.
    pub fn set_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        let mut content = String::new();
        for line in lines {
            content.push('\n');
            content.push_str(line.as_ref());
        }
        self.content = content;
    }

    /// The stored value, prefix included.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Line-wise iff the value starts with `"\n"`.
    #[must_use]
    pub fn kind(&self) -> RegisterKind {
        if self.content.starts_with('\n') {
            RegisterKind::Line
        } else {
            RegisterKind::Char
        }
    }

    /// The text to insert on paste, without the line-wise marker.
    #[must_use]
    pub fn payload(&self) -> &str {
        self.content.strip_prefix('\n').unwrap_or(&self.content)
    }

    /// The lines a line-wise paste inserts.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.payload().split('\n').collect()
    }

    /// True if nothing has been yanked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
