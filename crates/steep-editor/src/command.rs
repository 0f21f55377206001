//! Command-line mode: the `:` prompt and the ex-command table.
//!
//! When the user presses `:` the editor enters command mode and keys go to a
//! [`CommandLine`]. Enter looks up the first word in the [`CommandRegistry`]
//! and runs its handler with the remaining words; Escape cancels.
//!
//! # Built-in commands
//!
//! | Command        | Action                                        |
//! |----------------|-----------------------------------------------|
//! | `:zr`          | Toggle relative line numbers                  |
//! | `:clear`       | Empty the buffer (undoable)                   |
//! | `:reset`       | Restore the initial content, drop history     |
//! | `:set ...`     | Change or query options (see [`options`])     |
//!
//! Hosts register their own commands with
//! [`Editor::add_command`](crate::editor::Editor::add_command).
//!
//! [`options`]: crate::options

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::editor::Editor;

// ---------------------------------------------------------------------------
// Results and handlers
// ---------------------------------------------------------------------------

/// The result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command succeeded. Optional message for the status line.
    Ok(Option<String>),

    /// Command failed. Error message for the status line.
    Err(String),
}

impl CommandResult {
    /// Success with nothing to report.
    #[must_use]
    pub const fn done() -> Self {
        Self::Ok(None)
    }

    /// Success with a status message.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Ok(Some(text.into()))
    }
}

/// An ex-command handler. Receives the whitespace-split words after the
/// command name.
pub type CommandHandler = Rc<dyn Fn(&mut Editor, &[String]) -> CommandResult>;

// ---------------------------------------------------------------------------
// CommandRegistry
// ---------------------------------------------------------------------------

/// Ex-commands by name.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Editor, &[String]) -> CommandResult + 'static,
    ) {
        self.commands.insert(name.into(), Rc::new(handler));
    }

    /// The handler for `name`, cloned so the caller can run it while
    /// mutably borrowing the editor.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish_non_exhaustive()
    }
}

/// Split command-line input into a name and its arguments.
///
/// Returns `None` for blank input.
#[must_use]
pub fn split_command(input: &str) -> Option<(&str, Vec<String>)> {
    let mut words = input.split_whitespace();
    let name = words.next()?;
    Some((name, words.map(str::to_string).collect()))
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer.
///
/// Tracks the text the user is typing and the cursor position within it.
/// The leading `:` is not stored; it's drawn by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    /// The command text (without the leading `:`).
    input: String,

    /// Cursor position within `input` (char offset, 0-indexed).
    cursor: usize,
}

impl CommandLine {
    /// Create an empty command line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// The current input text (without the leading `:`).
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The cursor position within the input (char offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    /// Returns `true` if a character was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    /// Clear the input and reset the cursor.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Take the input, leaving the line empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Convert a char offset to a byte offset in `self.input`.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
