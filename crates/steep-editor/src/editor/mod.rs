//! The editor: buffer, cursor, mode and key dispatch in one value.
//!
//! An [`Editor`] is what a host embeds. The host feeds it key tokens with
//! [`handle_key`](Editor::handle_key), reads a [`ViewState`] to paint, and
//! reacts to the [`Effect`] each key returns:
//!
//! ```text
//!   host event loop                      Editor
//!  ┌───────────────┐  handle_key(tok)  ┌─────────────────────────────┐
//!  │ terminal keys │──────────────────▶│ dispatch ─▶ binding handler │
//!  │               │◀──────────────────│   │            │            │
//!  │ repaint       │      Effect       │ sequence     buffer/cursor  │
//!  └───────────────┘                   └─────────────────────────────┘
//! ```
//!
//! # Layout
//!
//! - `mod.rs`: the struct, construction, host-facing accessors
//! - `dispatch.rs`: key routing, count prefixes, sequence resolution
//! - `ops.rs`: the editing operations bindings call
//! - `bindings.rs`: the default binding table and built-in ex-commands
//!
//! # Invariants
//!
//! After every public call the cursor is inside the buffer and obeys the
//! column limit of the current mode (see [`Mode::cursor_past_end`]).
//! Operations that change the text snapshot undo state first, and only when
//! they are about to change something.

mod bindings;
mod dispatch;
mod ops;

use std::fmt;
use std::time::{Duration, Instant};

use crate::buffer::{Buffer, normalize_line_breaks};
use crate::clipboard::{self, ClipboardPort};
use crate::command::{CommandLine, CommandRegistry, CommandResult};
use crate::cursor::Cursor;
use crate::highlight::YankHighlight;
use crate::keymap::{KeyBinding, KeyBindingRegistry};
use crate::mode::{Keymap, Mode, VisualKind};
use crate::options::EditorOptions;
use crate::position::{Position, Selection};
use crate::register::YankRegister;
use crate::sequence::KeySequence;
use crate::view::{ViewState, Viewport};

pub use ops::Motion;

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// An opaque request a binding or command queued for the host, such as
/// "run this query". The engine never interprets the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub name: String,
}

/// What one call into the editor changed that the host may care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    /// The mode the editor switched to, if it switched.
    pub mode_changed: Option<Mode>,
    /// The new status message, if it changed (empty means cleared).
    pub status: Option<String>,
    /// Host commands queued with [`Editor::emit`], oldest first.
    pub commands: Vec<HostCommand>,
}

impl Effect {
    /// True when nothing happened the host needs to react to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode_changed.is_none() && self.status.is_none() && self.commands.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// A modal editor over one buffer.
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,

    /// Where visual mode started. Line-wise selections anchor at column 0.
    visual_anchor: Option<Position>,

    register: YankRegister,
    clipboard: Box<dyn ClipboardPort>,

    keymaps: KeyBindingRegistry,
    commands: CommandRegistry,

    /// Keys typed in Normal/Visual that have not resolved to a binding yet.
    sequence: KeySequence,
    command_line: CommandLine,

    status: String,
    status_dirty: bool,
    highlight: YankHighlight,

    options: EditorOptions,

    /// The content `reset()` goes back to.
    initial_content: String,

    /// Rows the host reported, status bar included.
    host_height: usize,
    viewport: Viewport,
    focused: bool,

    /// Time of the key being handled, as reported by the host.
    now: Instant,

    mode_change: Option<Mode>,
    host_commands: Vec<HostCommand>,
}

impl Editor {
    // -- Construction -------------------------------------------------------

    /// Create an editor over `content` with the default bindings and
    /// commands installed. The clipboard is the platform default; tests and
    /// embedding hosts usually swap it with [`with_clipboard`](Self::with_clipboard).
    #[must_use]
    pub fn new(content: &str, options: EditorOptions) -> Self {
        let content = normalize_line_breaks(content).into_owned();
        let mut editor = Self {
            buffer: Buffer::with_undo_limit(&content, options.undo_limit),
            cursor: Cursor::new(),
            mode: Mode::Normal,
            visual_anchor: None,
            register: YankRegister::new(),
            clipboard: clipboard::default_port(),
            keymaps: KeyBindingRegistry::new(),
            commands: CommandRegistry::new(),
            sequence: KeySequence::new(),
            command_line: CommandLine::new(),
            status: String::new(),
            status_dirty: false,
            highlight: YankHighlight::new(),
            initial_content: content,
            host_height: 0,
            viewport: Viewport::default(),
            focused: true,
            now: Instant::now(),
            mode_change: None,
            host_commands: Vec::new(),
            options,
        };
        bindings::install(&mut editor);
        editor
    }

    /// Builder form of [`set_clipboard`](Self::set_clipboard).
    #[must_use]
    pub fn with_clipboard(mut self, port: impl ClipboardPort + 'static) -> Self {
        self.set_clipboard(port);
        self
    }

    /// Replace the clipboard port.
    pub fn set_clipboard(&mut self, port: impl ClipboardPort + 'static) {
        self.clipboard = Box::new(port);
    }

    // -- Mode ---------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode with its entry side effects:
    ///
    /// - **Normal**: re-clamp the cursor, drop the visual anchor, clear the
    ///   status message.
    /// - **Visual**: anchor at the cursor (line-wise: at column 0), unless
    ///   already in visual mode, in which case only the kind changes.
    /// - **Command**: clear the command line.
    ///
    /// The switch is reported in the next [`Effect`].
    pub fn switch_mode(&mut self, mode: Mode) {
        let previous = self.mode;
        self.mode = mode;
        self.mode_change = Some(mode);
        tracing::debug!(from = %previous, to = %mode, "mode switch");

        match mode {
            Mode::Normal => {
                self.visual_anchor = None;
                self.cursor.clamp(&self.buffer, false);
                self.set_status("");
            }
            Mode::Visual(kind) => {
                if !previous.is_visual() || self.visual_anchor.is_none() {
                    let pos = self.cursor.position();
                    self.visual_anchor = Some(match kind {
                        VisualKind::Char => pos,
                        VisualKind::Line => pos.with_col(0),
                    });
                }
                self.set_status(match kind {
                    VisualKind::Char => "-- VISUAL --",
                    VisualKind::Line => "-- VISUAL LINE --",
                });
            }
            Mode::Command => self.command_line.clear(),
            Mode::Insert | Mode::Replace => {}
        }
        self.cursor.clamp(&self.buffer, mode.cursor_past_end());
    }

    /// Host entry point for mode changes. Returns the resulting effect.
    pub fn set_mode(&mut self, mode: Mode) -> Effect {
        self.sequence.clear();
        self.switch_mode(mode);
        self.take_effect()
    }

    // -- Buffer access ------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable access for hosts. Every edit through the handle is undoable.
    pub fn buffer_mut(&mut self) -> BufferHandle<'_> {
        BufferHandle { editor: self }
    }

    /// Replace the whole text (undoable) and pull the cursor back inside.
    /// Setting the current text again records nothing.
    pub fn set_content(&mut self, text: &str) {
        let text = normalize_line_breaks(text);
        if self.buffer.text() != text {
            self.save_undo();
            self.buffer.clear();
            self.buffer.insert_at(0, 0, &text);
        }
        self.clamp_cursor();
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    // -- Cursor -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn cursor_position(&self) -> Position {
        self.cursor.position()
    }

    /// Move the cursor, clamped to the buffer and the mode's column limit.
    pub fn set_cursor_position(&mut self, row: usize, col: usize) {
        let past_end = self.mode.cursor_past_end();
        self.cursor
            .set_position(Position::new(row, col), &self.buffer, past_end);
        self.viewport.scroll_to(self.cursor.row());
    }

    // -- Bindings and commands ----------------------------------------------

    /// Bind `notation` in the keymap of `mode` (a [`Mode`] or a [`Keymap`]).
    /// The handler runs once per count. Returns the binding it replaced.
    pub fn add_binding(
        &mut self,
        notation: &str,
        keymap: impl Into<Keymap>,
        handler: impl Fn(&mut Self, usize) + 'static,
        description: &str,
    ) -> Option<KeyBinding> {
        self.keymaps
            .add(KeyBinding::new(notation, keymap.into(), description, handler))
    }

    /// Add a fully built binding, count policy included.
    pub fn add_binding_with(&mut self, binding: KeyBinding) -> Option<KeyBinding> {
        self.keymaps.add(binding)
    }

    /// Register an ex-command, replacing any command of the same name.
    pub fn add_command(
        &mut self,
        name: &str,
        handler: impl Fn(&mut Self, &[String]) -> CommandResult + 'static,
    ) {
        self.commands.add(name, handler);
    }

    /// Bindings of a mode's keymap, sorted for a help listing.
    #[must_use]
    pub fn bindings(&self, mode: impl Into<Keymap>) -> Vec<&KeyBinding> {
        self.keymaps.bindings(mode.into())
    }

    /// Names of the registered ex-commands, sorted.
    #[must_use]
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.names()
    }

    // -- Status and host commands -------------------------------------------

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_dirty = true;
    }

    /// Queue a request for the host. It arrives in the next [`Effect`].
    pub fn emit(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(%name, "host command queued");
        self.host_commands.push(HostCommand { name });
    }

    /// Drain what changed since the last effect was taken.
    pub fn take_effect(&mut self) -> Effect {
        Effect {
            mode_changed: self.mode_change.take(),
            status: std::mem::take(&mut self.status_dirty).then(|| self.status.clone()),
            commands: std::mem::take(&mut self.host_commands),
        }
    }

    // -- Register and clipboard ---------------------------------------------

    #[must_use]
    pub const fn register(&self) -> &YankRegister {
        &self.register
    }

    /// Take text another program put on the clipboard (last writer wins).
    pub fn apply_clipboard_update(&mut self, text: &str) {
        self.register.set(normalize_line_breaks(text).into_owned());
    }

    // -- Visual selection and highlight -------------------------------------

    /// The active visual selection, normalized. Line-wise selections span
    /// from column 0 of the first row to the last column of the last row.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        let anchor = self.visual_anchor?;
        let Mode::Visual(kind) = self.mode else {
            return None;
        };
        let linewise = kind == VisualKind::Line;
        let mut sel = Selection::ordered(anchor, self.cursor.position(), linewise);
        if linewise {
            sel.start.col = 0;
            sel.end.col = self.buffer.line_len(sel.end.row).saturating_sub(1);
        }
        Some(sel)
    }

    #[must_use]
    pub const fn yank_highlight(&self) -> &YankHighlight {
        &self.highlight
    }

    /// Advance time. Returns `true` when the yank highlight just expired and
    /// the host should repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.highlight.tick(now)
    }

    // -- Focus --------------------------------------------------------------

    /// A blurred editor ignores keys.
    pub const fn blur(&mut self) {
        self.focused = false;
    }

    pub const fn focus(&mut self) {
        self.focused = true;
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    // -- Options and view ---------------------------------------------------

    #[must_use]
    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Rows available to the editor, status bar included. The viewport gets
    /// two rows less when the status bar is on.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.host_height = height;
        self.refresh_viewport();
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// Keys typed so far toward a multi-key binding, count digits included.
    #[must_use]
    pub fn pending_keys(&self) -> &[String] {
        self.sequence.keys()
    }

    /// Everything a renderer needs for one frame.
    #[must_use]
    pub fn view(&self) -> ViewState<'_> {
        ViewState {
            buffer: &self.buffer,
            cursor: self.cursor.position(),
            mode: self.mode,
            selection: self.selection(),
            yank_highlight: self.highlight.region(),
            status: &self.status,
            pending_keys: self.sequence.keys(),
            command_line: &self.command_line,
            relative_numbers: self.options.relative_numbers,
            status_bar: self.options.enable_status_bar,
            file_name: self.options.file_name.as_deref(),
            viewport: self.viewport,
            tab_width: self.options.tab_width,
            focused: self.focused,
        }
    }

    // -- Reset --------------------------------------------------------------

    /// Back to the content the editor was created with. History, register,
    /// pending keys, command line, selection and highlight are all dropped.
    pub fn reset(&mut self) {
        self.buffer.reset_to(&self.initial_content);
        self.cursor = Cursor::new();
        self.register.clear();
        self.sequence.clear();
        self.command_line.clear();
        self.visual_anchor = None;
        self.highlight.clear();
        if self.mode != Mode::Normal {
            self.mode = Mode::Normal;
            self.mode_change = Some(Mode::Normal);
        }
        self.viewport.top = 0;
        self.set_status("Editor reset");
        tracing::debug!("editor reset");
    }

    // -- Internals shared by the child modules ------------------------------

    /// Snapshot undo state at the current cursor.
    fn save_undo(&mut self) {
        self.buffer.save_undo_state(self.cursor.position());
    }

    fn clamp_cursor(&mut self) {
        self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
    }

    const fn past_end(&self) -> bool {
        self.mode.cursor_past_end()
    }

    fn refresh_viewport(&mut self) {
        self.viewport.height = if self.options.enable_status_bar {
            self.host_height.saturating_sub(2)
        } else {
            self.host_height
        };
        self.viewport.scroll_to(self.cursor.row());
    }

    fn yank_highlight_lifetime(&self) -> Duration {
        Duration::from_millis(self.options.yank_highlight_ms)
    }

    fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.options.sequence_timeout_ms)
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("mode", &self.mode)
            .field("cursor", &self.cursor.position())
            .field("lines", &self.buffer.line_count())
            .field("pending", &self.sequence.keys())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// BufferHandle
// ---------------------------------------------------------------------------

/// Host-side buffer editing. Each mutation snapshots undo state first and
/// leaves the cursor valid.
pub struct BufferHandle<'a> {
    editor: &'a mut Editor,
}

impl BufferHandle<'_> {
    /// Insert `text` at `(row, col)`. See [`Buffer::insert_at`]. Empty text
    /// or a row past the end records nothing.
    pub fn insert_at(&mut self, row: usize, col: usize, text: &str) {
        if text.is_empty() || row >= self.editor.buffer.line_count() {
            return;
        }
        self.editor.save_undo();
        self.editor.buffer.insert_at(row, col, text);
        self.editor.clamp_cursor();
    }

    /// Delete an end-inclusive range and return it. See [`Buffer::delete_at`].
    pub fn delete_at(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> String {
        let (start, end) = (
            Position::new(start_row, start_col),
            Position::new(end_row, end_col),
        );
        if self.editor.buffer.range_is_empty(start, end) {
            return String::new();
        }
        self.editor.save_undo();
        let removed = self
            .editor
            .buffer
            .delete_at(start_row, start_col, end_row, end_col);
        self.editor.clamp_cursor();
        removed
    }

    /// Undo one step. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo one step. Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.editor.buffer.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.editor.buffer.can_redo()
    }

    /// Empty the buffer and put the cursor at the origin.
    pub fn clear(&mut self) {
        if !self.editor.buffer.is_empty() {
            self.editor.save_undo();
            self.editor.buffer.clear();
        }
        self.editor.cursor = Cursor::new();
    }
}

impl fmt::Debug for BufferHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
