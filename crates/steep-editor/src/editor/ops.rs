//! Editing operations.
//!
//! These are the verbs the default bindings call, public so that host
//! bindings can reuse them. Each one leaves the cursor valid for the mode it
//! ends in and snapshots undo state right before it changes the text.

use std::ops::Range;

use super::Editor;
use crate::buffer::normalize_line_breaks;
use crate::command::{CommandResult, split_command};
use crate::mode::{Mode, VisualKind};
use crate::position::{Position, Selection};
use crate::register::RegisterKind;
use crate::word::{line_chars, word_boundary};

/// Bracketed-paste markers a terminal may leave around pasted text.
const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// A cursor motion. Counts repeat the motion; `gg` and `G` ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// `h`, `left`
    Left,
    /// `l`, `right`
    Right,
    /// `k`, `up`
    Up,
    /// `j`, `down`
    Down,
    /// `w`
    WordForward,
    /// `b`
    WordBackward,
    /// `space`: right, wrapping onto the next line.
    NextChar,
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `gg`
    FirstLine,
    /// `G`
    LastLine,
}

impl Editor {
    /// Move the cursor. The column limit follows the current mode.
    pub fn apply_motion(&mut self, motion: Motion, count: usize) {
        let past_end = self.past_end();
        let count = count.max(1);
        let buf = &self.buffer;
        let cursor = &mut self.cursor;
        match motion {
            Motion::Left => cursor.move_left(count, buf, past_end),
            Motion::Right => cursor.move_right(count, buf, past_end),
            Motion::Up => cursor.move_up(count, buf, past_end),
            Motion::Down => cursor.move_down(count, buf, past_end),
            Motion::WordForward => cursor.word_forward(count, buf, past_end),
            Motion::WordBackward => cursor.word_backward(count, buf, past_end),
            Motion::NextChar => cursor.move_right_or_next_line(count, buf),
            Motion::LineStart => cursor.move_to_line_start(),
            Motion::FirstNonBlank => cursor.move_to_first_non_blank(buf, past_end),
            Motion::LineEnd => cursor.move_to_line_end(buf, past_end),
            Motion::FirstLine => cursor.goto_row(0, buf, past_end),
            Motion::LastLine => cursor.goto_row(buf.line_count().saturating_sub(1), buf, past_end),
        }
        self.viewport.scroll_to(self.cursor.row());
    }

    // -- Entering Insert ----------------------------------------------------

    /// `a`: insert after the cursor character.
    pub fn append(&mut self) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.row);
        self.switch_mode(Mode::Insert);
        if pos.col < len {
            self.cursor
                .set_position(pos.with_col(pos.col + 1), &self.buffer, true);
        }
    }

    /// `A`: insert at the end of the line.
    pub fn append_at_line_end(&mut self) {
        self.switch_mode(Mode::Insert);
        self.cursor.move_to_line_end(&self.buffer, true);
    }

    /// `I`: insert at column 0.
    pub fn insert_at_line_start(&mut self) {
        self.switch_mode(Mode::Insert);
        self.cursor.move_to_line_start();
    }

    /// `o`: open an empty line below and insert there.
    pub fn open_line_below(&mut self) {
        let row = self.cursor.row();
        self.save_undo();
        self.buffer.insert_line(row + 1, "");
        self.switch_mode(Mode::Insert);
        self.cursor
            .set_position(Position::new(row + 1, 0), &self.buffer, true);
    }

    /// `O`: open an empty line above and insert there.
    pub fn open_line_above(&mut self) {
        let row = self.cursor.row();
        self.save_undo();
        self.buffer.insert_line(row, "");
        self.switch_mode(Mode::Insert);
        self.cursor.set_position(Position::new(row, 0), &self.buffer, true);
    }

    // -- Normal-mode edits --------------------------------------------------

    /// `x`: delete `count` characters from the cursor into the register.
    pub fn delete_chars(&mut self, count: usize) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.row);
        if pos.col >= len {
            return;
        }
        let last = (pos.col + count.max(1) - 1).min(len - 1);
        self.save_undo();
        let removed = self.buffer.delete_range(pos, pos.with_col(last));
        self.store_register(removed);
        self.clamp_cursor();
    }

    /// `D`: delete from the cursor to the end of the line.
    pub fn delete_to_line_end(&mut self) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.row);
        if pos.col >= len {
            return;
        }
        self.save_undo();
        let removed = self.buffer.delete_range(pos, pos.with_col(len - 1));
        self.store_register(removed);
        self.clamp_cursor();
    }

    /// `dd`: delete `count` lines into the register, line-wise.
    pub fn delete_lines(&mut self, count: usize) {
        let first = self.cursor.row();
        let last = self.last_row_of(first, count);
        let lines = self.line_texts(first, last);
        self.register.set_lines(&lines);
        self.push_clipboard();
        if self.buffer.is_empty() {
            return;
        }
        self.save_undo();
        self.remove_lines(first, last);
        self.cursor.goto_row(first, &self.buffer, false);
        self.viewport.scroll_to(self.cursor.row());
    }

    /// `yy`: yank `count` lines, line-wise.
    pub fn yank_lines(&mut self, count: usize) {
        let first = self.cursor.row();
        let last = self.last_row_of(first, count);
        let lines = self.line_texts(first, last);
        self.register.set_lines(&lines);
        self.push_clipboard();
        let end = Position::new(last, self.buffer.line_len(last).saturating_sub(1));
        self.flash(Position::new(first, 0), end, true);
        self.report_yank();
    }

    /// `p`: paste the register `count` times after the cursor. Line-wise
    /// content goes below the current line.
    pub fn paste_after(&mut self, count: usize) {
        if self.register.is_empty() {
            return;
        }
        let pos = self.cursor.position();
        self.save_undo();
        match self.register.kind() {
            RegisterKind::Line => {
                let lines = self.repeated_register_lines(count);
                self.insert_lines(pos.row + 1, &lines, false);
                self.cursor
                    .set_position(Position::new(pos.row + 1, 0), &self.buffer, false);
            }
            RegisterKind::Char => {
                let at = if self.buffer.line_len(pos.row) == 0 {
                    pos
                } else {
                    pos.with_col(pos.col + 1)
                };
                let text = self.register.payload().repeat(count.max(1));
                self.buffer.insert_at(at.row, at.col, &text);
                self.cursor
                    .set_position(last_inserted(at, &text), &self.buffer, self.past_end());
            }
        }
        self.viewport.scroll_to(self.cursor.row());
    }

    /// `P`: paste the register `count` times at the cursor. Line-wise
    /// content goes above the current line.
    pub fn paste_before(&mut self, count: usize) {
        if self.register.is_empty() {
            return;
        }
        let pos = self.cursor.position();
        self.save_undo();
        match self.register.kind() {
            RegisterKind::Line => {
                let lines = self.repeated_register_lines(count);
                self.insert_lines(pos.row, &lines, false);
                self.cursor
                    .set_position(Position::new(pos.row, 0), &self.buffer, false);
            }
            RegisterKind::Char => {
                let text = self.register.payload().repeat(count.max(1));
                self.buffer.insert_at(pos.row, pos.col, &text);
                self.cursor
                    .set_position(last_inserted(pos, &text), &self.buffer, self.past_end());
            }
        }
        self.viewport.scroll_to(self.cursor.row());
    }

    /// `u`. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(pos) = self.buffer.undo(self.cursor.position()) {
            self.cursor.set_position(pos, &self.buffer, self.past_end());
            self.viewport.scroll_to(self.cursor.row());
            self.set_status("Undo");
            true
        } else {
            self.set_status("Already at oldest change");
            false
        }
    }

    /// `ctrl+r`. Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(pos) = self.buffer.redo(self.cursor.position()) {
            self.cursor.set_position(pos, &self.buffer, self.past_end());
            self.viewport.scroll_to(self.cursor.row());
            self.set_status("Redo");
            true
        } else {
            self.set_status("Already at newest change");
            false
        }
    }

    // -- Inner word ---------------------------------------------------------

    /// `yiw`
    pub fn yank_inner_word(&mut self) {
        let Some((row, span, word)) = self.inner_word() else {
            return;
        };
        self.store_register(word);
        self.flash(
            Position::new(row, span.start),
            Position::new(row, span.end - 1),
            false,
        );
        let message = format!("yanked word: {}", self.register.content());
        self.set_status(message);
    }

    /// `diw`
    pub fn delete_inner_word(&mut self) {
        self.cut_inner_word();
    }

    /// `ciw`: delete the word and insert in its place.
    pub fn change_inner_word(&mut self) {
        if let Some(pos) = self.cut_inner_word() {
            self.switch_mode(Mode::Insert);
            self.cursor.set_position(pos, &self.buffer, true);
        }
    }

    /// Remove the run under the cursor into the register. Returns where it
    /// started.
    fn cut_inner_word(&mut self) -> Option<Position> {
        let (row, span, word) = self.inner_word()?;
        let start = Position::new(row, span.start);
        self.save_undo();
        self.buffer
            .delete_range(start, Position::new(row, span.end - 1));
        self.store_register(word);
        self.cursor.set_position(start, &self.buffer, self.past_end());
        Some(start)
    }

    /// Row, span and text of the run under the cursor. `None` on an empty
    /// line.
    fn inner_word(&self) -> Option<(usize, Range<usize>, String)> {
        let row = self.cursor.row();
        let chars = line_chars(&self.buffer, row);
        let span = word_boundary(&chars, self.cursor.col());
        if span.is_empty() {
            return None;
        }
        let word = chars[span.clone()].iter().collect();
        Some((row, span, word))
    }

    // -- Visual -------------------------------------------------------------

    /// Visual `y`: yank the selection and return to Normal.
    pub fn visual_yank(&mut self) {
        let Some(sel) = self.selection() else {
            return;
        };
        let text = self.selection_text(sel);
        self.store_register(text);
        self.switch_mode(Mode::Normal);
        if sel.linewise {
            self.cursor.goto_row(sel.start.row, &self.buffer, false);
        } else {
            self.cursor.set_position(sel.start, &self.buffer, false);
        }
        self.flash(sel.start, sel.end, sel.linewise);
        self.report_yank();
    }

    /// Visual `d` / `x`: delete the selection into the register. Line-wise
    /// selections remove whole lines.
    pub fn visual_delete(&mut self) {
        let Some(sel) = self.selection() else {
            return;
        };
        if !self.selection_has_text(sel) {
            self.switch_mode(Mode::Normal);
            return;
        }
        self.save_undo();
        let removed = self.cut_selection(sel);
        self.store_register(removed);
        self.switch_mode(Mode::Normal);
        self.cursor.set_position(sel.start, &self.buffer, false);
        self.viewport.scroll_to(self.cursor.row());
    }

    /// Visual `p`: replace the selection with the register; the replaced
    /// text becomes the new register content.
    pub fn visual_replace(&mut self) {
        let Some(sel) = self.selection() else {
            return;
        };
        let replacement = self.register.clone();
        if replacement.is_empty() && !self.selection_has_text(sel) {
            self.switch_mode(Mode::Normal);
            return;
        }
        let whole_buffer = sel.linewise
            && sel.start.row == 0
            && sel.end.row + 1 >= self.buffer.line_count();

        self.save_undo();
        let removed = self.cut_selection(sel);
        self.switch_mode(Mode::Normal);

        let cursor = if replacement.is_empty() {
            sel.start
        } else if sel.linewise || replacement.kind() == RegisterKind::Line {
            let at = if sel.linewise {
                sel.start.row
            } else {
                sel.start.row + 1
            };
            let lines: Vec<String> = replacement.lines().into_iter().map(str::to_owned).collect();
            self.insert_lines(at, &lines, whole_buffer);
            Position::new(at, 0)
        } else {
            let text = replacement.payload();
            self.buffer.insert_at(sel.start.row, sel.start.col, text);
            last_inserted(sel.start, text)
        };

        self.store_register(removed);
        self.cursor.set_position(cursor, &self.buffer, false);
        self.viewport.scroll_to(self.cursor.row());
    }

    /// `v` / `V` inside visual mode: leave when the kind matches, switch
    /// kind otherwise.
    pub fn toggle_visual(&mut self, kind: VisualKind) {
        if self.mode == Mode::Visual(kind) {
            self.switch_mode(Mode::Normal);
        } else {
            self.switch_mode(Mode::Visual(kind));
        }
    }

    /// True when removing `sel` would change the buffer.
    fn selection_has_text(&self, sel: Selection) -> bool {
        if sel.linewise {
            !self.buffer.is_empty()
        } else {
            !self.buffer.range_is_empty(sel.start, sel.end)
        }
    }

    /// The register value for a selection. Line-wise gets the `"\n"` marker.
    ///
    /// A character-wise selection that starts on an empty line also begins
    /// with `"\n"`, so it reads back as line-wise: `P` puts it on its own
    /// line rather than splitting the current one.
    fn selection_text(&self, sel: Selection) -> String {
        if sel.linewise {
            format!("\n{}", self.buffer.get_range(sel.start, sel.end))
        } else {
            self.buffer.get_range(sel.start, sel.end)
        }
    }

    /// Remove a selection and return its register value.
    fn cut_selection(&mut self, sel: Selection) -> String {
        if sel.linewise {
            let text = self.selection_text(sel);
            self.remove_lines(sel.start.row, sel.end.row);
            text
        } else {
            self.buffer.delete_range(sel.start, sel.end)
        }
    }

    // -- Insert mode --------------------------------------------------------

    /// Type `ch` at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        let pos = self.cursor.position();
        self.save_undo();
        self.buffer
            .insert_at(pos.row, pos.col, ch.encode_utf8(&mut [0; 4]));
        self.cursor
            .set_position(pos.with_col(pos.col + 1), &self.buffer, self.past_end());
    }

    /// Insert-mode `backspace`: delete before the cursor, joining with the
    /// previous line at column 0.
    pub fn insert_backspace(&mut self) {
        let pos = self.cursor.position();
        if pos.col > 0 {
            self.save_undo();
            let at = pos.with_col(pos.col - 1);
            self.buffer.delete_range(at, at);
            self.cursor.set_position(at, &self.buffer, true);
        } else if pos.row > 0 {
            self.save_undo();
            let prev = Position::new(pos.row - 1, self.buffer.line_len(pos.row - 1));
            self.buffer.delete_range(prev, Position::new(pos.row, 0));
            self.cursor.set_position(prev, &self.buffer, true);
        }
    }

    /// Insert-mode `enter`: split the line at the cursor.
    pub fn insert_newline(&mut self) {
        let pos = self.cursor.position();
        self.save_undo();
        self.buffer.insert_at(pos.row, pos.col, "\n");
        self.cursor
            .set_position(Position::new(pos.row + 1, 0), &self.buffer, true);
        self.viewport.scroll_to(self.cursor.row());
    }

    /// Insert pasted text at the cursor, leaving the cursor after it.
    ///
    /// Line breaks are normalized and bracketed-paste markers stripped.
    pub fn insert_text(&mut self, text: &str) {
        let text = normalize_line_breaks(text);
        let text = text.strip_prefix(PASTE_START).unwrap_or(&text);
        let text = text.strip_suffix(PASTE_END).unwrap_or(text);
        if text.is_empty() {
            return;
        }
        let pos = crate::cursor::clamp(self.cursor.position(), &self.buffer, true);
        self.save_undo();
        self.buffer.insert_at(pos.row, pos.col, text);
        self.cursor
            .set_position(after_inserted(pos, text), &self.buffer, self.past_end());
        self.viewport.scroll_to(self.cursor.row());
    }

    // -- Replace mode -------------------------------------------------------

    /// Overwrite the character under the cursor (append at the line end).
    pub fn replace_char(&mut self, ch: char) {
        let pos = self.cursor.position();
        self.save_undo();
        if pos.col < self.buffer.line_len(pos.row) {
            self.buffer.delete_range(pos, pos);
        }
        self.buffer
            .insert_at(pos.row, pos.col, ch.encode_utf8(&mut [0; 4]));
        self.cursor
            .set_position(pos.with_col(pos.col + 1), &self.buffer, true);
    }

    /// Replace-mode `backspace`: step left without restoring anything,
    /// climbing to the previous line's last character at column 0.
    pub fn replace_backspace(&mut self) {
        let pos = self.cursor.position();
        let target = if pos.col > 0 {
            pos.with_col(pos.col - 1)
        } else if pos.row > 0 {
            let row = pos.row - 1;
            Position::new(row, self.buffer.line_len(row).saturating_sub(1))
        } else {
            return;
        };
        self.cursor.set_position(target, &self.buffer, true);
    }

    /// Replace-mode `enter`: start of the next line, if there is one.
    pub fn replace_newline(&mut self) {
        let row = self.cursor.row();
        if row + 1 < self.buffer.line_count() {
            self.cursor
                .set_position(Position::new(row + 1, 0), &self.buffer, true);
            self.viewport.scroll_to(row + 1);
        }
    }

    // -- Command mode -------------------------------------------------------

    /// Command-mode `backspace`. On an empty line it leaves command mode.
    pub fn command_backspace(&mut self) {
        if !self.command_line.backspace() && self.command_line.is_empty() {
            self.switch_mode(Mode::Normal);
        }
    }

    /// Command-mode `enter`: run what was typed.
    pub fn execute_command_line(&mut self) {
        let input = self.command_line.take();
        self.execute_command(&input);
    }

    /// Run an ex-command line such as `"set rnu"`.
    ///
    /// Command mode is left before the handler runs, so a handler that
    /// switches mode keeps its mode. The result's message, if any, becomes
    /// the status; an unknown name sets `"Unknown command"`.
    pub fn execute_command(&mut self, input: &str) {
        if self.mode == Mode::Command {
            self.switch_mode(Mode::Normal);
        }
        let Some((name, args)) = split_command(input) else {
            return;
        };
        let Some(handler) = self.commands.get(name) else {
            tracing::debug!(name, "unknown command");
            self.set_status("Unknown command");
            return;
        };
        tracing::debug!(name, ?args, "command");
        match handler(self, &args) {
            CommandResult::Ok(Some(message)) | CommandResult::Err(message) => {
                self.set_status(message);
            }
            CommandResult::Ok(None) => {}
        }
    }

    // -- Helpers ------------------------------------------------------------

    /// Last row of a `count`-line span starting at `first`, clamped.
    fn last_row_of(&self, first: usize, count: usize) -> usize {
        first
            .saturating_add(count.max(1) - 1)
            .min(self.buffer.line_count().saturating_sub(1))
    }

    fn line_texts(&self, first: usize, last: usize) -> Vec<String> {
        (first..=last).map(|row| self.buffer.line_text(row)).collect()
    }

    fn remove_lines(&mut self, first: usize, last: usize) {
        for _ in first..=last {
            self.buffer.delete_line(first);
        }
    }

    /// Insert `lines` so the first becomes row `at`. With `fill_empty` the
    /// buffer is known to be a single empty line, which the first line
    /// replaces instead of pushing down.
    fn insert_lines(&mut self, at: usize, lines: &[String], fill_empty: bool) {
        let mut rest = lines;
        let mut at = at;
        if fill_empty {
            if let Some((first, tail)) = lines.split_first() {
                self.buffer.set_line(0, first);
                rest = tail;
                at = 1;
            }
        }
        for (i, line) in rest.iter().enumerate() {
            self.buffer.insert_line(at + i, line);
        }
    }

    fn repeated_register_lines(&self, count: usize) -> Vec<String> {
        let once = self.register.lines();
        once.iter()
            .cycle()
            .take(once.len() * count.max(1))
            .map(|line| (*line).to_owned())
            .collect()
    }

    /// Register write plus clipboard mirror.
    fn store_register(&mut self, text: String) {
        self.register.set(text);
        self.push_clipboard();
    }

    fn push_clipboard(&mut self) {
        if !self.options.sync_clipboard {
            return;
        }
        if let Err(err) = self.clipboard.write(self.register.content()) {
            tracing::debug!(%err, "clipboard write failed");
        }
    }

    fn flash(&mut self, start: Position, end: Position, linewise: bool) {
        let lifetime = self.yank_highlight_lifetime();
        self.highlight.arm(start, end, linewise, self.now, lifetime);
    }

    fn report_yank(&mut self) {
        let message = format!("yanked {} characters", self.register.content().chars().count());
        self.set_status(message);
    }
}

/// The position just past `text` inserted at `start`.
fn after_inserted(start: Position, text: &str) -> Position {
    match text.rsplit_once('\n') {
        None => start.with_col(start.col + text.chars().count()),
        Some((head, tail)) => Position::new(
            start.row + head.matches('\n').count() + 1,
            tail.chars().count(),
        ),
    }
}

/// The position of the last character of `text` inserted at `start`.
fn last_inserted(start: Position, text: &str) -> Position {
    let end = after_inserted(start, text);
    end.with_col(end.col.saturating_sub(1))
}
