//! Key routing.
//!
//! Normal and Visual collect keys into a [`KeySequence`] and resolve it
//! against the binding registry after every key:
//!
//! 1. A pending sequence older than the timeout is flushed first: run if it
//!    names a binding, dropped otherwise. The new key is then handled
//!    normally.
//! 2. Count digits accumulate (`1`-`9` start a count, any digit extends one
//!    while only digits are pending).
//! 3. The keys after the count are looked up. An exact match runs; a strict
//!    prefix waits for more keys.
//! 4. Anything else falls back to the last key alone, and is dropped if that
//!    is not bound either.
//!
//! Insert, Replace and Command look up single keys only. An unbound key that
//! types a character is inserted, overwritten or added to the command line.
//!
//! [`KeySequence`]: crate::sequence::KeySequence

use std::rc::Rc;
use std::time::Instant;

use super::{Editor, Effect};
use crate::keymap::{KeyHandler, Repeat, command_part};
use crate::keys::typed_char;
use crate::mode::{Keymap, Mode};

impl Editor {
    /// Handle one key token at time `now`.
    ///
    /// Tokens are the strings [`parse_keys`](crate::keys::parse_keys)
    /// produces: `"j"`, `"esc"`, `"ctrl+r"`. A blurred editor ignores keys
    /// and returns an empty effect.
    pub fn handle_key(&mut self, token: &str, now: Instant) -> Effect {
        if !self.focused {
            return Effect::default();
        }
        self.now = now;
        tracing::trace!(token, mode = %self.mode, "key");

        if self.mode.keymap().uses_sequences()
            && self.sequence.timed_out(now, self.sequence_timeout())
        {
            self.flush_sequence();
        }

        let keymap = self.mode.keymap();
        if keymap.uses_sequences() {
            self.dispatch_sequence(keymap, token);
        } else {
            self.dispatch_input(keymap, token);
        }

        self.clamp_cursor();
        self.viewport.scroll_to(self.cursor.row());
        self.take_effect()
    }

    /// Run the pending sequence if it names a binding, then drop it.
    fn flush_sequence(&mut self) {
        let keymap = self.mode.keymap();
        let count = self.sequence.count();
        let found = self.lookup(keymap, command_part(self.sequence.keys()));
        tracing::trace!(keys = ?self.sequence.keys(), matched = found.is_some(), "sequence timed out");
        self.sequence.clear();
        if let Some((handler, repeat)) = found {
            self.run(&handler, repeat, count);
        }
    }

    fn dispatch_sequence(&mut self, keymap: Keymap, token: &str) {
        self.sequence.touch(self.now);
        if self.sequence.push_count_digit(token) {
            return;
        }
        self.sequence.push(token);

        let count = self.sequence.count();
        let keys = self.sequence.keys();
        let command = command_part(keys);

        let found = self.lookup(keymap, command).or_else(|| {
            if command.len() == keys.len() {
                None
            } else {
                self.lookup(keymap, keys)
            }
        });
        if let Some((handler, repeat)) = found {
            self.sequence.clear();
            self.run(&handler, repeat, count);
            return;
        }

        if self.keymaps.is_prefix(keymap, command) {
            return;
        }

        self.sequence.retain_last();
        let found = self.lookup(keymap, self.sequence.keys());
        if found.is_none() {
            tracing::trace!(keys = %self.sequence.keys().concat(), "unbound sequence dropped");
        }
        self.sequence.clear();
        if let Some((handler, repeat)) = found {
            self.run(&handler, repeat, count);
        }
    }

    fn dispatch_input(&mut self, keymap: Keymap, token: &str) {
        if let Some((handler, repeat)) = self.lookup(keymap, &[token.to_string()]) {
            self.run(&handler, repeat, 1);
            return;
        }
        let Some(ch) = typed_char(token) else {
            tracing::trace!(token, "unbound key ignored");
            return;
        };
        match self.mode {
            Mode::Insert => self.insert_char(ch),
            Mode::Replace => self.replace_char(ch),
            Mode::Command => self.command_line.insert_char(ch),
            Mode::Normal | Mode::Visual(_) => {}
        }
    }

    fn lookup(&self, keymap: Keymap, keys: &[String]) -> Option<(KeyHandler, Repeat)> {
        self.keymaps
            .get(keymap, keys)
            .map(|binding| (Rc::clone(&binding.handler), binding.repeat))
    }

    fn run(&mut self, handler: &KeyHandler, repeat: Repeat, count: usize) {
        match repeat {
            Repeat::Each => {
                for _ in 0..count {
                    handler(self, 1);
                }
            }
            Repeat::Once => handler(self, count),
        }
    }
}
