//! Key bindings and the binding registry.
//!
//! A [`KeyBinding`] maps a token sequence in one [`Keymap`] to a handler.
//! The registry answers the two questions dispatch asks after every key:
//!
//! - is this exact sequence bound? ([`KeyBindingRegistry::get`])
//! - could more keys still complete a binding? ([`KeyBindingRegistry::is_prefix`])
//!
//! Both are hash lookups. Sequences are literal token lists, so `"gg"` is
//! `["g", "g"]` and `"ctrl+r"` is one token.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::editor::Editor;
use crate::keys::{self, parse_keys};
use crate::mode::Keymap;

/// A key handler. The `usize` is the count typed before the keys (1 when
/// none was typed, or when the binding repeats per count).
pub type KeyHandler = Rc<dyn Fn(&mut Editor, usize)>;

// ---------------------------------------------------------------------------
// KeyBinding
// ---------------------------------------------------------------------------

/// How a binding consumes a count prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Run the handler `count` times with an argument of 1.
    #[default]
    Each,
    /// Run the handler once with `count` as its argument.
    Once,
}

/// One bound key sequence.
#[derive(Clone)]
pub struct KeyBinding {
    pub sequence: Vec<String>,
    pub keymap: Keymap,
    pub handler: KeyHandler,
    pub description: String,
    pub repeat: Repeat,
}

impl KeyBinding {
    /// Bind `notation` (Vim key notation, see [`parse_keys`]) in `keymap`.
    /// The binding repeats per count.
    #[must_use]
    pub fn new(
        notation: &str,
        keymap: Keymap,
        description: impl Into<String>,
        handler: impl Fn(&mut Editor, usize) + 'static,
    ) -> Self {
        Self {
            sequence: parse_keys(notation),
            keymap,
            handler: Rc::new(handler),
            description: description.into(),
            repeat: Repeat::Each,
        }
    }

    /// Same binding with a different count policy.
    #[must_use]
    pub const fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// The sequence joined back into one string (`"dd"`, `"ctrl+r"`).
    #[must_use]
    pub fn keys(&self) -> String {
        self.sequence.concat()
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("sequence", &self.sequence)
            .field("keymap", &self.keymap)
            .field("description", &self.description)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// All bindings, per keymap, with a prefix index.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    exact: HashMap<Keymap, HashMap<Vec<String>, KeyBinding>>,
    /// Every strict prefix of every bound sequence.
    prefixes: HashMap<Keymap, HashSet<Vec<String>>>,
}

impl KeyBindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. A binding with the same keymap and sequence is
    /// replaced and returned. Empty sequences are ignored.
    pub fn add(&mut self, binding: KeyBinding) -> Option<KeyBinding> {
        if binding.sequence.is_empty() {
            return None;
        }
        let prefixes = self.prefixes.entry(binding.keymap).or_default();
        for len in 1..binding.sequence.len() {
            prefixes.insert(binding.sequence[..len].to_vec());
        }
        self.exact
            .entry(binding.keymap)
            .or_default()
            .insert(binding.sequence.clone(), binding)
    }

    /// Remove the binding for `sequence`, returning it.
    pub fn remove(&mut self, keymap: Keymap, sequence: &[String]) -> Option<KeyBinding> {
        let removed = self.exact.get_mut(&keymap)?.remove(sequence)?;
        self.rebuild_prefixes(keymap);
        Some(removed)
    }

    /// The binding for exactly `sequence`.
    #[must_use]
    pub fn get(&self, keymap: Keymap, sequence: &[String]) -> Option<&KeyBinding> {
        self.exact.get(&keymap)?.get(sequence)
    }

    /// True if `sequence` is a strict prefix of some binding in `keymap`.
    #[must_use]
    pub fn is_prefix(&self, keymap: Keymap, sequence: &[String]) -> bool {
        self.prefixes
            .get(&keymap)
            .is_some_and(|set| set.contains(sequence))
    }

    /// Bindings in `keymap`, sorted by key text for help listings.
    #[must_use]
    pub fn bindings(&self, keymap: Keymap) -> Vec<&KeyBinding> {
        let mut list: Vec<&KeyBinding> = self
            .exact
            .get(&keymap)
            .map(|map| map.values().collect())
            .unwrap_or_default();
        list.sort_by_key(|b| b.keys());
        list
    }

    /// Total number of bindings across keymaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rebuild_prefixes(&mut self, keymap: Keymap) {
        let set: HashSet<Vec<String>> = self
            .exact
            .get(&keymap)
            .into_iter()
            .flat_map(HashMap::keys)
            .flat_map(|seq| (1..seq.len()).map(move |len| seq[..len].to_vec()))
            .collect();
        self.prefixes.insert(keymap, set);
    }
}

/// The part of a pending sequence that names a command: everything after
/// the leading count digits. A sequence of digits only is returned whole
/// (so a lone `0` can still be bound).
#[must_use]
pub fn command_part(sequence: &[String]) -> &[String] {
    let digits = sequence
        .iter()
        .take_while(|t| keys::is_digit_token(t))
        .count();
    if digits == sequence.len() {
        sequence
    } else {
        &sequence[digits..]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
