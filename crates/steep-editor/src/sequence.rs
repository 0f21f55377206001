//! Pending key sequence and count prefix.
//!
//! Normal and Visual keymaps collect keys until they name a binding. The
//! [`KeySequence`] holds those keys, the count typed in front of them, and
//! when the last key arrived so that a stalled sequence can be flushed.
//!
//! Count digits stay in the sequence as typed (`["1", "2", "j"]`); the
//! parsed count is tracked alongside.

use std::time::{Duration, Instant};

use crate::keys::is_digit_token;

/// Counts stop growing here.
pub const MAX_COUNT: usize = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence {
    keys: Vec<String>,
    count: usize,
    last_key: Option<Instant>,
}

impl KeySequence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: Vec::new(),
            count: 1,
            last_key: None,
        }
    }

    /// The pending tokens, count digits included.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The count to run the next binding with (1 when none was typed).
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when keys are pending and the last one arrived more than
    /// `timeout` before `now`.
    #[must_use]
    pub fn timed_out(&self, now: Instant, timeout: Duration) -> bool {
        !self.keys.is_empty()
            && self
                .last_key
                .is_some_and(|last| now.saturating_duration_since(last) > timeout)
    }

    /// Record that a key arrived at `now`.
    pub const fn touch(&mut self, now: Instant) {
        self.last_key = Some(now);
    }

    /// Try to consume `token` as a count digit.
    ///
    /// `1`..`9` start a count on an empty sequence; any digit extends it
    /// while everything pending is a digit. A lone `0` is not a count (it
    /// is the line-start motion). Returns `true` when consumed.
    pub fn push_count_digit(&mut self, token: &str) -> bool {
        if !is_digit_token(token) {
            return false;
        }
        let digit = usize::from(token.as_bytes()[0] - b'0');
        if self.keys.is_empty() {
            if digit == 0 {
                return false;
            }
            self.count = digit;
        } else if self.keys.iter().all(|k| is_digit_token(k)) {
            self.count = self.count.saturating_mul(10).saturating_add(digit).min(MAX_COUNT);
        } else {
            return false;
        }
        self.keys.push(token.to_string());
        true
    }

    /// Append a non-count token.
    pub fn push(&mut self, token: &str) {
        self.keys.push(token.to_string());
    }

    /// Keep only the last token (the last-key fallback). The count stays.
    pub fn retain_last(&mut self) {
        if self.keys.len() > 1 {
            self.keys.drain(..self.keys.len() - 1);
        }
    }

    /// Drop pending keys and the count.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.count = 1;
    }
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_count_one() {
        let seq = KeySequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.count(), 1);
    }

    #[test]
    fn digits_build_count() {
        let mut seq = KeySequence::new();
        assert!(seq.push_count_digit("1"));
        assert!(seq.push_count_digit("2"));
        assert_eq!(seq.count(), 12);
        assert_eq!(seq.keys(), ["1", "2"]);
    }

    #[test]
    fn leading_zero_is_not_a_count() {
        let mut seq = KeySequence::new();
        assert!(!seq.push_count_digit("0"));
        assert!(seq.is_empty());
    }

    #[test]
    fn zero_extends_count() {
        let mut seq = KeySequence::new();
        seq.push_count_digit("2");
        assert!(seq.push_count_digit("0"));
        assert_eq!(seq.count(), 20);
    }

    #[test]
    fn digit_after_command_key_is_not_a_count() {
        let mut seq = KeySequence::new();
        seq.push("d");
        assert!(!seq.push_count_digit("3"));
        assert_eq!(seq.count(), 1);
    }

    #[test]
    fn count_saturates() {
        let mut seq = KeySequence::new();
        for _ in 0..8 {
            seq.push_count_digit("9");
        }
        assert_eq!(seq.count(), MAX_COUNT);
    }

    #[test]
    fn retain_last_keeps_count() {
        let mut seq = KeySequence::new();
        seq.push_count_digit("3");
        seq.push("q");
        seq.push("x");
        seq.retain_last();
        assert_eq!(seq.keys(), ["x"]);
        assert_eq!(seq.count(), 3);
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.count(), 1);
    }

    #[test]
    fn timeout_needs_pending_keys() {
        let start = Instant::now();
        let timeout = Duration::from_millis(750);
        let mut seq = KeySequence::new();
        seq.touch(start);
        assert!(!seq.timed_out(start + Duration::from_secs(5), timeout));

        seq.push("d");
        assert!(!seq.timed_out(start + Duration::from_millis(750), timeout));
        assert!(seq.timed_out(start + Duration::from_millis(751), timeout));
    }
}
