//! Key tokens and key notation.
//!
//! The engine sees keys as string tokens, the same strings a terminal
//! toolkit reports: a printable character is itself (`"d"`, `"G"`, `"$"`),
//! named keys use lowercase names (`"esc"`, `"enter"`, `"backspace"`,
//! `"tab"`, `"up"`), chords use a `+` prefix (`"ctrl+r"`, `"alt+x"`).
//!
//! [`parse_keys`] turns Vim-style notation into tokens, which is how tests,
//! key scripts and binding tables spell sequences:
//!
//! | Notation           | Token        |
//! |--------------------|--------------|
//! | `<esc>`            | `esc`        |
//! | `<cr>`, `<enter>`  | `enter`      |
//! | `<bs>`             | `backspace`  |
//! | `<tab>`            | `tab`        |
//! | `<space>`          | `space`      |
//! | `<lt>`             | `<`          |
//! | `<up>` etc.        | `up`         |
//! | `<c-r>`            | `ctrl+r`     |
//! | `<a-x>`, `<m-x>`   | `alt+x`      |
//! | `<f5>`             | `f5`         |
//!
//! Anything else (including a `<` that does not open a known name) is one
//! token per character. A literal space in the notation is the `space` token.

// ---------------------------------------------------------------------------
// Named tokens
// ---------------------------------------------------------------------------

pub const ESC: &str = "esc";
pub const ENTER: &str = "enter";
pub const BACKSPACE: &str = "backspace";
pub const TAB: &str = "tab";
pub const SPACE: &str = "space";
pub const UP: &str = "up";
pub const DOWN: &str = "down";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";

/// The text a token types in an input mode, if it types anything.
///
/// Single characters type themselves and `space` types `' '`. Named keys and
/// chords type nothing.
#[must_use]
pub fn typed_char(token: &str) -> Option<char> {
    if token == SPACE {
        return Some(' ');
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_control() => Some(ch),
        _ => None,
    }
}

/// True for `"1"`..`"9"` (and `"0"`): tokens that can extend a count.
#[must_use]
pub fn is_digit_token(token: &str) -> bool {
    token.len() == 1 && token.as_bytes()[0].is_ascii_digit()
}

// ---------------------------------------------------------------------------
// Notation parsing
// ---------------------------------------------------------------------------

/// Split Vim-style key notation into tokens.
#[must_use]
pub fn parse_keys(notation: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = notation;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(end) = rest.find('>') {
                if let Some(token) = named_key(&rest[1..end]) {
                    tokens.push(token);
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }
        tokens.push(match ch {
            ' ' => SPACE.to_string(),
            '\t' => TAB.to_string(),
            '\n' => ENTER.to_string(),
            _ => ch.to_string(),
        });
        rest = &rest[ch.len_utf8()..];
    }
    tokens
}

/// Resolve the inside of `<...>`, or `None` if it is not a key name.
fn named_key(name: &str) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    let token = match lower.as_str() {
        "esc" => ESC,
        "cr" | "enter" | "return" => ENTER,
        "bs" | "backspace" => BACKSPACE,
        "tab" => TAB,
        "space" => SPACE,
        "lt" => "<",
        "up" => UP,
        "down" => DOWN,
        "left" => LEFT,
        "right" => RIGHT,
        "home" => "home",
        "end" => "end",
        "del" | "delete" => "delete",
        _ => return chord(&lower).or_else(|| function_key(&lower)),
    };
    Some(token.to_string())
}

/// `c-x` / `a-x` / `m-x` chords over a single character.
fn chord(name: &str) -> Option<String> {
    let (modifier, key) = name.split_once('-')?;
    let mut chars = key.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match modifier {
        "c" => Some(format!("ctrl+{ch}")),
        "a" | "m" => Some(format!("alt+{ch}")),
        _ => None,
    }
}

/// `f1`..`f24`.
fn function_key(name: &str) -> Option<String> {
    let n: u8 = name.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&n).then(|| format!("f{n}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- parse_keys ---------------------------------------------------------

    #[test]
    fn plain_characters() {
        assert_eq!(parse_keys("3dd"), vec!["3", "d", "d"]);
        assert_eq!(parse_keys(""), Vec::<String>::new());
    }

    #[test]
    fn named_keys() {
        assert_eq!(
            parse_keys("ihi<Esc>:zr<CR>"),
            vec!["i", "h", "i", "esc", ":", "z", "r", "enter"]
        );
        assert_eq!(parse_keys("<bs><tab><space><lt>"), vec!["backspace", "tab", "space", "<"]);
        assert_eq!(parse_keys("<Up><down>"), vec!["up", "down"]);
    }

    #[test]
    fn chords_and_function_keys() {
        assert_eq!(parse_keys("<C-r><a-x><M-y><F5>"), vec!["ctrl+r", "alt+x", "alt+y", "f5"]);
    }

    #[test]
    fn unknown_angle_is_literal() {
        assert_eq!(parse_keys("a<b"), vec!["a", "<", "b"]);
        assert_eq!(parse_keys("<foo>"), vec!["<", "f", "o", "o", ">"]);
    }

    #[test]
    fn whitespace_becomes_named_tokens() {
        assert_eq!(parse_keys("a b\n"), vec!["a", "space", "b", "enter"]);
    }

    #[test]
    fn unicode_characters() {
        assert_eq!(parse_keys("ié"), vec!["i", "é"]);
    }

    // -- Token helpers ------------------------------------------------------

    #[test]
    fn typed_chars() {
        assert_eq!(typed_char("a"), Some('a'));
        assert_eq!(typed_char("space"), Some(' '));
        assert_eq!(typed_char("é"), Some('é'));
        assert_eq!(typed_char("esc"), None);
        assert_eq!(typed_char("ctrl+r"), None);
        assert_eq!(typed_char(""), None);
    }

    #[test]
    fn digit_tokens() {
        assert!(is_digit_token("0"));
        assert!(is_digit_token("7"));
        assert!(!is_digit_token("a"));
        assert!(!is_digit_token("10"));
    }
}
