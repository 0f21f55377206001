//! Editor options: the TOML configuration and the `:set` command.
//!
//! [`EditorOptions`] is what a host passes to [`Editor::new`]. It can be
//! built in code, loaded from a TOML file, or changed at runtime through
//! `:set`. Missing TOML keys take their defaults, so a config file only lists
//! what it changes:
//!
//! ```toml
//! relative_numbers = true
//! tab_width = 2
//! ```
//!
//! # `:set` syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show numeric |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=N`  | Assign numeric value          |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! | Full name        | Abbrev | Type    | Field              |
//! |------------------|--------|---------|--------------------|
//! | `relativenumber` | `rnu`  | bool    | `relative_numbers` |
//! | `statusbar`      | `sb`   | bool    | `enable_status_bar`|
//! | `tabstop`        | `ts`   | integer | `tab_width`        |
//!
//! [`Editor::new`]: crate::editor::Editor::new

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

// ---------------------------------------------------------------------------
// EditorOptions
// ---------------------------------------------------------------------------

/// Behavior switches for one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Bind `:` in Normal and Visual mode.
    #[serde(default = "default_true")]
    pub enable_command_mode: bool,

    /// Reserve the bottom rows of the viewport for mode and status.
    #[serde(default = "default_true")]
    pub enable_status_bar: bool,

    /// Show distances instead of line numbers away from the cursor row.
    #[serde(default)]
    pub relative_numbers: bool,

    /// Columns per tab stop when mapping to screen columns.
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,

    /// Milliseconds a pending key sequence waits for its next key.
    #[serde(default = "default_sequence_timeout_ms")]
    pub sequence_timeout_ms: u64,

    /// Maximum undo depth.
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Milliseconds a yank highlight stays visible.
    #[serde(default = "default_yank_highlight_ms")]
    pub yank_highlight_ms: u64,

    /// Mirror the register to the clipboard port and read it on paste.
    #[serde(default = "default_true")]
    pub sync_clipboard: bool,

    /// Name shown in the status bar.
    #[serde(default)]
    pub file_name: Option<String>,
}

const fn default_true() -> bool {
    true
}

const fn default_tab_width() -> u8 {
    4
}

const fn default_sequence_timeout_ms() -> u64 {
    750
}

const fn default_undo_limit() -> usize {
    crate::history::DEFAULT_UNDO_LIMIT
}

const fn default_yank_highlight_ms() -> u64 {
    100
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            enable_command_mode: true,
            enable_status_bar: true,
            relative_numbers: false,
            tab_width: default_tab_width(),
            sequence_timeout_ms: default_sequence_timeout_ms(),
            undo_limit: default_undo_limit(),
            yank_highlight_ms: default_yank_highlight_ms(),
            sync_clipboard: true,
            file_name: None,
        }
    }
}

impl EditorOptions {
    /// Parse options from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`OptionsError::Parse`] if the text is not valid TOML for this shape.
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    ///
    /// [`OptionsError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// [`OptionsError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, OptionsError> {
        Ok(toml::to_string(self)?)
    }

    /// Apply one `:set` directive.
    ///
    /// Returns the text to show in the status bar, if any (queries and
    /// listings produce one, plain assignments do not).
    ///
    /// # Errors
    ///
    /// [`OptionsError::UnknownOption`] for names outside the table above,
    /// [`OptionsError::InvalidValue`] for bad assignments or for using a
    /// boolean form on a numeric option.
    pub fn apply_set(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionsError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => {
                let option = OptionName::parse(name)?;
                Ok(Some(self.describe(option)))
            }
            SetDirective::Assign(name, value) => {
                let option = OptionName::parse(name)?;
                let invalid = || OptionsError::InvalidValue {
                    name: name.clone(),
                    value: value.clone(),
                };
                match option {
                    OptionName::TabStop => {
                        let width: u8 = value.parse().map_err(|_| invalid())?;
                        if width == 0 {
                            return Err(invalid());
                        }
                        self.tab_width = width;
                        Ok(None)
                    }
                    OptionName::RelativeNumber | OptionName::StatusBar => Err(invalid()),
                }
            }
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let changed: Vec<String> = OptionName::ALL
                    .iter()
                    .filter(|&&option| self.describe(option) != defaults.describe(option))
                    .map(|&option| self.describe(option))
                    .collect();
                Ok(Some(changed.join("  ")))
            }
            SetDirective::ShowAll => {
                let all: Vec<String> = OptionName::ALL
                    .iter()
                    .map(|&option| self.describe(option))
                    .collect();
                Ok(Some(all.join("  ")))
            }
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionsError> {
        let slot = match OptionName::parse(name)? {
            OptionName::RelativeNumber => &mut self.relative_numbers,
            OptionName::StatusBar => &mut self.enable_status_bar,
            OptionName::TabStop => {
                return Err(OptionsError::InvalidValue {
                    name: name.to_string(),
                    value: String::new(),
                });
            }
        };
        *slot = f(*slot);
        Ok(())
    }

    /// `name` / `noname` for booleans, `name=N` for numbers.
    fn describe(&self, option: OptionName) -> String {
        match option {
            OptionName::RelativeNumber => format_bool(option.full_name(), self.relative_numbers),
            OptionName::StatusBar => format_bool(option.full_name(), self.enable_status_bar),
            OptionName::TabStop => format!("{}={}", option.full_name(), self.tab_width),
        }
    }
}

// ---------------------------------------------------------------------------
// Option names
// ---------------------------------------------------------------------------

/// An option reachable through `:set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionName {
    RelativeNumber,
    StatusBar,
    TabStop,
}

impl OptionName {
    const ALL: [Self; 3] = [Self::RelativeNumber, Self::StatusBar, Self::TabStop];

    fn parse(name: &str) -> Result<Self, OptionsError> {
        match name {
            "relativenumber" | "rnu" => Ok(Self::RelativeNumber),
            "statusbar" | "sb" => Ok(Self::StatusBar),
            "tabstop" | "ts" => Ok(Self::TabStop),
            _ => Err(OptionsError::UnknownOption(name.to_string())),
        }
    }

    const fn full_name(self) -> &'static str {
        match self {
            Self::RelativeNumber => "relativenumber",
            Self::StatusBar => "statusbar",
            Self::TabStop => "tabstop",
        }
    }
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "relativenumber" | "rnu" | "statusbar" | "sb")
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(name, "tabstop" | "ts")
}

// ---------------------------------------------------------------------------
// `:set` parsing
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`: enable a boolean option.
    On(String),

    /// `:set nooption`: disable a boolean option.
    Off(String),

    /// `:set option!`: toggle a boolean option.
    Toggle(String),

    /// `:set option?`: query the current value.
    Query(String),

    /// `:set option=value`: assign a value.
    Assign(String, String),

    /// `:set` with no arguments: show changed options.
    ShowChanged,

    /// `:set all`: show all options.
    ShowAll,
}

/// Parse the words after `:set` into directives.
///
/// Several arguments are allowed (`:set rnu ts=2`). No arguments produce
/// [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set<S: AsRef<str>>(args: &[S]) -> Vec<SetDirective> {
    if args.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    args.iter().map(|arg| parse_set_arg(arg.as_ref())).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Only a known boolean after the prefix counts as negation.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    // A bare numeric option shows its value, as in Vim.
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option: `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
