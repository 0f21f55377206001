//! # steep-editor: modal editing engine for the steep query editor
//!
//! A vim-flavoured editor over one text buffer, with no terminal of its own.
//! The host feeds key tokens in and paints what [`Editor::view`] returns:
//!
//! - **[`editor`]**: `Editor`, the engine a host embeds, and its `Effect`s
//! - **[`buffer`]**: `Buffer`, a rope of lines with end-inclusive range edits
//! - **[`history`]**: snapshot undo/redo with a bounded depth
//! - **[`cursor`]**: `Cursor` movement clamped to the buffer and the mode
//! - **[`mode`]**: `Mode` and the `Keymap` each mode reads bindings from
//! - **[`keys`]** / **[`keymap`]** / **[`sequence`]**: key notation, the
//!   binding registry and the pending multi-key sequence with its count
//! - **[`command`]**: ex-commands (`:set`, `:zr`, ...) and the command line
//! - **[`register`]** / **[`clipboard`]**: the yank register and the
//!   system clipboard it mirrors
//! - **[`options`]**: `EditorOptions`, from TOML or `:set`
//! - **[`view`]** / **[`highlight`]**: what a renderer needs for a frame
//!
//! ```
//! use std::time::Instant;
//! use steep_editor::{Editor, EditorOptions, MemoryClipboard};
//!
//! let mut ed = Editor::new("select 1\nfrom t", EditorOptions::default())
//!     .with_clipboard(MemoryClipboard::new());
//! let now = Instant::now();
//! ed.handle_key("d", now);
//! ed.handle_key("d", now);
//! assert_eq!(ed.text(), "from t");
//! ```

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod history;
pub mod keymap;
pub mod keys;
pub mod mode;
pub mod options;
pub mod position;
pub mod register;
pub mod sequence;
pub mod view;
pub mod word;

pub use buffer::Buffer;
pub use clipboard::{ClipboardPort, ClipboardWatcher, MemoryClipboard, NullClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use command::CommandResult;
pub use editor::{BufferHandle, Editor, Effect, HostCommand, Motion};
pub use error::{ClipboardError, OptionsError};
pub use keymap::{KeyBinding, Repeat};
pub use keys::parse_keys;
pub use mode::{CursorShape, Keymap, Mode, VisualKind};
pub use options::EditorOptions;
pub use position::{Position, Selection};
pub use register::{RegisterKind, YankRegister};
pub use view::{ViewState, Viewport};
