//! Default key bindings and built-in ex-commands.
//!
//! | Keymap         | Keys                                                    |
//! |----------------|---------------------------------------------------------|
//! | Normal, Visual | `h j k l` arrows `w b space 0 ^ $ gg G`                 |
//! | Normal         | `i a A I o O R v V :` `x D dd yy p P u ctrl+r diw yiw ciw` |
//! | Visual         | `esc v V : y d x p`                                     |
//! | Insert         | `esc backspace tab enter` arrows                        |
//! | Replace        | `esc backspace enter` arrows                            |
//! | Command        | `esc enter backspace left right`                        |
//!
//! Motions and the edits that take a count as an argument (`x`, `dd`, `yy`,
//! `p`, `P`) run once per key with the count. Undo and redo run once per
//! count. `:` is only bound when command mode is enabled.

use super::{Editor, Motion};
use crate::command::CommandResult;
use crate::keymap::{KeyBinding, Repeat};
use crate::mode::{Keymap, Mode, VisualKind};
use crate::options::parse_set;

const MOTIONS: &[(&str, Motion, &str)] = &[
    ("h", Motion::Left, "Move cursor left"),
    ("j", Motion::Down, "Move cursor down"),
    ("k", Motion::Up, "Move cursor up"),
    ("l", Motion::Right, "Move cursor right"),
    ("<left>", Motion::Left, "Move cursor left"),
    ("<down>", Motion::Down, "Move cursor down"),
    ("<up>", Motion::Up, "Move cursor up"),
    ("<right>", Motion::Right, "Move cursor right"),
    ("w", Motion::WordForward, "Move to next word"),
    ("b", Motion::WordBackward, "Move to previous word"),
    ("<space>", Motion::NextChar, "Move cursor right"),
    ("0", Motion::LineStart, "Move to start of line"),
    ("^", Motion::FirstNonBlank, "Move to first non-blank character"),
    ("$", Motion::LineEnd, "Move to end of line"),
    ("gg", Motion::FirstLine, "Move to document start"),
    ("G", Motion::LastLine, "Move to document end"),
];

const ARROWS: &[(&str, Motion, &str)] = &[
    ("<left>", Motion::Left, "Move cursor left"),
    ("<down>", Motion::Down, "Move cursor down"),
    ("<up>", Motion::Up, "Move cursor up"),
    ("<right>", Motion::Right, "Move cursor right"),
];

/// Install every default binding and command.
pub(super) fn install(editor: &mut Editor) {
    for keymap in [Keymap::Normal, Keymap::Visual] {
        add_motions(editor, keymap, MOTIONS);
    }
    for keymap in [Keymap::Insert, Keymap::Replace] {
        add_motions(editor, keymap, ARROWS);
    }
    install_normal(editor);
    install_visual(editor);
    install_input(editor);
    install_command_line(editor);
    install_commands(editor);
}

fn add(
    editor: &mut Editor,
    keys: &str,
    keymap: Keymap,
    repeat: Repeat,
    description: &str,
    handler: impl Fn(&mut Editor, usize) + 'static,
) {
    editor
        .keymaps
        .add(KeyBinding::new(keys, keymap, description, handler).with_repeat(repeat));
}

fn add_motions(editor: &mut Editor, keymap: Keymap, table: &[(&str, Motion, &str)]) {
    for &(keys, motion, description) in table {
        add(editor, keys, keymap, Repeat::Once, description, move |ed, count| {
            ed.apply_motion(motion, count);
        });
    }
}

// -- Normal ------------------------------------------------------------------

fn install_normal(editor: &mut Editor) {
    use Repeat::{Each, Once};
    let n = Keymap::Normal;

    add(editor, "i", n, Once, "Enter insert mode", |ed, _| {
        ed.switch_mode(Mode::Insert);
    });
    add(editor, "R", n, Once, "Enter replace mode", |ed, _| {
        ed.switch_mode(Mode::Replace);
    });
    add(editor, "v", n, Once, "Enter visual mode", |ed, _| {
        ed.switch_mode(Mode::VISUAL);
    });
    add(editor, "V", n, Once, "Enter visual line mode", |ed, _| {
        ed.switch_mode(Mode::VISUAL_LINE);
    });
    if editor.options.enable_command_mode {
        add(editor, ":", n, Once, "Enter command mode", |ed, _| {
            ed.switch_mode(Mode::Command);
        });
    }

    add(editor, "a", n, Once, "Append after cursor", |ed, _| ed.append());
    add(editor, "A", n, Once, "Append at end of line", |ed, _| {
        ed.append_at_line_end();
    });
    add(editor, "I", n, Once, "Insert at start of line", |ed, _| {
        ed.insert_at_line_start();
    });
    add(editor, "o", n, Once, "Open line below", |ed, _| ed.open_line_below());
    add(editor, "O", n, Once, "Open line above", |ed, _| ed.open_line_above());

    add(editor, "x", n, Once, "Delete character at cursor", |ed, count| {
        ed.delete_chars(count);
    });
    add(editor, "D", n, Once, "Delete to end of line", |ed, _| {
        ed.delete_to_line_end();
    });
    add(editor, "dd", n, Once, "Delete line", |ed, count| ed.delete_lines(count));
    add(editor, "yy", n, Once, "Yank line", |ed, count| ed.yank_lines(count));
    add(editor, "p", n, Once, "Paste after cursor", |ed, count| {
        ed.paste_after(count);
    });
    add(editor, "P", n, Once, "Paste before cursor", |ed, count| {
        ed.paste_before(count);
    });

    add(editor, "u", n, Each, "Undo", |ed, _| {
        ed.undo();
    });
    add(editor, "<c-r>", n, Each, "Redo", |ed, _| {
        ed.redo();
    });

    add(editor, "diw", n, Once, "Delete inner word", |ed, _| {
        ed.delete_inner_word();
    });
    add(editor, "yiw", n, Once, "Yank inner word", |ed, _| ed.yank_inner_word());
    add(editor, "ciw", n, Once, "Change inner word", |ed, _| {
        ed.change_inner_word();
    });
}

// -- Visual ------------------------------------------------------------------

fn install_visual(editor: &mut Editor) {
    let v = Keymap::Visual;
    let once = Repeat::Once;

    add(editor, "<esc>", v, once, "Exit visual mode", |ed, _| {
        ed.switch_mode(Mode::Normal);
    });
    add(editor, "v", v, once, "Toggle visual mode", |ed, _| {
        ed.toggle_visual(VisualKind::Char);
    });
    add(editor, "V", v, once, "Toggle visual line mode", |ed, _| {
        ed.toggle_visual(VisualKind::Line);
    });
    if editor.options.enable_command_mode {
        add(editor, ":", v, once, "Enter command mode", |ed, _| {
            ed.switch_mode(Mode::Command);
        });
    }
    add(editor, "y", v, once, "Yank selection", |ed, _| ed.visual_yank());
    add(editor, "d", v, once, "Delete selection", |ed, _| ed.visual_delete());
    add(editor, "x", v, once, "Delete selection", |ed, _| ed.visual_delete());
    add(editor, "p", v, once, "Replace with yanked text", |ed, _| {
        ed.visual_replace();
    });
}

// -- Insert and Replace --------------------------------------------------------

fn install_input(editor: &mut Editor) {
    let once = Repeat::Once;
    let (i, r) = (Keymap::Insert, Keymap::Replace);

    add(editor, "<esc>", i, once, "Exit insert mode", |ed, _| {
        ed.switch_mode(Mode::Normal);
    });
    add(editor, "<bs>", i, once, "Backspace", |ed, _| ed.insert_backspace());
    add(editor, "<tab>", i, once, "Tab", |ed, _| ed.insert_char('\t'));
    add(editor, "<cr>", i, once, "Enter", |ed, _| ed.insert_newline());

    add(editor, "<esc>", r, once, "Exit replace mode", |ed, _| {
        ed.switch_mode(Mode::Normal);
    });
    add(editor, "<bs>", r, once, "Backspace", |ed, _| ed.replace_backspace());
    add(editor, "<cr>", r, once, "Enter", |ed, _| ed.replace_newline());
}

// -- Command line --------------------------------------------------------------

fn install_command_line(editor: &mut Editor) {
    let c = Keymap::Command;
    let once = Repeat::Once;

    add(editor, "<esc>", c, once, "Exit command mode", |ed, _| {
        ed.switch_mode(Mode::Normal);
    });
    add(editor, "<cr>", c, once, "Execute command", |ed, _| {
        ed.execute_command_line();
    });
    add(editor, "<bs>", c, once, "Backspace", |ed, _| ed.command_backspace());
    add(editor, "<left>", c, once, "Move left", |ed, _| {
        ed.command_line.move_left();
    });
    add(editor, "<right>", c, once, "Move right", |ed, _| {
        ed.command_line.move_right();
    });
}

// -- Ex-commands ---------------------------------------------------------------

fn install_commands(editor: &mut Editor) {
    editor.add_command("zr", |ed, _| {
        ed.options.relative_numbers = !ed.options.relative_numbers;
        let state = if ed.options.relative_numbers { "on" } else { "off" };
        CommandResult::message(format!("relative line numbers: {state}"))
    });

    editor.add_command("clear", |ed, _| {
        ed.buffer_mut().clear();
        CommandResult::message("buffer cleared")
    });

    editor.add_command("reset", |ed, _| {
        ed.reset();
        CommandResult::done()
    });

    editor.add_command("set", |ed, args| {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            match ed.options.apply_set(&directive) {
                Ok(Some(text)) => shown.push(text),
                Ok(None) => {}
                Err(err) => return CommandResult::Err(err.to_string()),
            }
        }
        ed.refresh_viewport();
        if shown.is_empty() {
            CommandResult::done()
        } else {
            CommandResult::message(shown.join("  "))
        }
    });
}
