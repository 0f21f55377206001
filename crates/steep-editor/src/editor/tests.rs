use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;
use crate::clipboard::{ClipboardPort, MemoryClipboard};
use crate::error::ClipboardError;
use crate::keymap::Repeat;
use crate::keys::parse_keys;

// ── Helpers ───────────────────────────────────────────────────────────

/// An editor over `text` with an in-memory clipboard.
fn editor_with(text: &str) -> Editor {
    Editor::new(text, EditorOptions::default()).with_clipboard(MemoryClipboard::new())
}

/// An editor plus a handle on its clipboard.
fn editor_and_clipboard(text: &str) -> (Editor, MemoryClipboard) {
    let clipboard = MemoryClipboard::new();
    let ed = Editor::new(text, EditorOptions::default()).with_clipboard(clipboard.clone());
    (ed, clipboard)
}

/// Feed keys 1 ms apart, well inside the sequence timeout. Returns the
/// effect of the last key.
fn feed(ed: &mut Editor, notation: &str) -> Effect {
    let mut effect = Effect::default();
    for token in parse_keys(notation) {
        let now = ed.now + Duration::from_millis(1);
        effect = ed.handle_key(&token, now);
    }
    effect
}

fn lines(ed: &Editor) -> Vec<String> {
    ed.buffer().lines()
}

fn cursor(ed: &Editor) -> (usize, usize) {
    let pos = ed.cursor_position();
    (pos.row, pos.col)
}

// ── Counts and sequences ──────────────────────────────────────────────

#[test]
fn dd_deletes_line_into_register() {
    let mut ed = editor_with("a\nb\nc");
    feed(&mut ed, "dd");
    assert_eq!(lines(&ed), vec!["b", "c"]);
    assert_eq!(ed.register().content(), "\na");
}

#[test]
fn count_moves_down() {
    let mut ed = editor_with("l0\nl1\nl2\nl3\nl4");
    feed(&mut ed, "3j");
    assert_eq!(cursor(&ed), (3, 0));
}

#[test]
fn count_resets_after_binding() {
    let mut ed = editor_with("l0\nl1\nl2\nl3\nl4");
    feed(&mut ed, "3jj");
    assert_eq!(cursor(&ed), (4, 0));
}

#[test]
fn zero_extends_count_and_clamps() {
    let mut ed = editor_with("l0\nl1\nl2\nl3\nl4");
    feed(&mut ed, "10j");
    assert_eq!(cursor(&ed), (4, 0));
}

#[test]
fn lone_zero_is_line_start() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "$");
    assert_eq!(cursor(&ed), (0, 2));
    feed(&mut ed, "0");
    assert_eq!(cursor(&ed), (0, 0));
}

#[test]
fn count_dd_is_one_undo_step() {
    let mut ed = editor_with("a\nb\nc\nd");
    feed(&mut ed, "3dd");
    assert_eq!(lines(&ed), vec!["d"]);
    assert_eq!(ed.register().content(), "\na\nb\nc");
    feed(&mut ed, "u");
    assert_eq!(ed.text(), "a\nb\nc\nd");
}

#[test]
fn count_x_is_one_register_value() {
    let mut ed = editor_with("abcdef");
    feed(&mut ed, "3x");
    assert_eq!(ed.text(), "def");
    assert_eq!(ed.register().content(), "abc");
    feed(&mut ed, "u");
    assert_eq!(ed.text(), "abcdef");
}

#[test]
fn pending_keys_are_visible() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "2d");
    assert_eq!(ed.pending_keys(), ["2", "d"]);
    assert!(ed.view().status_text().contains("2d"));
    feed(&mut ed, "<esc>");
    assert!(ed.pending_keys().is_empty());
}

#[test]
fn unbound_pair_falls_back_to_last_key() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "gx");
    assert_eq!(ed.text(), "bc");
}

#[test]
fn unbound_key_drops_sequence_and_count() {
    let mut ed = editor_with("abcd");
    feed(&mut ed, "3qx");
    assert_eq!(ed.text(), "bcd");
}

#[test]
fn stalled_sequence_is_dropped_and_new_key_counts() {
    let mut ed = editor_with("a\nb");
    let t0 = ed.now;
    ed.handle_key("d", t0 + Duration::from_millis(1));
    ed.handle_key("d", t0 + Duration::from_secs(1));
    assert_eq!(lines(&ed), vec!["a", "b"]);
    assert_eq!(ed.pending_keys(), ["d"]);

    ed.handle_key("d", t0 + Duration::from_millis(1010));
    assert_eq!(lines(&ed), vec!["b"]);
}

#[test]
fn stalled_sequence_runs_when_bound() {
    let mut ed = editor_with("a\nb");
    let t0 = ed.now;
    ed.handle_key("g", t0 + Duration::from_millis(1));
    ed.add_binding("g", Mode::Normal, |ed, _| ed.set_status("g ran"), "test");

    ed.handle_key("j", t0 + Duration::from_secs(2));
    assert_eq!(ed.status(), "g ran");
    assert_eq!(cursor(&ed), (1, 0));
}

#[test]
fn each_binding_runs_per_count() {
    let calls = Rc::new(Cell::new(Vec::new()));
    let seen = Rc::clone(&calls);
    let mut ed = editor_with("");
    ed.add_binding(
        "Q",
        Mode::Normal,
        move |_, count| {
            let mut all = seen.take();
            all.push(count);
            seen.set(all);
        },
        "test",
    );
    feed(&mut ed, "3Q");
    assert_eq!(calls.take(), vec![1, 1, 1]);
}

#[test]
fn once_binding_gets_count() {
    let last = Rc::new(Cell::new(0));
    let seen = Rc::clone(&last);
    let mut ed = editor_with("");
    ed.add_binding_with(
        KeyBinding::new("Q", Keymap::Normal, "test", move |_, count| seen.set(count))
            .with_repeat(Repeat::Once),
    );
    feed(&mut ed, "12Q");
    assert_eq!(last.get(), 12);
}

// ── Modes ─────────────────────────────────────────────────────────────

#[test]
fn normal_clamps_after_insert() {
    let mut ed = editor_with("abc");
    let effect = feed(&mut ed, "A");
    assert_eq!(effect.mode_changed, Some(Mode::Insert));
    assert_eq!(cursor(&ed), (0, 3));
    feed(&mut ed, "<esc>");
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(cursor(&ed), (0, 2));
}

#[test]
fn append_and_insert_at_start() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "a");
    assert_eq!(cursor(&ed), (0, 1));
    feed(&mut ed, "<esc>$I");
    assert_eq!(cursor(&ed), (0, 0));
    assert_eq!(ed.mode(), Mode::Insert);
}

#[test]
fn open_lines() {
    let mut ed = editor_with("a\nb");
    feed(&mut ed, "o");
    assert_eq!(lines(&ed), vec!["a", "", "b"]);
    assert_eq!(cursor(&ed), (1, 0));
    assert_eq!(ed.mode(), Mode::Insert);

    let mut ed = editor_with("a");
    feed(&mut ed, "O");
    assert_eq!(lines(&ed), vec!["", "a"]);
    assert_eq!(cursor(&ed), (0, 0));
}

#[test]
fn visual_kinds_toggle() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "v");
    assert_eq!(ed.mode(), Mode::VISUAL);
    assert_eq!(ed.status(), "-- VISUAL --");
    feed(&mut ed, "V");
    assert_eq!(ed.mode(), Mode::VISUAL_LINE);
    assert_eq!(ed.status(), "-- VISUAL LINE --");
    feed(&mut ed, "V");
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(ed.status(), "");
    assert_eq!(ed.selection(), None);
}

#[test]
fn selection_is_normalized() {
    let mut ed = editor_with("abcdef");
    ed.set_cursor_position(0, 4);
    feed(&mut ed, "vhh");
    let sel = ed.selection().unwrap();
    assert_eq!(sel.start, Position::new(0, 2));
    assert_eq!(sel.end, Position::new(0, 4));
    assert!(!sel.linewise);
}

#[test]
fn line_selection_spans_whole_rows() {
    let mut ed = editor_with("ab\ncdef");
    feed(&mut ed, "lVj");
    let sel = ed.selection().unwrap();
    assert_eq!(sel.start, Position::new(0, 0));
    assert_eq!(sel.end, Position::new(1, 3));
    assert!(sel.linewise);
}

#[test]
fn set_mode_reports_effect() {
    let mut ed = editor_with("abc");
    let effect = ed.set_mode(Mode::VISUAL);
    assert_eq!(effect.mode_changed, Some(Mode::VISUAL));
    assert_eq!(effect.status.as_deref(), Some("-- VISUAL --"));
    assert!(ed.selection().is_some());
}

#[test]
fn blurred_editor_ignores_keys() {
    let mut ed = editor_with("abc");
    ed.blur();
    assert!(feed(&mut ed, "x").is_empty());
    assert_eq!(ed.text(), "abc");
    ed.focus();
    feed(&mut ed, "x");
    assert_eq!(ed.text(), "bc");
}

#[test]
fn normal_clamp_holds_through_a_session() {
    let mut ed = editor_with("select *\nfrom users\n\nwhere id = 1");
    let keys = "$jjjkx0wwbDG$ggyyp3xu<c-r>vjjd$P";
    for token in parse_keys(keys) {
        let now = ed.now + Duration::from_millis(1);
        ed.handle_key(&token, now);
        let pos = ed.cursor_position();
        assert!(pos.row < ed.buffer().line_count(), "after {token}");
        if !ed.mode().cursor_past_end() {
            let max = ed.buffer().line_len(pos.row).saturating_sub(1);
            assert!(pos.col <= max, "after {token}: {pos:?}");
        }
    }
}

// ── Yank, delete, paste ───────────────────────────────────────────────

#[test]
fn line_visual_yank() {
    let mut ed = editor_with("l0\nl1\nl2");
    feed(&mut ed, "Vjy");
    assert_eq!(ed.register().content(), "\nl0\nl1");
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(ed.status(), "yanked 6 characters");
    assert_eq!(cursor(&ed), (0, 0));
    let region = ed.yank_highlight().region().unwrap();
    assert_eq!(region.start, Position::new(0, 0));
    assert_eq!(region.end, Position::new(1, 1));
}

#[test]
fn char_visual_yank() {
    let mut ed = editor_with("hello world");
    feed(&mut ed, "vlly");
    assert_eq!(ed.register().content(), "hel");
    assert_eq!(ed.status(), "yanked 3 characters");
    assert_eq!(cursor(&ed), (0, 0));
}

#[test]
fn yank_line_mirrors_clipboard() {
    let (mut ed, clipboard) = editor_and_clipboard("select 1");
    feed(&mut ed, "yy");
    assert_eq!(clipboard.contents().as_deref(), Some("\nselect 1"));
    assert_eq!(ed.status(), "yanked 9 characters");
    assert!(ed.yank_highlight().is_active());
}

#[test]
fn yank_highlight_expires() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "yy");
    let at = ed.now;
    assert!(!ed.tick(at + Duration::from_millis(50)));
    assert!(ed.tick(at + Duration::from_millis(100)));
    assert!(!ed.yank_highlight().is_active());
}

#[test]
fn clipboard_sync_can_be_disabled() {
    let clipboard = MemoryClipboard::new();
    let options = EditorOptions {
        sync_clipboard: false,
        ..EditorOptions::default()
    };
    let mut ed = Editor::new("abc", options).with_clipboard(clipboard.clone());
    feed(&mut ed, "yy");
    assert_eq!(clipboard.contents(), None);
    clipboard.set_contents("zzz");
    feed(&mut ed, "p");
    assert_eq!(lines(&ed), vec!["abc", "abc"]);
}

#[test]
fn shift_d_deletes_to_line_end() {
    let mut ed = editor_with("select * from t");
    ed.set_cursor_position(0, 8);
    feed(&mut ed, "D");
    assert_eq!(ed.text(), "select *");
    assert_eq!(ed.register().content(), " from t");
    assert_eq!(cursor(&ed), (0, 7));
}

#[test]
fn x_on_empty_line_saves_nothing() {
    let mut ed = editor_with("");
    feed(&mut ed, "x");
    assert!(!ed.buffer().can_undo());
    assert!(ed.register().is_empty());
}

#[test]
fn paste_after_char() {
    let mut ed = editor_with("ab cd");
    feed(&mut ed, "yiw$p");
    assert_eq!(ed.text(), "ab cdab");
    assert_eq!(cursor(&ed), (0, 6));
}

#[test]
fn paste_before_char() {
    let mut ed = editor_with("xyz");
    ed.apply_clipboard_update("foo");
    feed(&mut ed, "P");
    assert_eq!(ed.text(), "fooxyz");
    assert_eq!(cursor(&ed), (0, 2));
}

#[test]
fn paste_lines_below_and_above() {
    let mut ed = editor_with("a\nb");
    feed(&mut ed, "yyjp");
    assert_eq!(lines(&ed), vec!["a", "b", "a"]);
    assert_eq!(cursor(&ed), (2, 0));

    let mut ed = editor_with("a\nb");
    feed(&mut ed, "jyyggP");
    assert_eq!(lines(&ed), vec!["b", "a", "b"]);
    assert_eq!(cursor(&ed), (0, 0));
}

#[test]
fn paste_count_repeats() {
    let mut ed = editor_with("a");
    feed(&mut ed, "yy2p");
    assert_eq!(lines(&ed), vec!["a", "a", "a"]);
}

/// A clipboard that refuses writes and always reads the same old text.
struct StaleClipboard;

impl ClipboardPort for StaleClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        Ok("STALE".to_string())
    }

    fn write(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[test]
fn paste_comes_from_register_not_clipboard() {
    let mut ed = Editor::new("abc\ndef", EditorOptions::default()).with_clipboard(StaleClipboard);
    feed(&mut ed, "yyp");
    assert_eq!(lines(&ed), vec!["abc", "abc", "def"]);
    assert_eq!(ed.register().content(), "\nabc");
}

#[test]
fn external_clipboard_text_arrives_through_update() {
    let (mut ed, clipboard) = editor_and_clipboard("ab");
    clipboard.set_contents("ignored");
    ed.apply_clipboard_update("x\r\ny");
    feed(&mut ed, "p");
    assert_eq!(lines(&ed), vec!["ax", "yb"]);
    assert_eq!(cursor(&ed), (1, 0));
    assert_eq!(ed.register().content(), "x\ny");
}

#[test]
fn paste_with_empty_register_does_nothing() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "p");
    assert_eq!(ed.text(), "abc");
    assert!(!ed.buffer().can_undo());
}

#[test]
fn visual_delete_char() {
    let mut ed = editor_with("abcdef");
    feed(&mut ed, "lvld");
    assert_eq!(ed.text(), "adef");
    assert_eq!(ed.register().content(), "bc");
    assert_eq!(cursor(&ed), (0, 1));
}

#[test]
fn visual_delete_lines() {
    let mut ed = editor_with("a\nb\nc");
    feed(&mut ed, "jVd");
    assert_eq!(lines(&ed), vec!["a", "c"]);
    assert_eq!(ed.register().content(), "\nb");
    assert_eq!(cursor(&ed), (1, 0));

    let mut ed = editor_with("a\nb");
    feed(&mut ed, "Vjd");
    assert_eq!(lines(&ed), vec![""]);
    assert_eq!(ed.register().content(), "\na\nb");
}

#[test]
fn visual_replace_swaps_register() {
    let mut ed = editor_with("foo bar");
    feed(&mut ed, "yiw");
    ed.set_cursor_position(0, 4);
    feed(&mut ed, "vllp");
    assert_eq!(ed.text(), "foo foo");
    assert_eq!(ed.register().content(), "bar");
    assert_eq!(cursor(&ed), (0, 6));
}

#[test]
fn visual_replace_whole_lines() {
    let mut ed = editor_with("a\nb");
    ed.apply_clipboard_update("\nx\ny");
    feed(&mut ed, "Vjp");
    assert_eq!(lines(&ed), vec!["x", "y"]);
    assert_eq!(ed.register().content(), "\na\nb");
}

// ── Inner word ────────────────────────────────────────────────────────

#[test]
fn yank_inner_word_reports_word() {
    let mut ed = editor_with("foo.bar baz");
    feed(&mut ed, "yiw");
    assert_eq!(ed.register().content(), "foo");
    assert_eq!(ed.status(), "yanked word: foo");

    ed.set_cursor_position(0, 3);
    feed(&mut ed, "yiw");
    assert_eq!(ed.register().content(), ".");
}

#[test]
fn delete_inner_word() {
    let mut ed = editor_with("select foo.bar from t");
    ed.set_cursor_position(0, 8);
    feed(&mut ed, "diw");
    assert_eq!(ed.text(), "select .bar from t");
    assert_eq!(ed.register().content(), "foo");
    assert_eq!(cursor(&ed), (0, 7));
}

#[test]
fn change_inner_word() {
    let mut ed = editor_with("select foo.bar from t");
    ed.set_cursor_position(0, 7);
    feed(&mut ed, "ciwbaz<esc>");
    assert_eq!(ed.text(), "select baz.bar from t");
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn inner_word_on_empty_line_is_noop() {
    let mut ed = editor_with("");
    feed(&mut ed, "diw");
    assert!(!ed.buffer().can_undo());
    assert!(ed.register().is_empty());
}

// ── Undo / redo ───────────────────────────────────────────────────────

#[test]
fn undo_redo_status() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "x");
    feed(&mut ed, "u");
    assert_eq!(ed.text(), "abc");
    assert_eq!(ed.status(), "Undo");
    feed(&mut ed, "u");
    assert_eq!(ed.status(), "Already at oldest change");
    feed(&mut ed, "<c-r>");
    assert_eq!(ed.text(), "bc");
    assert_eq!(ed.status(), "Redo");
    feed(&mut ed, "<c-r>");
    assert_eq!(ed.status(), "Already at newest change");
}

#[test]
fn undo_restores_cursor() {
    let mut ed = editor_with("abc\ndef");
    feed(&mut ed, "jdd");
    assert_eq!(cursor(&ed), (0, 0));
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["abc", "def"]);
    assert_eq!(cursor(&ed), (1, 0));
}

#[test]
fn dd_on_lone_empty_line_records_nothing() {
    let mut ed = editor_with("");
    feed(&mut ed, "dd");
    assert_eq!(ed.buffer().undo_depth(), 0);
    assert_eq!(ed.register().content(), "\n");
    feed(&mut ed, "u");
    assert_eq!(ed.status(), "Already at oldest change");
}

#[test]
fn visual_delete_of_nothing_records_nothing() {
    let mut ed = editor_with("");
    feed(&mut ed, "Vd");
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(ed.buffer().undo_depth(), 0);
}

#[test]
fn host_edits_that_change_nothing_keep_redo() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "xu");
    assert!(ed.buffer().can_redo());

    ed.buffer_mut().insert_at(99, 0, "zzz");
    ed.buffer_mut().insert_at(0, 1, "");
    assert_eq!(ed.buffer_mut().delete_at(5, 0, 5, 2), "");
    ed.set_content("abc");

    assert_eq!(ed.text(), "abc");
    assert_eq!(ed.buffer().undo_depth(), 0);
    assert!(ed.buffer().can_redo());
}

#[test]
fn clearing_an_empty_buffer_records_nothing() {
    let mut ed = editor_with("");
    ed.buffer_mut().clear();
    assert!(!ed.buffer().can_undo());
}

#[test]
fn charwise_yank_from_empty_line_reads_as_lines() {
    let mut ed = editor_with("\nabc");
    feed(&mut ed, "vjy");
    assert_eq!(ed.register().content(), "\na");
    assert_eq!(ed.register().kind(), crate::register::RegisterKind::Line);
    feed(&mut ed, "P");
    assert_eq!(lines(&ed), vec!["a", "", "abc"]);
}

// ── Insert and Replace ────────────────────────────────────────────────

#[test]
fn typing_in_insert_mode() {
    let mut ed = editor_with("");
    feed(&mut ed, "ihello world<esc>");
    assert_eq!(ed.text(), "hello world");
    assert_eq!(cursor(&ed), (0, 10));
}

#[test]
fn insert_backspace_joins_lines() {
    let mut ed = editor_with("ab\ncd");
    ed.set_cursor_position(1, 0);
    feed(&mut ed, "i<bs>");
    assert_eq!(ed.text(), "abcd");
    assert_eq!(cursor(&ed), (0, 2));
    feed(&mut ed, "<bs>");
    assert_eq!(ed.text(), "acd");
    assert_eq!(cursor(&ed), (0, 1));
}

#[test]
fn insert_enter_splits_and_tab_inserts() {
    let mut ed = editor_with("abcd");
    feed(&mut ed, "lli<cr>");
    assert_eq!(lines(&ed), vec!["ab", "cd"]);
    assert_eq!(cursor(&ed), (1, 0));
    feed(&mut ed, "<tab>");
    assert_eq!(lines(&ed), vec!["ab", "\tcd"]);
    assert_eq!(cursor(&ed), (1, 1));
}

#[test]
fn insert_text_pastes_lines() {
    let mut ed = editor_with("ab");
    feed(&mut ed, "a");
    ed.insert_text("x\r\ny");
    assert_eq!(lines(&ed), vec!["ax", "yb"]);
    assert_eq!(cursor(&ed), (1, 1));

    ed.insert_text("\x1b[200~hi\x1b[201~");
    assert_eq!(lines(&ed), vec!["ax", "yhib"]);
}

#[test]
fn replace_overwrites_then_appends() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "Rxyzw<esc>");
    assert_eq!(ed.text(), "xyzw");
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn replace_backspace_and_enter_only_move() {
    let mut ed = editor_with("abc\nde");
    feed(&mut ed, "lR<bs>");
    assert_eq!(cursor(&ed), (0, 0));
    feed(&mut ed, "<cr>");
    assert_eq!(cursor(&ed), (1, 0));
    feed(&mut ed, "<bs>");
    assert_eq!(cursor(&ed), (0, 2));
    assert_eq!(ed.text(), "abc\nde");
}

// ── Command mode ──────────────────────────────────────────────────────

#[test]
fn zr_toggles_relative_numbers() {
    let mut ed = editor_with("abc");
    let effect = feed(&mut ed, ":zr<cr>");
    assert!(ed.options().relative_numbers);
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(effect.mode_changed, Some(Mode::Normal));
    assert_eq!(effect.status.as_deref(), Some("relative line numbers: on"));
    feed(&mut ed, ":zr<cr>");
    assert_eq!(ed.status(), "relative line numbers: off");
}

#[test]
fn unknown_command() {
    let mut ed = editor_with("abc");
    feed(&mut ed, ":nope<cr>");
    assert_eq!(ed.status(), "Unknown command");
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn clear_is_undoable() {
    let mut ed = editor_with("a\nb");
    feed(&mut ed, "j:clear<cr>");
    assert_eq!(lines(&ed), vec![""]);
    assert_eq!(cursor(&ed), (0, 0));
    assert_eq!(ed.status(), "buffer cleared");
    feed(&mut ed, "u");
    assert_eq!(ed.text(), "a\nb");
}

#[test]
fn reset_restores_initial_content() {
    let mut ed = editor_with("abc");
    feed(&mut ed, "x:reset<cr>");
    assert_eq!(ed.text(), "abc");
    assert!(ed.register().is_empty());
    assert!(!ed.buffer().can_undo());
    assert_eq!(cursor(&ed), (0, 0));
    assert_eq!(ed.status(), "Editor reset");
}

#[test]
fn set_command() {
    let mut ed = editor_with("abc");
    feed(&mut ed, ":set ts=2<cr>");
    assert_eq!(ed.options().tab_width, 2);
    feed(&mut ed, ":set ts?<cr>");
    assert_eq!(ed.status(), "tabstop=2");
    feed(&mut ed, ":set bogus<cr>");
    assert_eq!(ed.status(), "Unknown option: bogus");
}

#[test]
fn command_backspace_on_empty_line_leaves() {
    let mut ed = editor_with("abc");
    feed(&mut ed, ":s<bs>");
    assert_eq!(ed.mode(), Mode::Command);
    assert!(ed.command_line().is_empty());
    feed(&mut ed, "<bs>");
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn custom_command_gets_args() {
    let mut ed = editor_with("");
    ed.add_command("echo", |_, args| CommandResult::message(args.join(",")));
    feed(&mut ed, ":echo a b<cr>");
    assert_eq!(ed.status(), "a,b");
}

#[test]
fn command_that_switches_mode_keeps_it() {
    let mut ed = editor_with("");
    ed.add_command("ins", |ed, _| {
        ed.switch_mode(Mode::Insert);
        CommandResult::done()
    });
    feed(&mut ed, ":ins<cr>");
    assert_eq!(ed.mode(), Mode::Insert);
}

#[test]
fn command_mode_disabled() {
    let options = EditorOptions {
        enable_command_mode: false,
        ..EditorOptions::default()
    };
    let mut ed = Editor::new("abc", options).with_clipboard(MemoryClipboard::new());
    feed(&mut ed, ":");
    assert_eq!(ed.mode(), Mode::Normal);
}

// ── Host surface ──────────────────────────────────────────────────────

#[test]
fn bindings_can_emit_host_commands() {
    let mut ed = editor_with("select 1");
    ed.add_binding("<c-e>", Mode::Normal, |ed, _| ed.emit("execute"), "Run query");
    let effect = feed(&mut ed, "<c-e>");
    assert_eq!(
        effect.commands,
        vec![HostCommand {
            name: "execute".to_string()
        }]
    );
    assert!(feed(&mut ed, "l").commands.is_empty());
}

#[test]
fn set_content_is_undoable() {
    let mut ed = editor_with("abc");
    ed.set_cursor_position(0, 2);
    ed.set_content("x\r\ny");
    assert_eq!(lines(&ed), vec!["x", "y"]);
    assert_eq!(cursor(&ed), (0, 0));
    feed(&mut ed, "u");
    assert_eq!(ed.text(), "abc");
}

#[test]
fn buffer_handle_edits_are_undoable() {
    let mut ed = editor_with("select 1");
    ed.buffer_mut().insert_at(0, 0, "-- ");
    assert_eq!(ed.text(), "-- select 1");
    let removed = ed.buffer_mut().delete_at(0, 0, 0, 2);
    assert_eq!(removed, "-- ");
    assert!(ed.buffer_mut().can_undo());
    assert!(ed.buffer_mut().undo());
    assert!(ed.buffer_mut().undo());
    assert_eq!(ed.text(), "select 1");
    assert!(!ed.buffer_mut().undo());
    assert!(ed.buffer_mut().can_redo());
}

#[test]
fn viewport_follows_cursor() {
    let text: Vec<String> = (0..10).map(|i| format!("l{i}")).collect();
    let mut ed = editor_with(&text.join("\n"));
    ed.set_viewport_height(5);
    assert_eq!(ed.viewport().height, 3);
    feed(&mut ed, "G");
    assert_eq!(ed.viewport().top, 7);
    assert_eq!(ed.view().visible_rows(), 7..10);
    feed(&mut ed, ":set nostatusbar<cr>");
    assert_eq!(ed.viewport().height, 5);
    feed(&mut ed, "gg");
    assert_eq!(ed.viewport().top, 0);
}

#[test]
fn view_reflects_state() {
    let mut ed = editor_with("ab\ncd");
    feed(&mut ed, "vj");
    let view = ed.view();
    assert_eq!(view.mode, Mode::VISUAL);
    assert_eq!(view.cursor, Position::new(1, 0));
    assert_eq!(view.selection_span(0), Some(0..2));
    assert_eq!(view.selection_span(1), Some(0..1));
    assert!(view.focused);
}

#[test]
fn bindings_listing() {
    let ed = editor_with("");
    let keys: Vec<String> = ed.bindings(Mode::Insert).iter().map(|b| b.keys()).collect();
    assert_eq!(
        keys,
        vec!["backspace", "down", "enter", "esc", "left", "right", "tab", "up"]
    );
}
