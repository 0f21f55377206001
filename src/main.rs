// SPDX-License-Identifier: MIT
//
// steep: replays vim key scripts against the query-editor engine.
//
// The engine has no terminal of its own, so this binary plays host:
//
//   script ──parse_keys──▶ tokens ──handle_key(tok, t)──▶ Editor
//                                                            │
//   stdout ◀── final buffer (+ mode, cursor, register) ◀─────┘
//
// Time is synthetic. Every key is stamped `--delay-ms` after the previous
// one, which makes sequence timeouts reproducible: a delay above the
// configured `sequence_timeout_ms` splits `dd` into two lone `d`s.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use steep_editor::{Editor, EditorOptions, Keymap, NullClipboard, parse_keys};

/// Replay a vim key script against the steep query editor
#[derive(Parser, Debug)]
#[command(name = "steep")]
#[command(version)]
#[command(about = "Replay a vim key script against the steep query editor", long_about = None)]
struct Cli {
    /// Key script in vim notation (`dd`, `<esc>`, `<c-r>`). Reads stdin when
    /// omitted or `-`.
    script: Option<PathBuf>,

    /// Initial buffer text
    #[arg(short, long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the initial buffer text from a file
    #[arg(short = 'f', long)]
    content_file: Option<PathBuf>,

    /// Editor options as TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Synthetic milliseconds between keys
    #[arg(short, long, default_value_t = 0)]
    delay_ms: u64,

    /// Print the key bindings and ex-commands, then exit
    #[arg(long)]
    list_bindings: bool,

    /// Also print mode, cursor and register after the buffer
    #[arg(long)]
    state: bool,

    /// Use an in-process clipboard that is never there
    #[arg(long)]
    no_clipboard: bool,
}

/// Log to stderr, filtered by `STEEP_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("STEEP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => EditorOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => EditorOptions::default(),
    };
    let content = initial_content(&cli)?;

    let mut editor = Editor::new(&content, options);
    if cli.no_clipboard {
        editor.set_clipboard(NullClipboard);
    }

    if cli.list_bindings {
        print!("{}", binding_table(&editor));
        return Ok(());
    }

    let script = read_script(cli.script.as_deref())?;
    let keys = replay(&mut editor, &script, Duration::from_millis(cli.delay_ms));
    tracing::info!(keys, "script replayed");

    println!("{}", editor.text());
    if cli.state {
        print!("{}", state_report(&editor));
    }
    Ok(())
}

fn initial_content(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.content {
        return Ok(text.clone());
    }
    match &cli.content_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file {}", path.display())),
        None => Ok(String::new()),
    }
}

/// The script text, minus the newline editors leave at the end of a file.
fn read_script(path: Option<&Path>) -> Result<String> {
    let mut text = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read key script {}", path.display()))?,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read key script from stdin")?;
            text
        }
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Feed every key of `script`, `delay` apart. Returns the number of keys.
fn replay(editor: &mut Editor, script: &str, delay: Duration) -> usize {
    let mut now = Instant::now();
    let tokens = parse_keys(script);
    for token in &tokens {
        now += delay;
        let effect = editor.handle_key(token, now);
        for command in effect.commands {
            tracing::info!(name = %command.name, "host command");
        }
        editor.tick(now);
    }
    tokens.len()
}

fn binding_table(editor: &Editor) -> String {
    let mut out = String::new();
    for keymap in Keymap::ALL {
        let _ = writeln!(out, "{keymap}:");
        for binding in editor.bindings(keymap) {
            let _ = writeln!(out, "  {:<12} {}", binding.keys(), binding.description);
        }
    }
    let _ = writeln!(out, "commands: {}", editor.command_names().join(" "));
    out
}

fn state_report(editor: &Editor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "mode: {}", editor.mode());
    let _ = writeln!(out, "cursor: {}", editor.cursor_position());
    let _ = writeln!(out, "register: {:?}", editor.register().content());
    if !editor.status().is_empty() {
        let _ = writeln!(out, "status: {}", editor.status());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use steep_editor::MemoryClipboard;

    fn editor(text: &str) -> Editor {
        Editor::new(text, EditorOptions::default()).with_clipboard(MemoryClipboard::new())
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["steep", "keys.txt", "--content", "abc", "--state"]).unwrap();
        assert_eq!(cli.script, Some(PathBuf::from("keys.txt")));
        assert_eq!(cli.content.as_deref(), Some("abc"));
        assert!(cli.state);
        assert_eq!(cli.delay_ms, 0);
    }

    #[test]
    fn content_sources_conflict() {
        let parsed = Cli::try_parse_from(["steep", "-c", "a", "-f", "b.sql"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn replay_counts_keys() {
        let mut ed = editor("a\nb\nc");
        assert_eq!(replay(&mut ed, "jdd", Duration::ZERO), 3);
        assert_eq!(ed.text(), "a\nc");
    }

    #[test]
    fn slow_replay_splits_sequences() {
        let mut ed = editor("a\nb");
        replay(&mut ed, "dd", Duration::from_secs(1));
        assert_eq!(ed.text(), "a\nb");
        assert_eq!(ed.pending_keys(), ["d"]);
    }

    #[test]
    fn state_report_lists_mode_cursor_register() {
        let mut ed = editor("select 1");
        replay(&mut ed, "yyA", Duration::ZERO);
        assert_eq!(
            state_report(&ed),
            "mode: INSERT\ncursor: 1:9\nregister: \"\\nselect 1\"\nstatus: yanked 9 characters\n"
        );
    }

    #[test]
    fn binding_table_covers_every_keymap() {
        let table = binding_table(&editor(""));
        for keymap in Keymap::ALL {
            assert!(table.contains(&format!("{keymap}:")));
        }
        assert!(table.contains("commands: clear reset set zr"));
    }
}
