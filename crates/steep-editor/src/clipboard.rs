//! Clipboard port: where the yank register is mirrored.
//!
//! The engine never talks to the OS clipboard directly. It holds a
//! [`ClipboardPort`] and calls `write` synchronously after every yank or
//! delete. Failures are logged at debug level and otherwise ignored. Pastes
//! always come from the register.
//!
//! | Port                | Backing                      | Use                      |
//! |---------------------|------------------------------|--------------------------|
//! | [`SystemClipboard`] | `arboard` (feature-gated)    | Real terminal sessions   |
//! | [`MemoryClipboard`] | shared in-process string     | Tests, embedding hosts   |
//! | [`NullClipboard`]   | nothing                      | Headless, `--no-clipboard`|
//!
//! A host that wants to notice clipboard changes made by other programs can
//! run a [`ClipboardWatcher`] and feed what it reports to
//! [`Editor::apply_clipboard_update`](crate::editor::Editor::apply_clipboard_update).

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::ClipboardError;

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A text clipboard.
pub trait ClipboardPort {
    /// Current clipboard text.
    ///
    /// # Errors
    ///
    /// [`ClipboardError`] when nothing can be read.
    fn read(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard text.
    ///
    /// # Errors
    ///
    /// [`ClipboardError`] when the write is refused.
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

/// The OS clipboard via `arboard`.
///
/// The connection is opened on first use and reopened after a failure, so
/// a session that starts without a display can still pick one up later.
#[cfg(feature = "system-clipboard")]
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    #[must_use]
    pub const fn new() -> Self {
        Self { inner: None }
    }

    fn connection(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|err| {
                tracing::debug!(%err, "system clipboard unavailable");
                ClipboardError::Unavailable
            })?;
            self.inner = Some(clipboard);
        }
        self.inner.as_mut().ok_or(ClipboardError::Unavailable)
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardPort for SystemClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        let result = self.connection()?.get_text();
        result.map_err(|err| {
            self.inner = None;
            ClipboardError::Backend(err.to_string())
        })
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        let result = self.connection()?.set_text(text.to_owned());
        result.map_err(|err| {
            self.inner = None;
            ClipboardError::Backend(err.to_string())
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.inner.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MemoryClipboard
// ---------------------------------------------------------------------------

/// An in-process clipboard. Clones share the same slot, so a host or test
/// can keep one handle and give another to the editor.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that already holds `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(text.into()))),
        }
    }

    /// What the clipboard holds, if anything was ever written.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Overwrite the slot, as another program would.
    pub fn set_contents(&self, text: impl Into<String>) {
        *self.slot.borrow_mut() = Some(text.into());
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        self.contents().ok_or(ClipboardError::Unavailable)
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.set_contents(text);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NullClipboard
// ---------------------------------------------------------------------------

/// A clipboard that is never there.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClipboard;

impl ClipboardPort for NullClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    fn write(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// The port a default editor gets: the OS clipboard when compiled in,
/// nothing otherwise.
#[must_use]
pub fn default_port() -> Box<dyn ClipboardPort> {
    #[cfg(feature = "system-clipboard")]
    {
        Box::new(SystemClipboard::new())
    }
    #[cfg(not(feature = "system-clipboard"))]
    {
        Box::new(NullClipboard)
    }
}

// ---------------------------------------------------------------------------
// ClipboardWatcher
// ---------------------------------------------------------------------------

/// Background poller reporting clipboard changes.
///
/// Spawns a thread that reads a port every `interval` and sends the text
/// through a channel whenever it differs from the last reading. The port is
/// built inside the thread, so it never has to be `Send`. The thread runs
/// until [`stop`](Self::stop) is called, the watcher is dropped, or the
/// receiver goes away.
pub struct ClipboardWatcher {
    /// The poller thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag to signal the thread to exit.
    stop: Arc<AtomicBool>,
}

impl ClipboardWatcher {
    /// Spawn the poller.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<F, P>(make_port: F, interval: Duration) -> io::Result<(Self, Receiver<String>)>
    where
        F: FnOnce() -> P + Send + 'static,
        P: ClipboardPort,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("clipboard-watcher".into())
            .spawn(move || {
                let mut port = make_port();
                Self::poll_loop(&mut port, &tx, &stop_flag, interval);
            })?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the poller to stop and wait for it to exit. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }

    fn poll_loop(
        port: &mut dyn ClipboardPort,
        tx: &mpsc::Sender<String>,
        stop: &AtomicBool,
        interval: Duration,
    ) {
        let mut last: Option<String> = None;
        while !stop.load(Ordering::Relaxed) {
            match port.read() {
                Ok(text) if last.as_deref() != Some(text.as_str()) => {
                    if tx.send(text.clone()).is_err() {
                        break;
                    }
                    last = Some(text);
                }
                Ok(_) => {}
                Err(err) => tracing::trace!(%err, "clipboard poll failed"),
            }
            thread::park_timeout(interval);
        }
    }
}

impl Drop for ClipboardWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ClipboardWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardWatcher")
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A port shareable across threads, standing in for another program
    /// writing to the clipboard.
    #[derive(Clone, Default)]
    struct SharedPort(Arc<Mutex<Option<String>>>);

    impl ClipboardPort for SharedPort {
        fn read(&mut self) -> Result<String, ClipboardError> {
            self.0.lock().unwrap().clone().ok_or(ClipboardError::Unavailable)
        }

        fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
            *self.0.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    // ── Ports ────────────────────────────────────────────────────────────

    #[test]
    fn memory_clones_share_slot() {
        let host = MemoryClipboard::new();
        let mut port = host.clone();
        assert!(matches!(port.read(), Err(ClipboardError::Unavailable)));
        port.write("select 1").unwrap();
        assert_eq!(host.contents().as_deref(), Some("select 1"));
        host.set_contents("\nfrom t");
        assert_eq!(port.read().unwrap(), "\nfrom t");
    }

    #[test]
    fn memory_with_text() {
        let mut port = MemoryClipboard::with_text("x");
        assert_eq!(port.read().unwrap(), "x");
    }

    #[test]
    fn null_is_unavailable() {
        let mut port = NullClipboard;
        assert!(port.read().is_err());
        assert!(port.write("x").is_err());
    }

    // ── Watcher ──────────────────────────────────────────────────────────

    #[test]
    fn watcher_reports_changes_once() {
        let shared = SharedPort::default();
        let mut writer = shared.clone();
        writer.write("first").unwrap();

        let (mut watcher, rx) =
            ClipboardWatcher::spawn(move || shared, Duration::from_millis(5)).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "first");

        writer.write("second").unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "second");

        watcher.stop();
        // Nothing new was written, so nothing else was reported.
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut watcher, _rx) =
            ClipboardWatcher::spawn(|| NullClipboard, Duration::from_millis(5)).unwrap();
        watcher.stop();
        watcher.stop();
    }

    #[test]
    fn channel_closes_on_stop() {
        let (mut watcher, rx) =
            ClipboardWatcher::spawn(|| NullClipboard, Duration::from_millis(5)).unwrap();
        watcher.stop();
        assert!(rx.recv().is_err());
    }
}
