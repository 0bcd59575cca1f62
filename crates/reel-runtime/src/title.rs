use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::lock;

/// xterm: push the current title onto the terminal's title stack.
const PUSH_TITLE: &str = "\x1b[22;0t";
/// xterm: pop the saved title back.
const POP_TITLE: &str = "\x1b[23;0t";

/// Somewhere a window or tab title can be shown.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
}

/// Sets the terminal window title with the OSC 0 escape sequence.
///
/// The user's own title is pushed before the first change and popped back
/// when the sink is dropped.
pub struct TerminalTitle {
    out: Mutex<Box<dyn Write + Send>>,
    pushed: AtomicBool,
}

impl TerminalTitle {
    /// Writes to stderr, or nowhere if stderr is not a terminal.
    pub fn stderr() -> Self {
        if std::io::stderr().is_terminal() {
            Self::with_writer(std::io::stderr())
        } else {
            Self::with_writer(std::io::sink())
        }
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            pushed: AtomicBool::new(false),
        }
    }

    fn emit(&self, sequence: &str) {
        let mut out = lock(&self.out);
        if let Err(e) = out.write_all(sequence.as_bytes()).and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "Failed to write terminal title");
        }
    }
}

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) {
        if !self.pushed.swap(true, Ordering::SeqCst) {
            self.emit(PUSH_TITLE);
        }
        self.emit(&format!("\x1b]0;{title}\x07"));
    }
}

impl Drop for TerminalTitle {
    fn drop(&mut self) {
        if *self.pushed.get_mut() {
            self.emit(POP_TITLE);
        }
    }
}

/// Title shown while a movie's details are open.
pub fn movie_title(title: &str) -> String {
    format!("Movie | {title}")
}

/// Holds the window title until dropped, then restores the default.
pub struct TitleGuard {
    sink: Arc<dyn TitleSink>,
    restore: String,
}

impl TitleGuard {
    pub fn set(sink: Arc<dyn TitleSink>, title: &str, restore: &str) -> Self {
        sink.set_title(title);
        Self {
            sink,
            restore: restore.to_string(),
        }
    }
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.sink.set_title(&self.restore);
    }
}
