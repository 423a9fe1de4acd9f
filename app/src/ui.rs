//! User-facing output: modal alerts and status lines.

use std::io::Write;
use std::sync::{Arc, Mutex};

pub const MSG_INVALID_ACCESS: &str = "Invalid access. Please navigate from the resource page.";
pub const MSG_EMPTY_URL: &str = "Please enter a valid URL.";
pub const MSG_NOT_LOADED: &str = "Background image not loaded yet. Please wait and try again.";
pub const MSG_QR_UNAVAILABLE: &str =
    "QRCode library not loaded. Please check your internet connection or reload the page.";
pub const MSG_NOTHING_GENERATED: &str = "Generate a flyer first.";
pub const MSG_CLIPBOARD_UNSUPPORTED: &str = "This browser does not support copying images to clipboard. Please use a modern browser with clipboard support.";
pub const MSG_INSTALL_UNAVAILABLE: &str = "Install is not available.";

pub fn background_missing(page_type: &str) -> String {
    format!("Background image not found for type: {page_type}")
}

/// Where the page session reports to the user.
pub trait PageUi {
    /// A blocking, must-read message (the page's `alert()`).
    fn alert(&self, message: &str);

    /// Informational output: breadcrumbs, button feedback, notifications.
    fn status(&self, message: &str);
}

/// Terminal UI: alerts and status lines on stdout.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl PageUi for ConsoleUi {
    fn alert(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[!] {message}");
        let _ = out.flush();
    }

    fn status(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{message}");
        let _ = out.flush();
    }
}

/// One recorded line from [`RecordingUi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiLine {
    Alert(String),
    Status(String),
}

/// Captures everything shown, for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    lines: Arc<Mutex<Vec<UiLine>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<UiLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                UiLine::Alert(msg) => Some(msg),
                UiLine::Status(_) => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                UiLine::Status(msg) => Some(msg),
                UiLine::Alert(_) => None,
            })
            .collect()
    }

    fn push(&self, line: UiLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl PageUi for RecordingUi {
    fn alert(&self, message: &str) {
        self.push(UiLine::Alert(message.to_string()));
    }

    fn status(&self, message: &str) {
        self.push(UiLine::Status(message.to_string()));
    }
}
