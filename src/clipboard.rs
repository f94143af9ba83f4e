//! Write-only clipboard sink.

use std::time::Duration;
#[cfg(target_os = "linux")]
use std::time::Instant;

use crate::error::CopilotError;

/// Destination for copied result text.
pub trait ClipboardSink: Send + Sync {
    /// Replaces the clipboard contents with plain text.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Clipboard`] when the platform clipboard is not
    /// reachable.
    fn write_text(&self, text: &str) -> Result<(), CopilotError>;
}

/// System clipboard accessed through `arboard`.
///
/// On Linux the process owns the X11/Wayland selection, so the copied text
/// vanishes when the process exits unless a clipboard manager has taken it.
/// A non-zero `linger` keeps serving the selection for up to that long, or
/// until another application takes ownership.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemClipboard {
    linger: Duration,
}

impl SystemClipboard {
    /// Clipboard that keeps serving each write for up to `linger`.
    #[must_use]
    pub const fn lingering(linger: Duration) -> Self {
        Self { linger }
    }

    /// How long each write keeps serving the selection.
    #[must_use]
    pub const fn linger(&self) -> Duration {
        self.linger
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), CopilotError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|error| clipboard_error(&error))?;
        set_text(&mut clipboard, text, self.linger).map_err(|error| clipboard_error(&error))
    }
}

#[cfg(target_os = "linux")]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    linger: Duration,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    if linger.is_zero() {
        return clipboard.set_text(text.to_owned());
    }
    clipboard
        .set()
        .wait_until(Instant::now() + linger)
        .text(text.to_owned())
}

#[cfg(not(target_os = "linux"))]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _linger: Duration,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_owned())
}

fn clipboard_error(error: &arboard::Error) -> CopilotError {
    CopilotError::Clipboard {
        message: error.to_string(),
    }
}

/// Clipboard that records writes in memory.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: std::sync::Mutex<Vec<String>>,
    fail: bool,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingClipboard {
    /// Creates a clipboard whose writes succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard whose writes are recorded and then reported as
    /// failed.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            writes: std::sync::Mutex::default(),
            fail: true,
        }
    }

    /// Texts written so far.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ClipboardSink for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), CopilotError> {
        self.writes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(text.to_owned());
        if self.fail {
            return Err(CopilotError::Clipboard {
                message: "clipboard unavailable".to_owned(),
            });
        }
        Ok(())
    }
}
