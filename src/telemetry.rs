//! Submission telemetry events and sinks.
//!
//! Events describe how each submission cycle ended. They are never
//! transmitted anywhere; the stderr sink exists for local debugging.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the request controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Input validation rejected the submission before any network call.
    SubmissionRejected {
        /// User-facing reason.
        reason: String,
    },
    /// The analysis service returned a result.
    SubmissionSucceeded {
        /// Time from submission to resolution, in milliseconds.
        latency_ms: u64,
    },
    /// The analysis service call failed.
    SubmissionFailed {
        /// Time from submission to resolution, in milliseconds.
        latency_ms: u64,
        /// HTTP status, when a response was received.
        status: Option<u16>,
    },
    /// A submission arrived while another was still in flight.
    SubmissionIgnored,
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Writes each event as one JSON line.
///
/// Write failures are dropped: telemetry never interrupts a submission.
#[derive(Debug)]
pub struct JsonlTelemetrySink<W> {
    writer: Mutex<W>,
}

/// JSON-lines sink on the process's stderr, enabled by `--telemetry`.
pub type StderrJsonlTelemetrySink = JsonlTelemetrySink<io::Stderr>;

impl<W: Write + Send> JsonlTelemetrySink<W> {
    /// Wraps `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StderrJsonlTelemetrySink {
    /// Sink writing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TelemetrySink for JsonlTelemetrySink<W> {
    fn record(&self, event: TelemetryEvent) {
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(writer, "{line}") {
            tracing::debug!("dropping telemetry event: {error}");
        }
    }
}

/// Sink that keeps events in memory.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingTelemetrySink {
    /// Removes and returns the recorded events.
    #[must_use]
    pub fn take(&self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
