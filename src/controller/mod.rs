//! Request-lifecycle controller.
//!
//! [`RequestController`] owns the [`Session`] and drives one submission
//! cycle at a time:
//!
//! ```text
//! Idle -> Validating -> (Rejected | Submitting) -> (Succeeded | Failed) -> Idle
//! ```
//!
//! The view calls the controller's operations and observes the outcome via
//! [`RequestController::session`] snapshots. Timed behaviour (progress ticks,
//! the progress reset grace delay and the copy confirmation) runs as Tokio
//! tasks on the runtime the controller was built on. Delayed resets carry
//! the generation that scheduled them and do nothing once a newer cycle or
//! copy has started.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::analysis::{AnalysisRequest, AnalysisService};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::error::CopilotError;
use crate::session::{ProgressEstimate, Session, Theme};
use crate::storage::{KeyValueStore, StorageKey};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

mod cycle;
mod jitter;

use cycle::SubmissionCycle;
#[cfg(any(test, feature = "test-support"))]
pub use jitter::FixedJitter;
pub use jitter::{ProgressJitter, RandomJitter};

/// Default period between progress ticks.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(400);
/// Default delay between resolution and the progress reset.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
/// Default duration of the copy confirmation.
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(1500);

/// Timing of the controller's scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerTimings {
    /// Period between progress ticks while a request is outstanding.
    pub progress_interval: Duration,
    /// Delay after resolution before progress returns to zero.
    pub settle_delay: Duration,
    /// How long `is_copied` stays set after a copy.
    pub copy_feedback: Duration,
}

impl Default for ControllerTimings {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            copy_feedback: DEFAULT_COPY_FEEDBACK,
        }
    }
}

/// Where the current or most recent submission cycle stands.
///
/// `Rejected`, `Succeeded`, `Failed` and `Cancelled` are idle phases that
/// remember how the last cycle ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// No cycle has run yet.
    #[default]
    Idle,
    /// Inputs are being checked.
    Validating,
    /// Inputs failed validation; no request was sent.
    Rejected,
    /// The analysis request is outstanding.
    Submitting,
    /// The service returned a result.
    Succeeded,
    /// The service call failed.
    Failed,
    /// The submission was dropped before it resolved.
    Cancelled,
}

impl SubmissionPhase {
    /// Whether no cycle is in flight.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        !matches!(self, Self::Validating | Self::Submitting)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ControllerState {
    session: Session,
    phase: SubmissionPhase,
    cycle_generation: u64,
    copy_generation: u64,
}

pub(crate) type SharedState = Arc<Mutex<ControllerState>>;

pub(crate) fn lock_state(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the session and runs submission cycles against the collaborators.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct RequestController {
    state: SharedState,
    service: Arc<dyn AnalysisService>,
    store: Arc<dyn KeyValueStore>,
    clipboard: Arc<dyn ClipboardSink>,
    jitter: Arc<dyn ProgressJitter>,
    telemetry: Arc<dyn TelemetrySink>,
    timings: ControllerTimings,
    runtime: Handle,
}

impl std::fmt::Debug for RequestController {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RequestController")
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl RequestController {
    /// Starts building a controller around the two required collaborators.
    #[must_use]
    pub fn builder(
        service: Arc<dyn AnalysisService>,
        store: Arc<dyn KeyValueStore>,
    ) -> RequestControllerBuilder {
        RequestControllerBuilder {
            service,
            store,
            clipboard: Arc::new(SystemClipboard::default()),
            jitter: Arc::new(RandomJitter),
            telemetry: Arc::new(NoopTelemetrySink),
            timings: ControllerTimings::default(),
        }
    }

    /// Returns a snapshot of the session.
    #[must_use]
    pub fn session(&self) -> Session {
        lock_state(&self.state).session.clone()
    }

    /// Returns the phase of the current or most recent cycle.
    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        lock_state(&self.state).phase
    }

    /// Timings used by scheduled tasks.
    #[must_use]
    pub const fn timings(&self) -> ControllerTimings {
        self.timings
    }

    /// Updates the repository URL input and persists it.
    pub fn set_repository_url(&self, value: impl Into<String>) {
        let stored = value.into();
        lock_state(&self.state)
            .session
            .set_repository_url(stored.clone());
        self.persist(StorageKey::RepoUrl, &stored);
    }

    /// Updates the raw pull request number input and persists it.
    pub fn set_pull_request_number(&self, value: impl Into<String>) {
        let stored = value.into();
        lock_state(&self.state)
            .session
            .set_pull_request_number(stored.clone());
        self.persist(StorageKey::PrNumber, &stored);
    }

    /// Flips the theme, persists it, and returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut guard = lock_state(&self.state);
            let next = guard.session.theme().toggled();
            guard.session.set_theme(next);
            next
        };
        self.persist(StorageKey::Theme, theme.as_str());
        theme
    }

    /// Runs one submission cycle to completion.
    ///
    /// Validation failures and service failures are reported through the
    /// session's error message; nothing is returned. Calls made while a
    /// cycle is in flight are ignored. Dropping the returned future before
    /// it resolves cancels the cycle and returns the session to idle with
    /// neither a result nor an error.
    pub async fn submit_analysis(&self) {
        let Some(cycle) = SubmissionCycle::try_start(
            &self.state,
            &self.runtime,
            Arc::clone(&self.jitter),
            self.timings.progress_interval,
        ) else {
            tracing::debug!("analysis already in flight; ignoring submission");
            self.telemetry.record(TelemetryEvent::SubmissionIgnored);
            return;
        };

        let (repository_url, pull_request_number) = {
            let guard = lock_state(&self.state);
            (
                guard.session.repository_url().to_owned(),
                guard.session.pull_request_number().to_owned(),
            )
        };

        let request = match AnalysisRequest::from_inputs(&repository_url, &pull_request_number) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!("rejecting submission: {error}");
                self.telemetry.record(TelemetryEvent::SubmissionRejected {
                    reason: error.user_message(),
                });
                cycle.reject(&error);
                return;
            }
        };

        cycle.mark_submitting();
        let outcome = self.service.analyze(&request).await;

        let latency_ms = u64::try_from(cycle.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.telemetry.record(match &outcome {
            Ok(_) => TelemetryEvent::SubmissionSucceeded { latency_ms },
            Err(error) => TelemetryEvent::SubmissionFailed {
                latency_ms,
                status: failure_status(error),
            },
        });
        if let Err(error) = &outcome {
            tracing::warn!("analysis request failed: {error}");
        }

        let generation = cycle.generation();
        cycle.resolve(outcome);
        self.schedule_progress_reset(generation);
    }

    /// Copies the result text to the clipboard and shows the confirmation.
    ///
    /// The text is empty when there is no result. Clipboard failures are
    /// logged; the confirmation is shown either way.
    pub fn copy_result_to_clipboard(&self) {
        let text = self.session().result_text().unwrap_or_default();
        if let Err(error) = self.clipboard.write_text(&text) {
            tracing::warn!("failed to copy analysis result: {error}");
        }

        let generation = {
            let mut guard = lock_state(&self.state);
            guard.copy_generation = guard.copy_generation.wrapping_add(1);
            guard.session.set_copied(true);
            guard.copy_generation
        };

        let state = Arc::clone(&self.state);
        let delay = self.timings.copy_feedback;
        drop(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = lock_state(&state);
            if guard.copy_generation == generation {
                guard.session.set_copied(false);
            }
        }));
    }

    fn schedule_progress_reset(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let delay = self.timings.settle_delay;
        drop(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = lock_state(&state);
            if guard.cycle_generation == generation && !guard.session.is_loading() {
                guard.session.set_progress(ProgressEstimate::ZERO);
            }
        }));
    }

    fn persist(&self, key: StorageKey, value: &str) {
        if let Err(error) = self.store.set(key, value) {
            tracing::warn!("failed to persist {key}: {error}");
        }
    }
}

const fn failure_status(error: &CopilotError) -> Option<u16> {
    match error {
        CopilotError::Service { status, .. } => Some(*status),
        _ => None,
    }
}

/// Builder for [`RequestController`].
pub struct RequestControllerBuilder {
    service: Arc<dyn AnalysisService>,
    store: Arc<dyn KeyValueStore>,
    clipboard: Arc<dyn ClipboardSink>,
    jitter: Arc<dyn ProgressJitter>,
    telemetry: Arc<dyn TelemetrySink>,
    timings: ControllerTimings,
}

impl std::fmt::Debug for RequestControllerBuilder {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RequestControllerBuilder")
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl RequestControllerBuilder {
    /// Replaces the system clipboard.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Replaces the random progress increments.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Arc<dyn ProgressJitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Records submission telemetry to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Overrides the scheduled task timings.
    #[must_use]
    pub const fn with_timings(mut self, timings: ControllerTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Restores the session from the store and binds the controller to the
    /// current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Configuration`] when called outside a Tokio
    /// runtime or when the progress interval is zero.
    pub fn build(self) -> Result<RequestController, CopilotError> {
        if self.timings.progress_interval.is_zero() {
            return Err(CopilotError::Configuration {
                message: "progress interval must be greater than zero".to_owned(),
            });
        }

        let runtime = Handle::try_current().map_err(|error| CopilotError::Configuration {
            message: format!("request controller requires a Tokio runtime: {error}"),
        })?;

        let session = Session::restore(self.store.as_ref());
        let state = ControllerState {
            session,
            ..ControllerState::default()
        };

        Ok(RequestController {
            state: Arc::new(Mutex::new(state)),
            service: self.service,
            store: self.store,
            clipboard: self.clipboard,
            jitter: self.jitter,
            telemetry: self.telemetry,
            timings: self.timings,
            runtime,
        })
    }
}
