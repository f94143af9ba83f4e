//! One submission cycle and the progress task it owns.
//!
//! A cycle is created when a submission starts and consumed when it ends.
//! [`SubmissionCycle::cancel`] is the only place the progress task is
//! stopped; every exit path (reject, resolve, drop) goes through it.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::analysis::AnalysisReport;
use crate::error::CopilotError;
use crate::session::ProgressEstimate;

use super::jitter::ProgressJitter;
use super::{SharedState, SubmissionPhase, lock_state};

pub(crate) struct SubmissionCycle {
    generation: u64,
    state: SharedState,
    ticker: Option<AbortHandle>,
    started: Instant,
}

impl SubmissionCycle {
    /// Enters the loading state and starts the progress task.
    ///
    /// Returns `None` without touching the session when a cycle is already
    /// in flight.
    pub(crate) fn try_start(
        state: &SharedState,
        runtime: &Handle,
        jitter: Arc<dyn ProgressJitter>,
        period: Duration,
    ) -> Option<Self> {
        let generation = {
            let mut guard = lock_state(state);
            if guard.session.is_loading() {
                return None;
            }
            guard.cycle_generation = guard.cycle_generation.wrapping_add(1);
            guard.session.begin_loading();
            guard.phase = SubmissionPhase::Validating;
            guard.cycle_generation
        };

        let ticker = runtime
            .spawn(advance_progress(
                Arc::clone(state),
                jitter,
                period,
                generation,
            ))
            .abort_handle();

        Some(Self {
            generation,
            state: Arc::clone(state),
            ticker: Some(ticker),
            started: Instant::now(),
        })
    }

    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn mark_submitting(&self) {
        lock_state(&self.state).phase = SubmissionPhase::Submitting;
    }

    /// Ends the cycle after local validation failed.
    pub(crate) fn reject(mut self, error: &CopilotError) {
        self.cancel();
        let mut guard = lock_state(&self.state);
        guard.session.fail(error.user_message());
        guard.session.set_progress(ProgressEstimate::ZERO);
        guard.phase = SubmissionPhase::Rejected;
    }

    /// Ends the cycle with the service outcome.
    pub(crate) fn resolve(mut self, outcome: Result<AnalysisReport, CopilotError>) {
        self.cancel();
        let mut guard = lock_state(&self.state);
        match outcome {
            Ok(report) => {
                guard.session.succeed(report);
                guard.phase = SubmissionPhase::Succeeded;
            }
            Err(error) => {
                guard.session.fail(error.user_message());
                guard.phase = SubmissionPhase::Failed;
            }
        }
    }

    /// Stops the progress task. Safe to call more than once.
    pub(crate) fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for SubmissionCycle {
    fn drop(&mut self) {
        if self.ticker.is_none() {
            return;
        }
        self.cancel();

        let mut guard = lock_state(&self.state);
        if guard.cycle_generation == self.generation && guard.session.is_loading() {
            tracing::debug!(generation = self.generation, "submission cycle abandoned");
            guard.session.abandon();
            guard.phase = SubmissionPhase::Cancelled;
        }
    }
}

async fn advance_progress(
    state: SharedState,
    jitter: Arc<dyn ProgressJitter>,
    period: Duration,
    generation: u64,
) {
    let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        let mut guard = lock_state(&state);
        if guard.cycle_generation != generation || !guard.session.is_loading() {
            break;
        }
        let next = guard.session.progress().advanced(jitter.next_increment());
        guard.session.set_progress(next);
    }
}
