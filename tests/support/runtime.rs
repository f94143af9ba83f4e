//! Tokio runtime shared between the steps of one scenario.

use std::io;
use std::rc::Rc;

use tokio::runtime::{Builder, Runtime};

/// Runtime handle that can be stored in an `rstest-bdd` Slot.
///
/// Controllers bind to the runtime they were built on, so every step of a
/// scenario must drive the same one.
#[derive(Clone)]
pub struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    /// Builds the scenario runtime.
    ///
    /// With `paused_clock` the runtime is single-threaded and its clock only
    /// moves while a step sleeps on it, jumping straight to the next
    /// deadline. Otherwise it is a multi-threaded runtime on wall-clock time,
    /// for scenarios that talk to a real socket.
    pub fn new(paused_clock: bool) -> io::Result<Self> {
        let runtime = if paused_clock {
            Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()?
        } else {
            Runtime::new()?
        };
        Ok(Self(Rc::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}
