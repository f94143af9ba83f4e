//! Sources of simulated progress increments.

use rand::Rng;

use crate::session::UNITS_PER_PERCENT;

const MIN_INCREMENT: u16 = 1;
const MAX_INCREMENT: u16 = 10 * UNITS_PER_PERCENT;

/// Supplies the increment added to the progress estimate on each tick.
pub trait ProgressJitter: Send + Sync {
    /// Next increment in tenths of a percent.
    fn next_increment(&self) -> u16;
}

/// Uniformly random increments in `[0.1 %, 10 %)`.
///
/// The lower bound is one unit rather than zero so every tick below the
/// ceiling visibly advances.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl ProgressJitter for RandomJitter {
    fn next_increment(&self) -> u16 {
        rand::rng().random_range(MIN_INCREMENT..MAX_INCREMENT)
    }
}

/// Constant increments, for deterministic tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub u16);

#[cfg(any(test, feature = "test-support"))]
impl ProgressJitter for FixedJitter {
    fn next_increment(&self) -> u16 {
        self.0
    }
}
