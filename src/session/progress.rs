//! Simulated progress estimate.

use std::fmt;

/// Number of progress units in one percent.
pub const UNITS_PER_PERCENT: u16 = 10;

const COMPLETE_UNITS: u16 = 100 * UNITS_PER_PERCENT;
const CEILING_UNITS: u16 = 90 * UNITS_PER_PERCENT - 1;

/// UX-only completion estimate in tenths of a percent (0–1000).
///
/// Advancing never reaches 90 %; only [`ProgressEstimate::COMPLETE`] marks a
/// resolved request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgressEstimate(u16);

impl ProgressEstimate {
    /// No progress.
    pub const ZERO: Self = Self(0);

    /// Request resolved successfully.
    pub const COMPLETE: Self = Self(COMPLETE_UNITS);

    /// Highest value reachable by [`ProgressEstimate::advanced`].
    pub const CEILING: Self = Self(CEILING_UNITS);

    /// Returns the estimate after adding `increment` tenths of a percent,
    /// clamped to [`ProgressEstimate::CEILING`].
    ///
    /// Values already at or above the ceiling are returned unchanged.
    #[must_use]
    pub fn advanced(self, increment: u16) -> Self {
        if self.0 >= CEILING_UNITS {
            return self;
        }
        Self(self.0.saturating_add(increment).min(CEILING_UNITS))
    }

    /// Raw value in tenths of a percent.
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.0
    }

    /// Whole percent, rounded down.
    #[must_use]
    pub const fn whole_percent(self) -> u16 {
        self.0.div_euclid(UNITS_PER_PERCENT)
    }
}

impl fmt::Display for ProgressEstimate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}.{}%",
            self.whole_percent(),
            self.0.rem_euclid(UNITS_PER_PERCENT)
        )
    }
}
