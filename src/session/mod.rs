//! Mutable session state observed by the view.
//!
//! A [`Session`] is seeded once from the key-value store and then mutated
//! only by the request controller. The view reads cloned snapshots.

use std::fmt;

use crate::analysis::AnalysisReport;
use crate::storage::{KeyValueStore, StorageKey};

mod progress;

pub use progress::{ProgressEstimate, UNITS_PER_PERCENT};

/// Colour theme selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light palette.
    #[default]
    Light,
    /// Dark palette.
    Dark,
}

impl Theme {
    /// Reads a persisted value; anything other than `"dark"` is light.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        if value == Some("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is the dark theme.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// State of the single-page client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    repository_url: String,
    pull_request_number: String,
    analysis_result: Option<AnalysisReport>,
    error_message: Option<String>,
    is_loading: bool,
    progress: ProgressEstimate,
    theme: Theme,
    is_copied: bool,
}

impl Session {
    /// Seeds a session from persisted inputs and theme.
    #[must_use]
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        Self {
            repository_url: store.get(StorageKey::RepoUrl).unwrap_or_default(),
            pull_request_number: store.get(StorageKey::PrNumber).unwrap_or_default(),
            theme: Theme::from_stored(store.get(StorageKey::Theme).as_deref()),
            ..Self::default()
        }
    }

    /// Raw repository URL input.
    #[must_use]
    pub const fn repository_url(&self) -> &str {
        self.repository_url.as_str()
    }

    /// Raw pull request number input.
    #[must_use]
    pub const fn pull_request_number(&self) -> &str {
        self.pull_request_number.as_str()
    }

    /// Result of the last successful request.
    #[must_use]
    pub const fn analysis_result(&self) -> Option<&AnalysisReport> {
        self.analysis_result.as_ref()
    }

    /// Result text as shown to the user and copied to the clipboard.
    #[must_use]
    pub fn result_text(&self) -> Option<String> {
        self.analysis_result
            .as_ref()
            .map(AnalysisReport::to_pretty_string)
    }

    /// Error from the last request cycle.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether a request cycle is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Current progress estimate.
    #[must_use]
    pub const fn progress(&self) -> ProgressEstimate {
        self.progress
    }

    /// Selected theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the dark theme is selected.
    #[must_use]
    pub const fn is_dark_theme(&self) -> bool {
        self.theme.is_dark()
    }

    /// Whether the copy confirmation is showing.
    #[must_use]
    pub const fn is_copied(&self) -> bool {
        self.is_copied
    }

    pub(crate) fn set_repository_url(&mut self, value: String) {
        self.repository_url = value;
    }

    pub(crate) fn set_pull_request_number(&mut self, value: String) {
        self.pull_request_number = value;
    }

    pub(crate) const fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub(crate) const fn set_copied(&mut self, copied: bool) {
        self.is_copied = copied;
    }

    pub(crate) const fn set_progress(&mut self, progress: ProgressEstimate) {
        self.progress = progress;
    }

    /// Enters the loading state with cleared outcome and zero progress.
    pub(crate) fn begin_loading(&mut self) {
        self.error_message = None;
        self.analysis_result = None;
        self.is_loading = true;
        self.progress = ProgressEstimate::ZERO;
    }

    pub(crate) fn succeed(&mut self, report: AnalysisReport) {
        self.progress = ProgressEstimate::COMPLETE;
        self.analysis_result = Some(report);
        self.error_message = None;
        self.is_loading = false;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.analysis_result = None;
        self.error_message = Some(message);
        self.is_loading = false;
    }

    /// Leaves the loading state without an outcome.
    pub(crate) const fn abandon(&mut self) {
        self.is_loading = false;
        self.progress = ProgressEstimate::ZERO;
    }
}
