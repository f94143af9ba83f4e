//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pr-copilot.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PR_COPILOT_API_BASE`, `PR_COPILOT_REPO_URL`,
//!    and so on
//! 4. **Command-line arguments** – `--api-base`/`-a`, `--repo-url`/`-r`, ...
//!
//! # Configuration File
//!
//! ```toml
//! api_base = "https://copilot.example"
//! repo_url = "https://github.com/owner/repo"
//! pr_number = "42"
//! state_file = "/tmp/pr-copilot.json"
//! progress_interval_ms = 400
//! ```

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_API_BASE;
use crate::controller::{
    ControllerTimings, DEFAULT_COPY_FEEDBACK, DEFAULT_PROGRESS_INTERVAL, DEFAULT_SETTLE_DELAY,
};
use crate::error::CopilotError;
use crate::storage::default_state_file;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pr_copilot::CopilotConfig;
///
/// let config = CopilotConfig::load().expect("failed to load configuration");
/// let timings = config.timings().expect("timings should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PR_COPILOT",
    discovery(
        dotfile_name = ".pr-copilot.toml",
        config_file_name = "pr-copilot.toml",
        app_name = "pr-copilot"
    )
)]
pub struct CopilotConfig {
    /// Base URL of the analysis service.
    ///
    /// Can be provided via:
    /// - CLI: `--api-base <URL>` or `-a <URL>`
    /// - Environment: `PR_COPILOT_API_BASE`
    /// - Config file: `api_base = "..."`
    #[ortho_config(cli_short = 'a')]
    pub api_base: String,

    /// Repository URL to analyse, replacing the remembered input.
    ///
    /// Can be provided via:
    /// - CLI: `--repo-url <URL>` or `-r <URL>`
    /// - Environment: `PR_COPILOT_REPO_URL`
    /// - Config file: `repo_url = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo_url: Option<String>,

    /// Pull request number to analyse, replacing the remembered input.
    ///
    /// Kept as raw text; validation happens on submission.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-number <N>` or `-p <N>`
    /// - Environment: `PR_COPILOT_PR_NUMBER`
    /// - Config file: `pr_number = "..."`
    #[ortho_config(cli_short = 'p')]
    pub pr_number: Option<String>,

    /// Path of the JSON file remembering inputs and theme.
    ///
    /// Defaults to `${XDG_STATE_HOME}/pr-copilot/session.json`, falling back
    /// to `${HOME}/.local/state/pr-copilot/session.json`.
    #[ortho_config(cli_short = 'S')]
    pub state_file: Option<String>,

    /// Flips the remembered theme before submitting.
    #[ortho_config(cli_short = 't')]
    pub toggle_theme: bool,

    /// Copies the result JSON to the clipboard after a successful request.
    #[ortho_config(cli_short = 'c')]
    pub copy: bool,

    /// Prints the risk summary instead of the raw JSON document when the
    /// response has the expected shape.
    #[ortho_config(cli_short = 's')]
    pub summary: bool,

    /// Writes submission telemetry to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,

    /// Period between simulated progress ticks, in milliseconds.
    #[ortho_config()]
    pub progress_interval_ms: u64,

    /// Delay before the progress bar resets after a request resolves, in
    /// milliseconds.
    #[ortho_config()]
    pub settle_delay_ms: u64,

    /// Duration of the copy confirmation, in milliseconds.
    #[ortho_config()]
    pub copy_feedback_ms: u64,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            repo_url: None,
            pr_number: None,
            state_file: None,
            toggle_theme: false,
            copy: false,
            summary: false,
            telemetry: false,
            progress_interval_ms: duration_millis(DEFAULT_PROGRESS_INTERVAL),
            settle_delay_ms: duration_millis(DEFAULT_SETTLE_DELAY),
            copy_feedback_ms: duration_millis(DEFAULT_COPY_FEEDBACK),
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl CopilotConfig {
    /// Converts the millisecond settings into controller timings.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Configuration`] when any duration is zero.
    pub fn timings(&self) -> Result<ControllerTimings, CopilotError> {
        Ok(ControllerTimings {
            progress_interval: non_zero_millis("progress_interval_ms", self.progress_interval_ms)?,
            settle_delay: non_zero_millis("settle_delay_ms", self.settle_delay_ms)?,
            copy_feedback: non_zero_millis("copy_feedback_ms", self.copy_feedback_ms)?,
        })
    }

    /// Returns the configured state file or the default location.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Configuration`] when no state file is
    /// configured and no default location can be derived.
    pub fn state_file_path(&self) -> Result<Utf8PathBuf, CopilotError> {
        match self.state_file.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Ok(Utf8PathBuf::from(path)),
            _ => default_state_file(),
        }
    }
}

fn non_zero_millis(field: &str, value: u64) -> Result<Duration, CopilotError> {
    if value == 0 {
        return Err(CopilotError::Configuration {
            message: format!("{field} must be greater than zero"),
        });
    }
    Ok(Duration::from_millis(value))
}

#[cfg(test)]
mod tests;
