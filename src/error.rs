//! Error types surfaced by the request controller and its collaborators.

use thiserror::Error;

/// Message shown when the repository URL does not name a GitHub repository.
pub const INVALID_REPOSITORY_URL_MESSAGE: &str =
    "Invalid repo URL. Use: https://github.com/<owner>/<repo>";

/// Message shown when the pull request number is not a positive integer.
pub const INVALID_PULL_REQUEST_NUMBER_MESSAGE: &str =
    "Pull Request number must be a positive integer.";

/// Message shown when the analysis service fails without a usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong. Please check the URL and PR number.";

/// Errors surfaced while validating input or talking to collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CopilotError {
    /// The repository URL is not of the form `https://github.com/<owner>/<repo>`.
    #[error("{}", INVALID_REPOSITORY_URL_MESSAGE)]
    InvalidRepositoryUrl,

    /// The pull request number is not a positive integer.
    #[error("{}", INVALID_PULL_REQUEST_NUMBER_MESSAGE)]
    InvalidPullRequestNumber,

    /// The analysis service answered with a non-success status.
    #[error("analysis service returned status {status}")]
    Service {
        /// HTTP status code of the response.
        status: u16,
        /// `detail` or `message` string extracted from the response body.
        detail: Option<String>,
    },

    /// Networking failed before a response was received.
    #[error("network error talking to the analysis service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A success response did not carry a JSON document.
    #[error("analysis response could not be decoded: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// The persisted key-value store could not be read or written.
    #[error("session storage error: {message}")]
    Storage {
        /// Details about the storage failure.
        message: String,
    },

    /// Writing to the clipboard failed.
    #[error("clipboard error: {message}")]
    Clipboard {
        /// Error detail from the clipboard backend.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl CopilotError {
    /// Returns the single human-readable string shown to the user.
    ///
    /// Server-provided details win over the generic fallback; transport and
    /// decoding failures always use the fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Service { detail: None, .. } | Self::Network { .. } | Self::Decode { .. } => {
                GENERIC_FAILURE_MESSAGE.to_owned()
            }
            other => other.to_string(),
        }
    }
}
