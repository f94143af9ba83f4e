//! Input validation and the request payload sent to the analysis service.

use serde::Serialize;

use crate::error::CopilotError;

const GITHUB_HOST_PREFIX: &str = "github.com/";
const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Validated GitHub repository URL.
///
/// Accepts any input whose trimmed form starts with `http://` or `https://`,
/// then `github.com/`, then a non-empty owner segment, `/`, and a non-empty
/// repository segment. Scheme and host compare case-insensitively; anything
/// after the repository segment is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl {
    value: String,
    owner: String,
    name: String,
}

impl RepositoryUrl {
    /// Parses and trims a raw repository URL.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::InvalidRepositoryUrl`] when the input does not
    /// name a GitHub repository.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_copilot::analysis::RepositoryUrl;
    ///
    /// let url = RepositoryUrl::parse("  https://GitHub.com/octo/cat  ")
    ///     .expect("should parse repository URL");
    /// assert_eq!(url.as_str(), "https://GitHub.com/octo/cat");
    /// assert_eq!(url.owner(), "octo");
    /// assert_eq!(url.name(), "cat");
    /// ```
    pub fn parse(input: &str) -> Result<Self, CopilotError> {
        let trimmed = input.trim();

        let after_scheme = SCHEMES
            .iter()
            .find_map(|scheme| strip_prefix_ignore_case(trimmed, scheme))
            .ok_or(CopilotError::InvalidRepositoryUrl)?;
        let path = strip_prefix_ignore_case(after_scheme, GITHUB_HOST_PREFIX)
            .ok_or(CopilotError::InvalidRepositoryUrl)?;

        let (owner, tail) = path
            .split_once('/')
            .ok_or(CopilotError::InvalidRepositoryUrl)?;
        let name = tail.split('/').next().unwrap_or_default();

        if owner.is_empty() || name.is_empty() {
            return Err(CopilotError::InvalidRepositoryUrl);
        }

        Ok(Self {
            value: trimmed.to_owned(),
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// The trimmed URL exactly as it will be sent to the service.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Repository owner segment.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name segment.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        input.get(prefix.len()..)
    } else {
        None
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Parses raw user input into a positive pull request number.
    ///
    /// Surrounding whitespace is ignored. Zero, negative values, fractions and
    /// any non-numeric remainder are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::InvalidPullRequestNumber`] when the input is
    /// not a positive integer.
    pub fn parse(input: &str) -> Result<Self, CopilotError> {
        let value = input
            .trim()
            .parse::<u64>()
            .map_err(|_| CopilotError::InvalidPullRequestNumber)?;
        Self::new(value)
    }

    /// Wraps a numeric value, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::InvalidPullRequestNumber`] for zero.
    pub const fn new(value: u64) -> Result<Self, CopilotError> {
        if value == 0 {
            return Err(CopilotError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Body of `POST <base>/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    repo_url: String,
    pr_number: u64,
}

impl AnalysisRequest {
    /// Creates a request from already validated parts.
    #[must_use]
    pub fn new(repository: &RepositoryUrl, number: PullRequestNumber) -> Self {
        Self {
            repo_url: repository.as_str().to_owned(),
            pr_number: number.get(),
        }
    }

    /// Validates raw inputs in submission order: URL first, then number.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::InvalidRepositoryUrl`] or
    /// [`CopilotError::InvalidPullRequestNumber`] for the first input that
    /// fails validation.
    pub fn from_inputs(repository_url: &str, pull_request_number: &str) -> Result<Self, CopilotError> {
        let repository = RepositoryUrl::parse(repository_url)?;
        let number = PullRequestNumber::parse(pull_request_number)?;
        Ok(Self::new(&repository, number))
    }

    /// Repository URL sent to the service.
    #[must_use]
    pub const fn repo_url(&self) -> &str {
        self.repo_url.as_str()
    }

    /// Pull request number sent to the service.
    #[must_use]
    pub const fn pr_number(&self) -> u64 {
        self.pr_number
    }
}
