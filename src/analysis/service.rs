//! Analysis service abstraction used by the request controller.

use async_trait::async_trait;

use crate::error::CopilotError;

use super::report::AnalysisReport;
use super::request::AnalysisRequest;

/// Remote collaborator that assesses a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submits one analysis request.
    ///
    /// Implementations must not retry; a failed call is reported as-is.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Network`] when no response was received,
    /// [`CopilotError::Service`] for non-success responses and
    /// [`CopilotError::Decode`] when a success body is not JSON.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, CopilotError>;
}
