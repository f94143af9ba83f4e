//! Analysis service boundary: input validation, request payloads, the
//! service trait and its HTTP implementation.

mod http;
mod report;
mod request;
mod service;

pub use http::{DEFAULT_API_BASE, HttpAnalysisService, extract_failure_detail};
pub use report::{AnalysisReport, RiskSummary};
pub use request::{AnalysisRequest, PullRequestNumber, RepositoryUrl};
#[cfg(test)]
pub use service::MockAnalysisService;
pub use service::AnalysisService;
