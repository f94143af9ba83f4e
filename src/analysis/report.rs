//! Analysis results kept as opaque JSON documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured document returned by the analysis service.
///
/// The controller never interprets the document; rendering to text happens
/// on demand through [`AnalysisReport::to_pretty_string`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport(Value);

impl AnalysisReport {
    /// Wraps a decoded response body.
    #[must_use]
    pub const fn new(document: Value) -> Self {
        Self(document)
    }

    /// Borrows the underlying document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.0
    }

    /// Formats the document as two-space indented JSON.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }

    /// Decodes the risk summary shape produced by the analysis service.
    ///
    /// Returns `None` when the document has a different shape.
    #[must_use]
    pub fn summary(&self) -> Option<RiskSummary> {
        RiskSummary::deserialize(&self.0).ok()
    }
}

/// Risk assessment and suggestions for a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RiskSummary {
    /// Risk score from 0 (safe) to 100 (risky).
    pub risk_score: i64,
    /// Reasoning behind the score.
    pub explanation: String,
    /// Improvement suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
}
