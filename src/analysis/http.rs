//! HTTP implementation of [`AnalysisService`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::CopilotError;

use super::report::AnalysisReport;
use super::request::AnalysisRequest;
use super::service::AnalysisService;

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const ERROR_DETAIL_FIELDS: [&str; 2] = ["detail", "message"];

/// Analysis service reached over `POST <base>/analyze`.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: Url,
}

impl HttpAnalysisService {
    /// Creates a service for the given base URL.
    ///
    /// No request timeout is configured; calls resolve when the transport
    /// does.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Configuration`] when the base URL cannot be
    /// parsed or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CopilotError> {
        let endpoint_text = format!("{}/analyze", base_url.trim().trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint_text).map_err(|error| CopilotError::Configuration {
            message: format!("invalid analysis service URL '{base_url}': {error}"),
        })?;

        let client = Client::builder()
            .build()
            .map_err(|error| CopilotError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self { client, endpoint })
    }

    /// Fully resolved endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, CopilotError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            repo_url = request.repo_url(),
            pr_number = request.pr_number(),
            "submitting analysis request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|error| CopilotError::Network {
                message: error.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            let document: Value = response.json().await.map_err(|error| CopilotError::Decode {
                message: error.to_string(),
            })?;
            return Ok(AnalysisReport::new(document));
        }

        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<Value>(&body).ok())
            .and_then(|body| extract_failure_detail(&body));

        tracing::debug!(status = status.as_u16(), ?detail, "analysis request failed");

        Err(CopilotError::Service {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Picks the first non-empty `detail` or `message` string from an error body.
#[must_use]
pub fn extract_failure_detail(body: &Value) -> Option<String> {
    ERROR_DETAIL_FIELDS.iter().find_map(|field| {
        body.get(field)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned)
    })
}
