//! Mock analysis service listening on a local port.

use std::rc::Rc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stand-in for the service's `POST /analyze` endpoint.
#[derive(Clone)]
pub struct AnalysisServer(Rc<MockServer>);

impl AnalysisServer {
    pub async fn start() -> Self {
        Self(Rc::new(MockServer::start().await))
    }

    /// Base URL to hand to `HttpAnalysisService::new`.
    pub fn base_url(&self) -> String {
        self.0.uri()
    }

    /// Answers every analysis request with `response`.
    pub async fn answer_with(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(response)
            .mount(&self.0)
            .await;
    }

    /// Number of analysis requests received so far.
    pub async fn analysis_requests(&self) -> usize {
        self.0
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/analyze")
            .count()
    }
}
