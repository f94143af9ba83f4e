//! Integration tests for the HTTP analysis service against a mock server.

use pr_copilot::{AnalysisRequest, AnalysisService, CopilotError, HttpAnalysisService};
use rstest::{fixture, rstest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[fixture]
fn request() -> AnalysisRequest {
    AnalysisRequest::from_inputs("https://github.com/octo/widgets", "42")
        .expect("inputs should validate")
}

#[rstest]
#[tokio::test]
async fn posts_request_body_and_returns_document(request: AnalysisRequest) {
    let server = MockServer::start().await;
    let document = json!({ "risk_score": 72, "explanation": "Touches auth", "suggestions": [] });

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "repo_url": "https://github.com/octo/widgets",
            "pr_number": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&document))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpAnalysisService::new(&server.uri()).expect("service should build");
    let report = service
        .analyze(&request)
        .await
        .expect("analysis should succeed");

    assert_eq!(report.document(), &document);
}

#[rstest]
#[tokio::test]
async fn trailing_slash_in_base_is_ignored(request: AnalysisRequest) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let service = HttpAnalysisService::new(&base).expect("service should build");

    assert!(service.analyze(&request).await.is_ok());
}

#[rstest]
#[case::detail(
    ResponseTemplate::new(429).set_body_json(json!({ "detail": "Rate limit exceeded" })),
    429,
    Some("Rate limit exceeded")
)]
#[case::message(
    ResponseTemplate::new(400).set_body_json(json!({ "message": "PR not found" })),
    400,
    Some("PR not found")
)]
#[case::empty_body(ResponseTemplate::new(500), 500, None)]
#[case::plain_text(ResponseTemplate::new(502).set_body_string("Bad Gateway"), 502, None)]
#[tokio::test]
async fn failure_status_carries_optional_detail(
    request: AnalysisRequest,
    #[case] response: ResponseTemplate,
    #[case] expected_status: u16,
    #[case] expected_detail: Option<&str>,
) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(response)
        .mount(&server)
        .await;

    let service = HttpAnalysisService::new(&server.uri()).expect("service should build");
    let error = service
        .analyze(&request)
        .await
        .expect_err("analysis should fail");

    assert_eq!(
        error,
        CopilotError::Service {
            status: expected_status,
            detail: expected_detail.map(ToOwned::to_owned),
        }
    );
}

#[rstest]
#[tokio::test]
async fn non_json_success_body_is_a_decode_error(request: AnalysisRequest) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let service = HttpAnalysisService::new(&server.uri()).expect("service should build");
    let error = service
        .analyze(&request)
        .await
        .expect_err("decoding should fail");

    assert!(matches!(error, CopilotError::Decode { .. }));
}

#[rstest]
#[tokio::test]
async fn unreachable_service_is_a_network_error(request: AnalysisRequest) {
    let server = MockServer::builder().start().await;
    let base = server.uri();
    drop(server);

    let service = HttpAnalysisService::new(&base).expect("service should build");
    let error = service
        .analyze(&request)
        .await
        .expect_err("request should fail");

    assert!(matches!(error, CopilotError::Network { .. }));
    assert_eq!(
        error.user_message(),
        "Something went wrong. Please check the URL and PR number."
    );
}
