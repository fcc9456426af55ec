//! Integration tests for the request surface
//!
//! Drives [`AnalysisService`] built from a real configuration against a
//! wiremock server and checks status codes and JSON bodies.

use serde_json::{json, Value};
use web_analyzer::api::{AnalysisRequest, ApiBody};
use web_analyzer::config::parse_config;
use web_analyzer::AnalysisService;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_service(cache_enabled: bool) -> AnalysisService {
    let config = parse_config(&format!(
        r#"
[analyzer]
fetch-timeout-secs = 2
probe-timeout-secs = 1
user-agent = "TestAnalyzer/1.0"

[cache]
enabled = {}
ttl-secs = 60
"#,
        cache_enabled
    ))
    .unwrap();
    AnalysisService::from_config(&config).unwrap()
}

fn body_value(service_body: &ApiBody) -> Value {
    serde_json::to_value(service_body).unwrap()
}

#[tokio::test]
async fn test_empty_url_is_rejected() {
    let service = create_service(true);

    let response = service.handle_analyze(AnalysisRequest::new("")).await;

    assert_eq!(response.status, 400);
    assert_eq!(
        body_value(&response.body),
        json!({"statusCode": 400, "message": "URL is required"})
    );
}

#[tokio::test]
async fn test_missing_url_field_is_rejected() {
    let service = create_service(true);

    let response = service.handle_analyze_json("{}").await;

    assert_eq!(response.status, 400);
    assert_eq!(body_value(&response.body)["message"], "URL is required");
}

#[tokio::test]
async fn test_malformed_url_is_rejected() {
    let service = create_service(false);

    let response = service
        .handle_analyze(AnalysisRequest::new("http://exa mple.com"))
        .await;

    assert_eq!(response.status, 400);
    let message = body_value(&response.body)["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.starts_with("Invalid URL format: "), "{}", message);
}

#[tokio::test]
async fn test_upstream_error_is_bad_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let service = create_service(true);
    let response = service
        .handle_analyze(AnalysisRequest::new(format!("{}/missing", mock_server.uri())))
        .await;

    assert_eq!(response.status, 502);
    assert_eq!(
        body_value(&response.body),
        json!({
            "statusCode": 502,
            "message": "Failed to analyze URL: HTTP error: 404 Not Found"
        })
    );
}

#[tokio::test]
async fn test_successful_analysis_json_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<!DOCTYPE html><html><head><title>Sign in</title></head><body>
                    <h1>Sign in</h1>
                    <form id="signin"><input name="user"></form>
                    <a href="/help">Help</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_service(true);
    let body = json!({ "url": format!("{}/login", mock_server.uri()) }).to_string();

    let first = service.handle_analyze_json(&body).await;
    let second = service.handle_analyze_json(&body).await;

    assert_eq!(first.status, 200);
    assert_eq!(first, second);
    assert_eq!(
        body_value(&first.body),
        json!({
            "htmlVersion": "HTML5",
            "title": "Sign in",
            "headings": {"h1": 1, "h2": 0, "h3": 0, "h4": 0, "h5": 0, "h6": 0},
            "links": {"internal": 1, "external": 0, "inaccessible": 0},
            "containsLoginForm": true
        })
    );

    let stats = service.cache_stats().unwrap();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_health() {
    let service = create_service(false);
    assert_eq!(
        serde_json::to_value(service.health()).unwrap(),
        json!({"status": "ok"})
    );
}
