//! Integration tests for the analyzer
//!
//! These tests use wiremock to serve pages and probe targets and run the
//! full fetch, parse, extract and probe cycle end-to-end.

use std::sync::Arc;
use std::time::Duration;
use web_analyzer::analyzer::{Analyze, Analyzer};
use web_analyzer::cache::CachedAnalyzer;
use web_analyzer::config::AnalyzerConfig;
use web_analyzer::{AnalyzerError, HeadingCounts};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config() -> AnalyzerConfig {
    AnalyzerConfig {
        fetch_timeout_secs: 2,
        probe_timeout_secs: 1,
        max_document_bytes: 1024 * 1024,
        user_agent: "TestAnalyzer/1.0".to_string(),
    }
}

fn html_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

async fn mount_head(server: &MockServer, probe_path: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(probe_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r##"<!DOCTYPE html>
            <html><head><title>Welcome Home</title></head><body>
            <h1>Main</h1>
            <h2>First</h2><h2>Second</h2>
            <h3>Detail</h3>
            <nav>
                <a href="{base}/ok">Up</a>
                <a href="{base}/missing">Gone</a>
                <a href="/relative">Relative</a>
                <a href="#top">Top</a>
                <a href="http://127.0.0.1:1/down">Unreachable</a>
                <a href="mailto:team@example.com">Mail</a>
                <a href="javascript:void(0)">Script</a>
                <a href="">Empty</a>
            </nav>
            <form action="/session" method="post">
                <input type="text" name="user">
                <input type="password" name="pass">
            </form>
            </body></html>"##,
            base = base_url
        ),
    )
    .await;
    mount_head(&mock_server, "/ok", 200).await;
    mount_head(&mock_server, "/missing", 404).await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let result = analyzer.analyze(&format!("{}/", base_url)).await.unwrap();

    assert_eq!(result.html_version, "HTML5");
    assert_eq!(result.title, "Welcome Home");
    assert_eq!(
        result.headings,
        HeadingCounts {
            h1: 1,
            h2: 2,
            h3: 1,
            ..Default::default()
        }
    );

    // ok, missing, /relative, #top
    assert_eq!(result.links.internal, 4);
    // 127.0.0.1:1 (different port), mailto
    assert_eq!(result.links.external, 2);
    // missing (404), 127.0.0.1:1 (refused)
    assert_eq!(result.links.inaccessible, 2);
    assert!(result.contains_login_form);
}

#[tokio::test]
async fn test_page_without_links_or_forms() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/plain",
        "<html><body><article><p>Just text</p></article></body></html>".to_string(),
    )
    .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let result = analyzer
        .analyze(&format!("{}/plain", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(result.html_version, "HTML5 (No DOCTYPE)");
    assert_eq!(result.title, "");
    assert_eq!(result.headings.total(), 0);
    assert_eq!(result.links.total(), 0);
    assert_eq!(result.links.inaccessible, 0);
    assert!(!result.contains_login_form);
}

#[tokio::test]
async fn test_redirecting_link_is_accessible() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base}/moved">Moved</a><a href="{base}/broken">Broken</a>"#,
            base = base_url
        ),
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
        .mount(&mock_server)
        .await;
    mount_head(&mock_server, "/broken", 500).await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let result = analyzer.analyze(&format!("{}/", base_url)).await.unwrap();

    assert_eq!(result.links.internal, 2);
    assert_eq!(result.links.inaccessible, 1);
}

#[tokio::test]
async fn test_error_status_fails_analysis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let err = analyzer
        .analyze(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap_err();

    match &err {
        AnalyzerError::UpstreamStatus { status, reason } => {
            assert_eq!(*status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected upstream status error, got {:?}", other),
    }
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_redirected_page_is_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<title>New</title>".to_string()).await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let err = analyzer
        .analyze(&format!("{}/old", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::UpstreamStatus { status: 301, .. }));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_response("<title>Late</title>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let err = analyzer
        .analyze(&format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Fetch(_)));
}

#[tokio::test]
async fn test_oversized_page_is_rejected() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/big", "x".repeat(4096)).await;

    let config = AnalyzerConfig {
        max_document_bytes: 1024,
        ..create_test_config()
    };
    let analyzer = Analyzer::new(&config).unwrap();
    let err = analyzer
        .analyze(&format!("{}/big", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Parse(_)));
}

#[tokio::test]
async fn test_cache_fetches_page_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(html_response(
            "<!DOCTYPE html><title>Cached</title><h1>One</h1>",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let cache = Arc::new(CachedAnalyzer::new(analyzer, Duration::from_secs(60)));
    let url = format!("{}/cached", mock_server.uri());

    let first = cache.analyze(&url).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let cache = Arc::clone(&cache);
        let url = url.clone();
        handles.push(tokio::spawn(async move { cache.analyze(&url).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), first);
    }

    assert_eq!(first.title, "Cached");
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 5);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_cache_does_not_store_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::new(&create_test_config()).unwrap();
    let cache = CachedAnalyzer::new(analyzer, Duration::from_secs(60));
    let url = format!("{}/flaky", mock_server.uri());

    assert!(cache.analyze(&url).await.is_err());
    assert!(cache.analyze(&url).await.is_err());
    assert!(cache.is_empty());
}
