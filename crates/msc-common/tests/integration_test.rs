//! Integration tests for msc-common crate.

use msc_common::{GitHubClient, GitHubConfig, IssueQuery, MscError, RepositoryId, Stage};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_stage_order_is_stable() {
    let names: Vec<&str> = Stage::ALL.iter().map(|s| s.display_name()).collect();
    assert_eq!(names, vec!["New", "Merged", "Closed", "FCP", "Postponed"]);
}

#[tokio::test]
async fn test_client_reports_missing_repository_as_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/matrix-org/missing/issues"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let client = GitHubClient::new(GitHubConfig::new("token").with_api_url(server.uri())).unwrap();
    let err = client
        .list_issues(&RepositoryId::new("matrix-org", "missing"), &IssueQuery::labelled("proposal"))
        .await
        .unwrap_err();

    assert!(matches!(err, MscError::TransientFetch { status_code: Some(404), .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_forbidden_without_rate_limit_is_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "4999")
                .set_body_json(json!({"message": "Resource not accessible by integration"})),
        )
        .mount(&server)
        .await;

    let client = GitHubClient::new(GitHubConfig::new("token").with_api_url(server.uri())).unwrap();
    let err = client
        .list_issues(&RepositoryId::new("matrix-org", "matrix-doc"), &IssueQuery::labelled("proposal"))
        .await
        .unwrap_err();

    assert!(matches!(err, MscError::Authentication { .. }));
}
