use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::AuthError;
use auth_cell::services::oauth::GoogleExchangeService;
use shared_utils::test_utils::TestConfig;

fn service_for(mock_server: &MockServer) -> GoogleExchangeService {
    GoogleExchangeService::new(&TestConfig::with_backend_url(&mock_server.uri()).to_app_config())
}

#[tokio::test]
async fn first_working_candidate_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/google/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Later candidates must never be consulted.
    Mock::given(method("POST"))
        .and(path("/api/auth/google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-3"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = service_for(&mock_server).exchange("code-abc", None).await.unwrap();
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn exchange_falls_through_failed_candidates_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/google/callback"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/google/callback"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"success": true, "data": {"token": "tok-enveloped"}}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = service_for(&mock_server)
        .exchange("code-abc", None)
        .await
        .unwrap();
    assert_eq!(token, "tok-enveloped");
}

#[tokio::test]
async fn get_candidates_carry_the_code_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/google/callback"))
        .and(query_param("code", "code-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = service_for(&mock_server)
        .exchange("code-abc", None)
        .await
        .unwrap();
    assert_eq!(token, "tok-2");
}

#[tokio::test]
async fn all_candidates_failing_reports_the_last_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such route"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such route"})))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).exchange("code-abc", None).await;
    assert_matches!(result, Err(AuthError::Exchange(_)));
}

#[tokio::test]
async fn tokenless_success_counts_as_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/google/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-late"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = service_for(&mock_server)
        .exchange("code-abc", None)
        .await
        .unwrap();
    assert_eq!(token, "tok-late");
}
