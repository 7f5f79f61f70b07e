//! Integration tests for the directory client using wiremock mock server

use astro_api::{ApiError, DirectoryClient, SessionDirectory};

use std::time::Duration;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const SDK: &str = "UE4MKPL-1.19.190610";

fn client(server: &MockServer) -> DirectoryClient {
    DirectoryClient::new(&server.uri(), "5EA1", SDK, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_authenticate_stores_session_ticket() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/LoginWithCustomID"))
        .and(query_param("sdk", SDK))
        .and(body_string_contains("server-guid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "OK",
            "data": { "SessionTicket": "ticket-abc", "PlayFabId": "F00" }
        })))
        .mount(&mock_server)
        .await;

    let mut client = client(&mock_server);
    let ticket = client.authenticate("server-guid-1").await.unwrap();

    assert_eq!(ticket, "ticket-abc");
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_without_ticket_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/LoginWithCustomID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {}
        })))
        .mount(&mock_server)
        .await;

    let mut client = client(&mock_server);
    let result = client.authenticate("server-guid-1").await;

    assert!(matches!(result, Err(ApiError::MissingField { .. })));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_list_sessions_sends_ticket_and_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/GetCurrentGames"))
        .and(header("X-Authorization", "ticket-abc"))
        .and(body_string_contains("203.0.113.7:7777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {
                "Games": [
                    {
                        "LobbyID": "L1",
                        "ServerIPV4Address": "203.0.113.7",
                        "ServerPort": 7777,
                        "Tags": { "gameId": "203.0.113.7:7777" }
                    },
                    { "LobbyID": "L2", "Tags": { "gameId": "203.0.113.7:7777" } }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server).with_session_ticket("ticket-abc");
    let sessions = client.list_sessions("203.0.113.7:7777").await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].lobby_id, "L1");
    assert_eq!(sessions[1].server_port, None);
}

#[tokio::test]
async fn test_list_sessions_without_games_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/GetCurrentGames"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {}
        })))
        .mount(&mock_server)
        .await;

    let sessions = client(&mock_server)
        .list_sessions("203.0.113.7:7777")
        .await
        .unwrap();

    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_rate_limit_is_reported_as_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/GetCurrentGames"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .list_sessions("203.0.113.7:7777")
        .await
        .unwrap_err();

    match &err {
        ApiError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(*retry_after_secs, Some(7)),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_error_envelope_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/GetCurrentGames"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "status": "Unauthorized",
            "error": "NotAuthorized",
            "errorCode": 1074,
            "errorMessage": "Session ticket expired"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .list_sessions("203.0.113.7:7777")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("NotAuthorized"));
    assert!(err.to_string().contains("Session ticket expired"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/GetCurrentGames"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .list_sessions("203.0.113.7:7777")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Json { .. }));
}

#[tokio::test]
async fn test_deregister_session_calls_cloud_script() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Client/ExecuteCloudScript"))
        .and(body_string_contains("deregisterDedicatedServer"))
        .and(body_string_contains("L-stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": { "FunctionName": "deregisterDedicatedServer" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .with_session_ticket("ticket-abc")
        .deregister_session("L-stale")
        .await
        .unwrap();
}
