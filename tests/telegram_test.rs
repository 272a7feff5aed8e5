//! Integration tests for the Telegram channel using wiremock

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hodimbot::notifications::channels::{Channel, ChannelError};
use hodimbot::notifications::TelegramChannel;

const TOKEN: &str = "123:abc";

fn channel(server: &MockServer) -> TelegramChannel {
    TelegramChannel::with_base_url(&server.uri(), TOKEN, Duration::from_secs(1)).unwrap()
}

/// Test sendMessage posts the chat id and text
#[tokio::test]
async fn test_send_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({"chat_id": "-100", "text": "Salom"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 17, "chat": {"id": -100}, "date": 0}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let delivered = channel(&mock_server).send("-100", "Salom").await.unwrap();
    assert_eq!(delivered.chat_id, "-100");
    assert_eq!(delivered.message_id, 17);
}

/// Test a Bot API rejection surfaces as an error
#[tokio::test]
async fn test_send_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&mock_server)
        .await;

    let err = channel(&mock_server).send("1", "x").await.unwrap_err();
    match err {
        ChannelError::Rejected(msg) => assert!(msg.contains("chat not found")),
        other => panic!("expected rejection, got {other:?}"),
    }
}

/// Test 429 answers are reported as rate limiting
#[tokio::test]
async fn test_send_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests",
            "parameters": {"retry_after": 7}
        })))
        .mount(&mock_server)
        .await;

    let err = channel(&mock_server).send("1", "x").await.unwrap_err();
    match err {
        ChannelError::RateLimited(msg) => assert!(msg.contains("7s")),
        other => panic!("expected rate limit, got {other:?}"),
    }
}

/// Test getUpdates passes the offset and decodes messages
#[tokio::test]
async fn test_get_updates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(query_param("offset", "42"))
        .and(query_param("timeout", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {
                    "update_id": 42,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 7, "is_bot": false, "first_name": "Ali"},
                        "chat": {"id": -100, "type": "group"},
                        "date": 0,
                        "text": "/list teacher"
                    }
                },
                {"update_id": 43}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let updates = channel(&mock_server).get_updates(Some(42)).await.unwrap();
    assert_eq!(updates.len(), 2);

    let message = updates[0].message.as_ref().unwrap();
    assert_eq!(message.text.as_deref(), Some("/list teacher"));
    assert_eq!(message.chat.id, -100);
    assert!(updates[1].message.is_none());
}

/// Test health check reflects getMe
#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "description": "Unauthorized"
        })))
        .mount(&mock_server)
        .await;

    assert!(!channel(&mock_server).health_check().await.unwrap());
}
