use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roster_store::{RealtimeStore, StoreConfig};
use roster_types::MessageRecord;

fn store_for(server: &MockServer) -> RealtimeStore {
    RealtimeStore::new(StoreConfig::new("test-project").with_realtime_endpoint(server.uri()))
}

#[tokio::test]
async fn add_message_pushes_a_child() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages.json"))
        .and(body_json(json!({
            "user_id": "42",
            "sender": "alice",
            "message": "hello",
            "timestamp": "2024-05-01T10:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "-NxPushKey"})))
        .expect(1)
        .mount(&server)
        .await;

    let msg = MessageRecord::new("42", "alice", "hello").with_timestamp("2024-05-01T10:00:00Z");
    store_for(&server).add_message(&msg).await.unwrap();
}

#[tokio::test]
async fn messages_for_user_sends_child_equality_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages.json"))
        .and(query_param("orderBy", "\"user_id\""))
        .and(query_param("equalTo", "\"42\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Na": {"user_id": "42", "sender": "alice", "message": "one", "timestamp": "2024-05-01T10:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = store_for(&server).messages_for_user("42", 100).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].body, "one");
}

#[tokio::test]
async fn listing_keeps_the_last_n_entries_in_timestamp_order() {
    let server = MockServer::start().await;
    // Push keys come back as an unordered JSON object.
    Mock::given(method("GET"))
        .and(path("/messages.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Nc": {"user_id": "42", "sender": "alice", "message": "third", "timestamp": "2024-05-01T12:00:00Z"},
            "-Na": {"user_id": "42", "sender": "alice", "message": "first", "timestamp": "2024-05-01T10:00:00Z"},
            "-Nb": {"user_id": "42", "sender": "alice", "message": "second", "timestamp": "2024-05-01T11:00:00Z"}
        })))
        .mount(&server)
        .await;

    let entries = store_for(&server).messages_for_user("42", 2).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].body, "second");
    assert_eq!(entries[1].body, "third");
}

#[tokio::test]
async fn empty_match_comes_back_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .mount(&server)
        .await;

    let entries = store_for(&server).messages_for_user("42", 100).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn auth_token_is_forwarded_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages.json"))
        .and(query_param("auth", "secret1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "-Nx"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = StoreConfig::new("test-project").with_realtime_endpoint(server.uri());
    config.api_key = Some("secret1".into());
    RealtimeStore::new(config)
        .add_message(&MessageRecord::new("42", "alice", "hello"))
        .await
        .unwrap();
}
