use chrono::Duration;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use roster_store::{
    DEFAULT_ACTIVE_WINDOW_MINUTES, DEFAULT_MESSAGE_LIMIT, Roster, StoreConfig,
};
use roster_types::{MessageRecord, UserRecord};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("roster_store=debug")
        .try_init();
}

/// A missing credential file must leave every operation at its benign
/// default — no panics, no errors surfaced.
#[tokio::test]
async fn unconfigured_facade_returns_defaults() {
    init_logging();
    let roster = Roster::connect("/no/such/credentials.json");

    assert!(roster.document_store().is_none());
    assert!(roster.realtime_store().is_none());

    let user = UserRecord::new("42", "Alice Doe", "alice", "2024-05-01T10:00:00Z");
    let msg = MessageRecord::new("42", "alice", "hello");

    assert!(!roster.add_user(&user).await);
    assert!(roster.user("42").await.is_none());
    assert!(roster.users().await.is_empty());
    assert!(!roster.set_label("42", "vip").await);
    assert!(!roster.add_message(&msg).await);
    assert!(roster.user_messages("42", DEFAULT_MESSAGE_LIMIT).await.is_empty());
    assert!(roster.recent_messages(DEFAULT_MESSAGE_LIMIT).await.is_empty());
    assert_eq!(roster.total_users().await, 0);
    assert_eq!(roster.total_messages().await, 0);
    assert_eq!(
        roster
            .active_users(Duration::minutes(DEFAULT_ACTIVE_WINDOW_MINUTES))
            .await,
        0
    );
    assert_eq!(roster.joins_today().await, 0);
    assert!(!roster.add_message_realtime(&msg).await);
    assert!(roster.user_messages_realtime("42", 100).await.is_empty());
}

/// With a backend that is down (every call 503s), the façade logs and
/// defaults instead of propagating.
#[tokio::test]
async fn backend_outage_is_flattened_to_defaults() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let config = StoreConfig::new("test-project")
        .with_document_endpoint(server.uri())
        .with_realtime_endpoint(server.uri());
    let roster = Roster::from_config(Some(config));

    let user = UserRecord::new("42", "Alice Doe", "alice", "2024-05-01T10:00:00Z");
    let msg = MessageRecord::new("42", "alice", "hello");

    assert!(!roster.add_user(&user).await);
    assert!(roster.user("42").await.is_none());
    assert!(roster.users().await.is_empty());
    assert!(!roster.set_label("42", "vip").await);
    assert!(roster.user_messages("42", 100).await.is_empty());
    assert_eq!(roster.total_messages().await, 0);
    assert!(!roster.add_message_realtime(&msg).await);
    assert!(roster.user_messages_realtime("42", 100).await.is_empty());
}

/// Not-found on the single-record fetch is reported as absence, same as the
/// failure default; the caller sees `None` either way.
#[tokio::test]
async fn missing_user_is_reported_as_absence() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&server)
        .await;

    let config = StoreConfig::new("test-project").with_document_endpoint(server.uri());
    let roster = Roster::from_config(Some(config));

    assert!(roster.user("7").await.is_none());
}
