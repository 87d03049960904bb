use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use roster_types::{MessageEntry, MessageRecord, UserRecord};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::value::{self, Document};

/// Cap applied to message listings when the caller has no opinion.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 100;

const USERS: &str = "users";
const MESSAGES: &str = "messages";

/// Client for the document store: a `users` collection keyed by the member's
/// string identifier and a `messages` collection with server-assigned keys.
/// All methods are single round-trips; no retries, no batching.
pub struct DocumentStore {
    http: reqwest::Client,
    config: StoreConfig,
}

impl DocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Full-replace write at `users/{user_id}`. A PATCH without a field mask
    /// overwrites the entire document, so a previous label or photo does not
    /// survive an upsert that lacks one. `updated_at` is stamped here.
    pub async fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut record = user.clone();
        record.updated_at = chrono::Utc::now();
        let body = Document::from_fields(value::user_to_fields(&record));
        let resp = self
            .keyed(self.http.patch(self.doc_url(USERS, &record.user_id)))
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        debug!(user_id = %record.user_id, "user document replaced");
        Ok(())
    }

    /// `Err(NotFound)` when no document exists under that key.
    pub async fn get_user(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        let resp = self
            .keyed(self.http.get(self.doc_url(USERS, user_id)))
            .send()
            .await?;
        let doc: Document = read_json(check(resp).await?).await?;
        Ok(value::user_from_document(&doc))
    }

    /// Every user, most recent joiner first. Unbounded: the caller eats the
    /// whole collection.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let query = json!({
            "structuredQuery": {
                "from": [{"collectionId": USERS}],
                "orderBy": [{"field": {"fieldPath": "join_date"}, "direction": "DESCENDING"}],
            }
        });
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(value::user_from_document).collect())
    }

    /// Partial update of `label` (plus `updated_at`) guarded by an exists
    /// precondition, so a label for an unknown member is `NotFound` rather
    /// than a silent document creation.
    pub async fn update_label(&self, user_id: &str, label: &str) -> Result<(), StoreError> {
        let body = Document::from_fields(
            [
                ("label".to_string(), value::Value::string(label)),
                ("updated_at".to_string(), value::Value::Timestamp(chrono::Utc::now())),
            ]
            .into(),
        );
        let resp = self
            .keyed(self.http.patch(self.doc_url(USERS, user_id)))
            .query(&[
                ("updateMask.fieldPaths", "label"),
                ("updateMask.fieldPaths", "updated_at"),
                ("currentDocument.exists", "true"),
            ])
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        debug!(user_id, label, "user label updated");
        Ok(())
    }

    /// Append under a store-generated key.
    pub async fn add_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        let body = Document::from_fields(value::message_to_fields(message));
        let resp = self
            .keyed(self.http.post(self.collection_url(MESSAGES)))
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        debug!(user_id = %message.user_id, "message appended");
        Ok(())
    }

    /// One member's messages, oldest first, capped at `limit`.
    pub async fn messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageEntry>, StoreError> {
        let query = json!({
            "structuredQuery": {
                "from": [{"collectionId": MESSAGES}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "user_id"},
                        "op": "EQUAL",
                        "value": {"stringValue": user_id},
                    }
                },
                "orderBy": [{"field": {"fieldPath": "timestamp"}, "direction": "ASCENDING"}],
                "limit": limit,
            }
        });
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(value::entry_from_document).collect())
    }

    /// The global message feed, newest first, capped at `limit`.
    pub async fn list_messages(&self, limit: u32) -> Result<Vec<MessageRecord>, StoreError> {
        let query = json!({
            "structuredQuery": {
                "from": [{"collectionId": MESSAGES}],
                "orderBy": [{"field": {"fieldPath": "timestamp"}, "direction": "DESCENDING"}],
                "limit": limit,
            }
        });
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(value::message_from_document).collect())
    }

    pub(crate) async fn run_query(
        &self,
        query: serde_json::Value,
    ) -> Result<Vec<Document>, StoreError> {
        let url = format!("{}:runQuery", self.config.documents_url());
        let resp = self.keyed(self.http.post(url)).json(&query).send().await?;
        let rows: Vec<QueryRow> = read_json(check(resp).await?).await?;
        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.config.documents_url(), collection, id)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.config.documents_url(), collection)
    }

    fn keyed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.query(&[("key", key)]),
            None => req,
        }
    }
}

/// A `runQuery` response interleaves matched documents with bookkeeping rows
/// (read times, partial progress) that carry no `document`.
#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    document: Option<Document>,
}

pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(StoreError::Backend {
        status: status.as_u16(),
        message,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, StoreError> {
    let raw = resp.text().await?;
    serde_json::from_str(&raw).map_err(|e| StoreError::Malformed(e.to_string()))
}
