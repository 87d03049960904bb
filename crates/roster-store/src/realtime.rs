use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use roster_types::{MessageEntry, MessageRecord};

use crate::config::StoreConfig;
use crate::document::{check, read_json};
use crate::error::StoreError;

/// Client for the tree-structured real-time store: a single `messages` node
/// holding push-keyed children, filtered by child-value equality.
///
/// This is a standalone alternative to [`crate::DocumentStore`]'s message
/// path. Nothing reconciles the two; a deployment picks one and stays there.
pub struct RealtimeStore {
    http: reqwest::Client,
    config: StoreConfig,
}

/// Child shape under `/messages`. The body has always been stored under
/// `message` on this side too.
#[derive(Debug, Serialize, Deserialize)]
struct RealtimeMessage {
    user_id: String,
    sender: String,
    message: String,
    timestamp: String,
}

impl RealtimeStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Append under a push-generated key. The key the store picked is not
    /// surfaced; callers never address individual messages.
    pub async fn add_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        let child = RealtimeMessage {
            user_id: message.user_id.clone(),
            sender: message.sender.clone(),
            message: message.body.clone(),
            timestamp: message.timestamp.clone(),
        };
        let resp = self
            .authed(self.http.post(self.node_url()))
            .json(&child)
            .send()
            .await?;
        check(resp).await?;
        debug!(user_id = %message.user_id, "message pushed to realtime store");
        Ok(())
    }

    /// One member's messages via a child-equality filter, oldest first,
    /// keeping only the **last** `limit` entries (the store filter itself is
    /// unbounded). An empty match comes back from the store as JSON `null`.
    pub async fn messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageEntry>, StoreError> {
        // The filter params are JSON-encoded, so the quotes are part of the
        // value: orderBy="user_id"&equalTo="<id>".
        let resp = self
            .authed(self.http.get(self.node_url()))
            .query(&[
                ("orderBy", "\"user_id\"".to_string()),
                ("equalTo", format!("\"{user_id}\"")),
            ])
            .send()
            .await?;
        let children: Option<BTreeMap<String, RealtimeMessage>> =
            read_json(check(resp).await?).await?;

        let mut entries: Vec<MessageEntry> = children
            .unwrap_or_default()
            .into_values()
            .map(|child| MessageEntry {
                sender: child.sender,
                body: child.message,
                timestamp: child.timestamp,
            })
            .collect();
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        let limit = limit as usize;
        if entries.len() > limit {
            entries.drain(..entries.len() - limit);
        }
        Ok(entries)
    }

    fn node_url(&self) -> String {
        format!("{}/messages.json", self.config.realtime_endpoint)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => req.query(&[("auth", key)]),
            None => req,
        }
    }
}
