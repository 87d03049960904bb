/// Record types shared by the store clients and the migration tool.
/// Distinct from any wire representation: the document and real-time
/// backends each encode these their own way.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A community member. Keyed in the document store by `user_id`, which is
/// always carried in string form even when the upstream identifier is
/// numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub full_name: String,
    pub username: String,
    /// ISO 8601 date/time of the member's first contact.
    pub join_date: String,
    pub invite_link: Option<String>,
    pub photo_url: Option<String>,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        user_id: impl Into<String>,
        full_name: impl Into<String>,
        username: impl Into<String>,
        join_date: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            full_name: full_name.into(),
            username: username.into(),
            join_date: join_date.into(),
            invite_link: None,
            photo_url: None,
            label: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A message attributed to a member. Append-only; the store assigns the key.
/// `user_id` is a soft reference — nothing enforces that the member exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub user_id: String,
    pub sender: String,
    pub body: String,
    /// ISO 8601; defaults to "now" when the caller does not supply one.
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(
        user_id: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            sender: sender.into(),
            body: body.into(),
            timestamp: now.to_rfc3339(),
            created_at: now,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// Projection returned by per-user listings: the identifier and store key
/// are dropped, leaving who said what, when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub sender: String,
    pub body: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_defaults_timestamp_to_now() {
        let before = Utc::now();
        let msg = MessageRecord::new("42", "alice", "hi");
        let ts: DateTime<Utc> = msg.timestamp.parse().unwrap();
        assert!(ts >= before && ts <= Utc::now());
    }

    #[test]
    fn with_timestamp_overrides_default() {
        let msg = MessageRecord::new("42", "alice", "hi").with_timestamp("2024-01-01T00:00:00Z");
        assert_eq!(msg.timestamp, "2024-01-01T00:00:00Z");
    }
}
