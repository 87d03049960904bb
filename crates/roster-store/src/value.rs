//! Wire representation of the document store's REST surface.
//!
//! Every field rides inside a single-key object naming its kind
//! (`{"stringValue": "..."}`); integers are string-encoded on the wire.
//! Decoding is lenient the way the store itself is schema-less: a missing
//! or differently-typed field falls back to a default instead of failing
//! the whole document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use roster_types::{MessageEntry, MessageRecord, UserRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "integerValue")]
    Integer(String),
    #[serde(rename = "booleanValue")]
    Bool(bool),
    #[serde(rename = "timestampValue")]
    Timestamp(DateTime<Utc>),
    #[serde(rename = "nullValue")]
    Null(()),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn integer(i: i64) -> Self {
        Value::Integer(i.to_string())
    }

    /// `None` becomes an explicit null field, matching how the original
    /// records were written (absent optionals are stored, not omitted).
    pub fn opt_string(opt: &Option<String>) -> Self {
        match opt {
            Some(s) => Value::String(s.clone()),
            None => Value::Null(()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One document as the REST surface sees it. `name` is the full resource
/// path and is absent on writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self { name: String::new(), fields }
    }

    pub fn str_or_default(&self, field: &str) -> String {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn opt_string(&self, field: &str) -> Option<String> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn timestamp_or_default(&self, field: &str) -> DateTime<Utc> {
        match self.fields.get(field) {
            Some(Value::Timestamp(ts)) => *ts,
            _ => DateTime::<Utc>::default(),
        }
    }
}

pub fn user_to_fields(user: &UserRecord) -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("user_id".to_string(), Value::string(&user.user_id)),
        ("full_name".to_string(), Value::string(&user.full_name)),
        ("username".to_string(), Value::string(&user.username)),
        ("join_date".to_string(), Value::string(&user.join_date)),
        ("invite_link".to_string(), Value::opt_string(&user.invite_link)),
        ("photo_url".to_string(), Value::opt_string(&user.photo_url)),
        ("label".to_string(), Value::opt_string(&user.label)),
        ("created_at".to_string(), Value::Timestamp(user.created_at)),
        ("updated_at".to_string(), Value::Timestamp(user.updated_at)),
    ])
}

pub fn user_from_document(doc: &Document) -> UserRecord {
    UserRecord {
        user_id: doc.str_or_default("user_id"),
        full_name: doc.str_or_default("full_name"),
        username: doc.str_or_default("username"),
        join_date: doc.str_or_default("join_date"),
        invite_link: doc.opt_string("invite_link"),
        photo_url: doc.opt_string("photo_url"),
        label: doc.opt_string("label"),
        created_at: doc.timestamp_or_default("created_at"),
        updated_at: doc.timestamp_or_default("updated_at"),
    }
}

pub fn message_to_fields(message: &MessageRecord) -> BTreeMap<String, Value> {
    BTreeMap::from([
        ("user_id".to_string(), Value::string(&message.user_id)),
        ("sender".to_string(), Value::string(&message.sender)),
        // The body has always been stored under "message".
        ("message".to_string(), Value::string(&message.body)),
        ("timestamp".to_string(), Value::string(&message.timestamp)),
        ("created_at".to_string(), Value::Timestamp(message.created_at)),
    ])
}

pub fn message_from_document(doc: &Document) -> MessageRecord {
    MessageRecord {
        user_id: doc.str_or_default("user_id"),
        sender: doc.str_or_default("sender"),
        body: doc.str_or_default("message"),
        timestamp: doc.str_or_default("timestamp"),
        created_at: doc.timestamp_or_default("created_at"),
    }
}

pub fn entry_from_document(doc: &Document) -> MessageEntry {
    MessageEntry {
        sender: doc.str_or_default("sender"),
        body: doc.str_or_default("message"),
        timestamp: doc.str_or_default("timestamp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_serialize_in_wire_form() {
        assert_eq!(serde_json::to_value(Value::string("hi")).unwrap(), json!({"stringValue": "hi"}));
        assert_eq!(serde_json::to_value(Value::integer(42)).unwrap(), json!({"integerValue": "42"}));
        assert_eq!(serde_json::to_value(Value::Null(())).unwrap(), json!({"nullValue": null}));
        assert_eq!(serde_json::to_value(Value::Bool(true)).unwrap(), json!({"booleanValue": true}));
    }

    #[test]
    fn user_round_trips_through_fields() {
        let mut user = UserRecord::new("42", "Alice Doe", "alice", "2024-05-01T10:00:00Z");
        user.label = Some("vip".into());
        let doc = Document::from_fields(user_to_fields(&user));
        let json = serde_json::to_value(&doc).unwrap();
        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(user_from_document(&back), user);
    }

    #[test]
    fn decoding_tolerates_missing_and_null_fields() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/7",
            "fields": {
                "user_id": {"stringValue": "7"},
                "invite_link": {"nullValue": null}
            }
        }))
        .unwrap();
        let user = user_from_document(&doc);
        assert_eq!(user.user_id, "7");
        assert_eq!(user.full_name, "");
        assert_eq!(user.invite_link, None);
        assert_eq!(user.label, None);
    }

    #[test]
    fn message_entry_drops_identifier() {
        let msg = MessageRecord::new("42", "alice", "hello").with_timestamp("2024-05-01T10:00:00Z");
        let doc = Document::from_fields(message_to_fields(&msg));
        let entry = entry_from_document(&doc);
        assert_eq!(
            entry,
            MessageEntry {
                sender: "alice".into(),
                body: "hello".into(),
                timestamp: "2024-05-01T10:00:00Z".into(),
            }
        );
    }
}
