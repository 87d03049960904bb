//! Scan-based statistics over the document store.
//!
//! None of these use server-side aggregation: each one pulls the matching
//! documents and counts client-side, so cost is linear in collection size.
//! That mirrors how the numbers were always computed for this dataset,
//! which is small enough not to care.

use std::collections::HashSet;

use chrono::{Duration, Local, Utc};
use serde_json::json;

use crate::document::DocumentStore;
use crate::error::StoreError;

/// Trailing window, in minutes, for [`DocumentStore::active_users`] when
/// the caller has no opinion.
pub const DEFAULT_ACTIVE_WINDOW_MINUTES: i64 = 60;

impl DocumentStore {
    pub async fn total_users(&self) -> Result<usize, StoreError> {
        let query = json!({
            "structuredQuery": {"from": [{"collectionId": "users"}]}
        });
        Ok(self.run_query(query).await?.len())
    }

    pub async fn total_messages(&self) -> Result<usize, StoreError> {
        let query = json!({
            "structuredQuery": {"from": [{"collectionId": "messages"}]}
        });
        Ok(self.run_query(query).await?.len())
    }

    /// Distinct members who posted within the trailing window. Messages
    /// timestamped strictly before `now - window` do not count. Timestamps
    /// are RFC 3339 strings, so the cutoff comparison is lexicographic on
    /// the store side.
    pub async fn active_users(&self, window: Duration) -> Result<usize, StoreError> {
        let cutoff = (Utc::now() - window).to_rfc3339();
        let query = json!({
            "structuredQuery": {
                "from": [{"collectionId": "messages"}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "timestamp"},
                        "op": "GREATER_THAN_OR_EQUAL",
                        "value": {"stringValue": cutoff},
                    }
                },
            }
        });
        let docs = self.run_query(query).await?;
        let seen: HashSet<String> = docs
            .iter()
            .map(|doc| doc.str_or_default("user_id"))
            .collect();
        Ok(seen.len())
    }

    /// Members whose join date falls on the current local day.
    pub async fn joins_today(&self) -> Result<usize, StoreError> {
        let today = Local::now().date_naive().to_string();
        let query = json!({
            "structuredQuery": {
                "from": [{"collectionId": "users"}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "join_date"},
                        "op": "GREATER_THAN_OR_EQUAL",
                        "value": {"stringValue": today},
                    }
                },
            }
        });
        Ok(self.run_query(query).await?.len())
    }
}
