pub mod config;
pub mod document;
pub mod error;
pub mod realtime;
pub mod stats;
pub mod store;
pub mod value;

use std::path::Path;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use roster_types::{MessageEntry, MessageRecord, UserRecord};

pub use config::{Credentials, StoreConfig};
pub use document::{DEFAULT_MESSAGE_LIMIT, DocumentStore};
pub use error::StoreError;
pub use realtime::RealtimeStore;
pub use stats::DEFAULT_ACTIVE_WINDOW_MINUTES;
pub use store::{MessageStore, UserStore};

/// Default-on-failure façade over both backends.
///
/// Every method funnels a client error into a benign default (`false`,
/// `None`, empty vec, `0`) after logging it, so a caller wired to `Roster`
/// never crashes on an outage — and, deliberately, can never tell "no data"
/// from "store down" on the read paths. Callers that need the distinction
/// use [`DocumentStore`] / [`RealtimeStore`] directly.
pub struct Roster {
    documents: Option<DocumentStore>,
    realtime: Option<RealtimeStore>,
}

impl Roster {
    /// Build from a credential file. A missing or unreadable file yields an
    /// unconfigured façade on which every operation reports failure.
    pub fn connect(credentials_path: impl AsRef<Path>) -> Self {
        let config = Credentials::load(credentials_path)
            .as_ref()
            .map(StoreConfig::from_credentials);
        Self::from_config(config)
    }

    pub fn from_config(config: Option<StoreConfig>) -> Self {
        match config {
            Some(config) => {
                info!(project_id = %config.project_id, "roster store configured");
                Self {
                    documents: Some(DocumentStore::new(config.clone())),
                    realtime: Some(RealtimeStore::new(config)),
                }
            }
            None => {
                warn!("roster store unconfigured; all operations will report failure");
                Self {
                    documents: None,
                    realtime: None,
                }
            }
        }
    }

    pub fn document_store(&self) -> Option<&DocumentStore> {
        self.documents.as_ref()
    }

    pub fn realtime_store(&self) -> Option<&RealtimeStore> {
        self.realtime.as_ref()
    }

    // -- Users --

    pub async fn add_user(&self, user: &UserRecord) -> bool {
        let Some(docs) = self.documents() else { return false };
        match docs.upsert_user(user).await {
            Ok(()) => {
                info!(user_id = %user.user_id, "user upserted");
                true
            }
            Err(e) => {
                error!(user_id = %user.user_id, error = %e, "failed to upsert user");
                false
            }
        }
    }

    /// `None` covers both "no such member" and "store unreachable"; the two
    /// are only told apart in the log line.
    pub async fn user(&self, user_id: &str) -> Option<UserRecord> {
        let docs = self.documents()?;
        match docs.get_user(user_id).await {
            Ok(user) => Some(user),
            Err(StoreError::NotFound) => {
                debug!(user_id, "user not found");
                None
            }
            Err(e) => {
                error!(user_id, error = %e, "failed to fetch user");
                None
            }
        }
    }

    pub async fn users(&self) -> Vec<UserRecord> {
        let Some(docs) = self.documents() else { return Vec::new() };
        docs.list_users().await.unwrap_or_else(|e| {
            error!(error = %e, "failed to list users");
            Vec::new()
        })
    }

    pub async fn set_label(&self, user_id: &str, label: &str) -> bool {
        let Some(docs) = self.documents() else { return false };
        match docs.update_label(user_id, label).await {
            Ok(()) => {
                info!(user_id, label, "user label updated");
                true
            }
            Err(e) => {
                error!(user_id, label, error = %e, "failed to update label");
                false
            }
        }
    }

    // -- Messages (document store) --

    pub async fn add_message(&self, message: &MessageRecord) -> bool {
        let Some(docs) = self.documents() else { return false };
        match docs.add_message(message).await {
            Ok(()) => {
                info!(user_id = %message.user_id, "message saved");
                true
            }
            Err(e) => {
                error!(user_id = %message.user_id, error = %e, "failed to save message");
                false
            }
        }
    }

    pub async fn user_messages(&self, user_id: &str, limit: u32) -> Vec<MessageEntry> {
        let Some(docs) = self.documents() else { return Vec::new() };
        docs.messages_for_user(user_id, limit).await.unwrap_or_else(|e| {
            error!(user_id, error = %e, "failed to list user messages");
            Vec::new()
        })
    }

    pub async fn recent_messages(&self, limit: u32) -> Vec<MessageRecord> {
        let Some(docs) = self.documents() else { return Vec::new() };
        docs.list_messages(limit).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to list messages");
            Vec::new()
        })
    }

    // -- Statistics --

    pub async fn total_users(&self) -> usize {
        let Some(docs) = self.documents() else { return 0 };
        docs.total_users().await.unwrap_or_else(|e| {
            error!(error = %e, "failed to count users");
            0
        })
    }

    pub async fn total_messages(&self) -> usize {
        let Some(docs) = self.documents() else { return 0 };
        docs.total_messages().await.unwrap_or_else(|e| {
            error!(error = %e, "failed to count messages");
            0
        })
    }

    pub async fn active_users(&self, window: Duration) -> usize {
        let Some(docs) = self.documents() else { return 0 };
        docs.active_users(window).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to count active users");
            0
        })
    }

    pub async fn joins_today(&self) -> usize {
        let Some(docs) = self.documents() else { return 0 };
        docs.joins_today().await.unwrap_or_else(|e| {
            error!(error = %e, "failed to count today's joins");
            0
        })
    }

    // -- Messages (real-time store alternative) --

    pub async fn add_message_realtime(&self, message: &MessageRecord) -> bool {
        let Some(rt) = self.realtime_checked() else { return false };
        match rt.add_message(message).await {
            Ok(()) => {
                info!(user_id = %message.user_id, "message saved to realtime store");
                true
            }
            Err(e) => {
                error!(user_id = %message.user_id, error = %e, "failed to save message to realtime store");
                false
            }
        }
    }

    pub async fn user_messages_realtime(&self, user_id: &str, limit: u32) -> Vec<MessageEntry> {
        let Some(rt) = self.realtime_checked() else { return Vec::new() };
        rt.messages_for_user(user_id, limit).await.unwrap_or_else(|e| {
            error!(user_id, error = %e, "failed to list user messages from realtime store");
            Vec::new()
        })
    }

    fn documents(&self) -> Option<&DocumentStore> {
        if self.documents.is_none() {
            warn!("document store handle missing (unconfigured)");
        }
        self.documents.as_ref()
    }

    fn realtime_checked(&self) -> Option<&RealtimeStore> {
        if self.realtime.is_none() {
            warn!("realtime store handle missing (unconfigured)");
        }
        self.realtime.as_ref()
    }
}
