//! Storage seam shared by both backends.
//!
//! The document store and the real-time store are interchangeable for the
//! message path and are meant as alternatives, never written in tandem.
//! Code that replays data (migration, tests) works against these traits and
//! stays ignorant of which backend it is feeding.

use async_trait::async_trait;

use roster_types::{MessageEntry, MessageRecord, UserRecord};

use crate::document::DocumentStore;
use crate::error::StoreError;
use crate::realtime::RealtimeStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create-or-replace by `user_id`. Full overwrite semantics.
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// `Err(StoreError::NotFound)` when no such member exists.
    async fn user(&self, user_id: &str) -> Result<UserRecord, StoreError>;

    /// All members, most recent joiner first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn update_label(&self, user_id: &str, label: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append_message(&self, message: &MessageRecord) -> Result<(), StoreError>;

    /// Oldest first, capped at `limit`.
    async fn messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageEntry>, StoreError>;
}

#[async_trait]
impl UserStore for DocumentStore {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        DocumentStore::upsert_user(self, user).await
    }

    async fn user(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        self.get_user(user_id).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        DocumentStore::list_users(self).await
    }

    async fn update_label(&self, user_id: &str, label: &str) -> Result<(), StoreError> {
        DocumentStore::update_label(self, user_id, label).await
    }
}

#[async_trait]
impl MessageStore for DocumentStore {
    async fn append_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        self.add_message(message).await
    }

    async fn messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageEntry>, StoreError> {
        DocumentStore::messages_for_user(self, user_id, limit).await
    }
}

#[async_trait]
impl MessageStore for RealtimeStore {
    async fn append_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        self.add_message(message).await
    }

    async fn messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MessageEntry>, StoreError> {
        RealtimeStore::messages_for_user(self, user_id, limit).await
    }
}
