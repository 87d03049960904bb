//! One-shot migration of the legacy SQLite database into a remote store.
//!
//! Rows are replayed through the [`UserStore`] / [`MessageStore`] traits, so
//! the destination can be the document store, the real-time store, or
//! anything else implementing the seam. There is no transactionality across
//! rows: the first replay failure aborts with the progress so far in the
//! error context, and already-replayed rows stay written.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use roster_store::{MessageStore, UserStore};

pub mod source;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MigrationReport {
    pub users: usize,
    pub messages: usize,
}

pub async fn migrate(
    path: &Path,
    users: &dyn UserStore,
    messages: &dyn MessageStore,
) -> Result<MigrationReport> {
    let snapshot = source::read(path)?;
    info!(
        users = snapshot.users.len(),
        messages = snapshot.messages.len(),
        "migration source read, replaying"
    );

    let mut report = MigrationReport { users: 0, messages: 0 };

    for user in &snapshot.users {
        users
            .upsert_user(user)
            .await
            .with_context(|| format!("migrating user {} after {} users", user.user_id, report.users))?;
        report.users += 1;
    }

    for message in &snapshot.messages {
        messages.append_message(message).await.with_context(|| {
            format!(
                "migrating message for user {} after {} messages",
                message.user_id, report.messages
            )
        })?;
        report.messages += 1;
    }

    info!(users = report.users, messages = report.messages, "migration complete");
    Ok(report)
}
