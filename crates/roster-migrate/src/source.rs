//! Reading the legacy SQLite database.
//!
//! The legacy schema is fixed; rather than trusting column positions, the
//! whole schema is checked up front and every SELECT names its columns, so
//! a reordered or renamed column fails the migration before any row is
//! replayed instead of silently misassigning fields.

use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use roster_types::{MessageRecord, UserRecord};

pub const USER_COLUMNS: &[&str] = &[
    "user_id",
    "full_name",
    "username",
    "join_date",
    "invite_link",
    "photo_url",
    "label",
];

pub const MESSAGE_COLUMNS: &[&str] = &["msg_id", "user_id", "sender", "message", "timestamp"];

/// Everything the legacy database holds, read in one pass. The connection
/// is closed before any replay starts.
pub struct Snapshot {
    pub users: Vec<UserRecord>,
    pub messages: Vec<MessageRecord>,
}

pub fn read(path: &Path) -> Result<Snapshot> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("opening migration source {}", path.display()))?;

    verify_schema(&conn, "users", USER_COLUMNS)?;
    verify_schema(&conn, "messages", MESSAGE_COLUMNS)?;

    let users = read_users(&conn).context("reading users table")?;
    let messages = read_messages(&conn).context("reading messages table")?;
    Ok(Snapshot { users, messages })
}

fn verify_schema(conn: &Connection, table: &str, expected: &[&str]) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))?
        .collect::<std::result::Result<_, _>>()?;
    if columns.is_empty() {
        bail!("table `{table}` not found in migration source");
    }
    columns.sort();
    let mut want: Vec<&str> = expected.to_vec();
    want.sort();
    if columns != want {
        bail!("table `{table}` has columns {columns:?}, expected {want:?}");
    }
    Ok(())
}

fn read_users(conn: &Connection) -> Result<Vec<UserRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, full_name, username, join_date, invite_link, photo_url, label
         FROM users",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let mut user = UserRecord::new(
                id_text(row.get_ref(0)?)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            );
            user.invite_link = row.get(4)?;
            user.photo_url = row.get(5)?;
            user.label = row.get(6)?;
            Ok(user)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn read_messages(conn: &Connection) -> Result<Vec<MessageRecord>> {
    // msg_id is deliberately dropped: the target stores assign their own keys.
    let mut stmt = conn.prepare("SELECT user_id, sender, message, timestamp FROM messages")?;
    let rows = stmt
        .query_map([], |row| {
            let mut message = MessageRecord::new(
                id_text(row.get_ref(0)?)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            );
            if let Some(ts) = row.get::<_, Option<String>>(3)? {
                message = message.with_timestamp(ts);
            }
            Ok(message)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Legacy identifiers are INTEGER in some deployments and TEXT in others;
/// either way they become the string document key.
fn id_text(value: ValueRef<'_>) -> rusqlite::Result<String> {
    match value {
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Text(t) => Ok(String::from_utf8_lossy(t).into_owned()),
        other => Err(rusqlite::Error::InvalidColumnType(
            0,
            "user_id".into(),
            other.data_type(),
        )),
    }
}
