use thiserror::Error;

/// Store operations fail in ways callers may want to tell apart:
/// a missing record is not an outage, and an unconfigured store is neither.
/// The `Roster` façade flattens all of these into benign defaults; anything
/// building on the clients directly gets the full picture.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("store is not configured")]
    Unconfigured,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
