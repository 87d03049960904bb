pub mod records;

pub use records::{MessageEntry, MessageRecord, UserRecord};
