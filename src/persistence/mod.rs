//! The `persistence` module keeps a journal of published messages.
//!
//! The journal is a diagnostic record, not a replay source: new subscribers
//! never receive journaled messages. Its one behavioral effect is that a
//! journaled hub resumes its sequence numbers after a restart.
//!
//! It uses `sled` as an embedded key-value store.

pub mod sled_store;

pub use sled_store::{Journal, JournalEntry};
