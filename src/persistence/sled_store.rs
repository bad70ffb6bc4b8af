use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};

use crate::domain::Message;
use crate::utils::error::JournalError;

const MESSAGES_TREE: &str = "messages";
const LAST_SEQUENCE_KEY: &[u8] = b"last_sequence";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub sequence: u64,
    pub payload: String,
    pub published_at: i64,
}

impl From<&Message> for JournalEntry {
    fn from(message: &Message) -> Self {
        Self {
            sequence: message.sequence,
            payload: message.payload.clone(),
            published_at: message.published_at,
        }
    }
}

/// Append-only log of published messages.
///
/// Entries are keyed by big-endian sequence number so iteration order is
/// publish order. The highest sequence ever appended is stored separately
/// and survives pruning.
#[derive(Clone)]
pub struct Journal {
    db: Db,
    messages: Tree,
    retention: Option<Duration>,
    max_entries: Option<usize>,
}

impl Journal {
    pub fn open(
        path: impl AsRef<Path>,
        retention: Option<Duration>,
        max_entries: Option<usize>,
    ) -> Result<Self, JournalError> {
        let db = sled::open(path)?;
        let messages = db.open_tree(MESSAGES_TREE)?;
        Ok(Self {
            db,
            messages,
            retention,
            max_entries,
        })
    }

    pub fn append(&self, message: &Message) -> Result<(), JournalError> {
        let entry = JournalEntry::from(message);
        let serialized = serde_json::to_vec(&entry)?;

        self.messages.insert(entry.sequence.to_be_bytes(), serialized)?;
        if entry.sequence > self.last_sequence()? {
            self.db
                .insert(LAST_SEQUENCE_KEY, entry.sequence.to_be_bytes().to_vec())?;
        }

        self.drop_overflow(entry.sequence)?;
        self.drop_expired()?;
        Ok(())
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        self.drop_expired()?;
        self.messages
            .iter()
            .values()
            .map(|value| -> Result<JournalEntry, JournalError> {
                Ok(serde_json::from_slice(&value?)?)
            })
            .collect()
    }

    /// Highest sequence number ever appended, or 0 for a fresh journal.
    pub fn last_sequence(&self) -> Result<u64, JournalError> {
        Ok(self
            .db
            .get(LAST_SEQUENCE_KEY)?
            .and_then(|raw| decode_sequence(&raw))
            .unwrap_or(0))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub async fn flush(&self) -> Result<(), JournalError> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn drop_overflow(&self, newest: u64) -> Result<(), JournalError> {
        let Some(max) = self.max_entries else {
            return Ok(());
        };
        // keep sequences in (newest - max, newest]
        let keep_from = newest.saturating_sub(max as u64).saturating_add(1);
        let stale: Vec<_> = self
            .messages
            .range(..keep_from.to_be_bytes())
            .keys()
            .collect::<Result<_, _>>()?;
        for key in stale {
            self.messages.remove(key)?;
        }
        Ok(())
    }

    fn drop_expired(&self) -> Result<(), JournalError> {
        let Some(ttl) = self.retention else {
            return Ok(());
        };
        let expiry = Utc::now().timestamp_millis() - ttl.as_millis() as i64;

        for item in self.messages.iter() {
            let (key, value) = item?;
            let entry: JournalEntry = serde_json::from_slice(&value)?;
            if entry.published_at >= expiry {
                break;
            }
            self.messages.remove(key)?;
        }
        Ok(())
    }
}

fn decode_sequence(raw: &[u8]) -> Option<u64> {
    <[u8; 8]>::try_from(raw).ok().map(u64::from_be_bytes)
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("db", &"sled::Db")
            .field("retention", &self.retention)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
