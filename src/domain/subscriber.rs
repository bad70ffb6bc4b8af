use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Sink;

/// Caller-supplied logical identity of a subscriber (e.g. a user id).
pub type SubscriberId = String;

/// Opaque token naming one subscription instance.
///
/// One subscriber id may own many handles; handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One registered subscription.
///
/// An entry is created on subscribe and dropped from the registry on
/// unsubscribe or on the first failed delivery; it is never revived.
pub struct Subscriber {
    handle: SubscriptionHandle,
    id: SubscriberId,
    sink: Arc<dyn Sink>,
    alive: AtomicBool,
    joined_after: u64,
}

impl Subscriber {
    /// `joined_after` is the last sequence number published before this entry
    /// was registered.
    pub fn new(
        handle: SubscriptionHandle,
        id: SubscriberId,
        sink: Arc<dyn Sink>,
        joined_after: u64,
    ) -> Self {
        Self {
            handle,
            id,
            sink,
            alive: AtomicBool::new(true),
            joined_after,
        }
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn joined_after(&self) -> u64 {
        self.joined_after
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Flags the entry as disconnected. Returns `true` for the first caller only.
    pub fn mark_dead(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("handle", &self.handle)
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .field("joined_after", &self.joined_after)
            .finish()
    }
}
