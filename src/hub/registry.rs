//! Subscription registry
//!
//! The registry maps subscription handles to live [`Subscriber`] entries and
//! owns the publish sequence counter. Everything sits behind one
//! registry-wide lock which is only held for in-memory bookkeeping, never
//! across sink I/O.
//!
//! Publishing takes a [`Snapshot`]: the next sequence number and a copy of
//! the current entries, both read in the same critical section. A subscribe
//! that completes after the snapshot is therefore never part of it, and one
//! that completes before always is.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{Sink, Subscriber, SubscriberId, SubscriptionHandle};
use crate::utils::error::HubError;

#[derive(Default)]
struct Inner {
    entries: HashMap<SubscriptionHandle, Arc<Subscriber>>,
    last_sequence: u64,
}

/// Point-in-time copy of the registry taken by a publish.
#[derive(Debug)]
pub struct Snapshot {
    pub sequence: u64,
    pub targets: Vec<Arc<Subscriber>>,
}

#[derive(Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose first publish gets `last_sequence + 1`.
    pub fn starting_after(last_sequence: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                last_sequence,
            }),
        }
    }

    // The lock guards plain maps and counters; a panic while holding it
    // cannot leave them half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(
        &self,
        id: SubscriberId,
        sink: Arc<dyn Sink>,
    ) -> Result<SubscriptionHandle, HubError> {
        self.insert_with_handle(SubscriptionHandle::generate(), id, sink)
    }

    pub(crate) fn insert_with_handle(
        &self,
        handle: SubscriptionHandle,
        id: SubscriberId,
        sink: Arc<dyn Sink>,
    ) -> Result<SubscriptionHandle, HubError> {
        let mut inner = self.lock();
        let joined_after = inner.last_sequence;
        match inner.entries.entry(handle) {
            Entry::Occupied(_) => Err(HubError::AlreadySubscribed(handle)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Subscriber::new(handle, id, sink, joined_after)));
                Ok(handle)
            }
        }
    }

    pub fn remove(&self, handle: &SubscriptionHandle) -> Result<Arc<Subscriber>, HubError> {
        self.lock()
            .entries
            .remove(handle)
            .ok_or(HubError::NotFound(*handle))
    }

    /// Drops `subscriber` after a failed delivery.
    ///
    /// Returns `false` when the entry is already gone, e.g. because it was
    /// unsubscribed while the delivery was in flight.
    pub fn evict(&self, subscriber: &Arc<Subscriber>) -> bool {
        let mut inner = self.lock();
        match inner.entries.get(&subscriber.handle()) {
            Some(current) if Arc::ptr_eq(current, subscriber) => {
                inner.entries.remove(&subscriber.handle());
                true
            }
            _ => false,
        }
    }

    /// Assigns the next sequence number and copies the current entries.
    pub fn snapshot(&self) -> Snapshot {
        let mut inner = self.lock();
        inner.last_sequence += 1;
        Snapshot {
            sequence: inner.last_sequence,
            targets: inner.entries.values().cloned().collect(),
        }
    }

    pub fn contains(&self, handle: &SubscriptionHandle) -> bool {
        self.lock().entries.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_sequence(&self) -> u64 {
        self.lock().last_sequence
    }

    /// Handles currently registered under `id`.
    pub fn handles_of(&self, id: &str) -> Vec<SubscriptionHandle> {
        self.lock()
            .entries
            .values()
            .filter(|sub| sub.id() == id)
            .map(|sub| sub.handle())
            .collect()
    }
}
