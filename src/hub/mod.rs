//! Notification hub backends.
//!
//! Two implementations of [`Hub`](crate::domain::Hub) are provided:
//!
//! - [`InMemoryHub`]: registry and sequence counter live in memory only.
//! - [`JournaledHub`]: same fan-out, plus a sled journal of every published
//!   message; sequence numbers continue across restarts.
//!
//! Both compose the same building blocks:
//!
//! ```text
//! publish ──► Dispatcher ──► Registry::snapshot ──► delivery::fan_out ──► Sink, Sink, ...
//!                 │                                        │
//!                 └──── evict failed entries ◄─────────────┘
//! ```
//!
//! Concurrency notes:
//! - `subscribe`/`unsubscribe` only take the registry lock, never an async lock.
//! - Publishes are serialized by the dispatcher's gate so that every sink sees
//!   messages in sequence order.
//! - A sink that errors or exceeds the write timeout is removed before the
//!   publish returns. Sinks cut off by a caller deadline are kept.

pub mod delivery;
pub mod dispatch;
pub mod journaled;
pub mod memory;
pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{Backend, HubSettings};
use crate::domain::Hub;
use crate::persistence::Journal;
use crate::utils::error::HubError;

pub use journaled::JournaledHub;
pub use memory::InMemoryHub;

pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the backend selected by `settings`.
///
/// For the journal backend the journal is opened here and handed to the hub,
/// which owns it from then on.
pub fn build(settings: &HubSettings) -> Result<Arc<dyn Hub>, HubError> {
    let hub: Arc<dyn Hub> = match settings.backend {
        Backend::Memory => Arc::new(InMemoryHub::new(settings.write_timeout())),
        Backend::Journal => {
            let journal = Journal::open(
                &settings.journal_path,
                settings.journal_retention(),
                settings.journal_max_entries(),
            )?;
            Arc::new(JournaledHub::new(journal, settings.write_timeout())?)
        }
    };

    info!(
        backend = hub.backend(),
        write_timeout_ms = settings.write_timeout_ms,
        "notification hub ready"
    );
    Ok(hub)
}
