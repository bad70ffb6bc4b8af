//! The `client` module holds the concrete [`Sink`](crate::domain::Sink)
//! implementations a subscriber can register with the hub.
//!
//! - [`Client`]: a connected WebSocket peer.
//! - [`ChannelSink`]: a bounded in-process tokio channel.
//! - [`WriterSink`]: any `AsyncWrite`, one JSON object per line.

pub mod channel;
pub mod pubsub_client;
pub mod writer;

pub use channel::ChannelSink;
pub use pubsub_client::{Client, OUTBOUND_CAPACITY};
pub use writer::WriterSink;
