//! # notihub
//!
//! `notihub` is an in-memory notification hub: subscribers register a sink,
//! and every published message is fanned out to the sinks registered at that
//! moment. Sinks that fail are dropped; nothing is queued or replayed.
//!
//! ## Core Modules
//!
//! - `domain`: entities (`Message`, `Subscriber`, handles, reports) and the
//!   `Hub` and `Sink` capabilities.
//! - `hub`: the two `Hub` backends (in-memory and journaled) and the shared
//!   registry / delivery machinery.
//! - `client`: concrete sinks (WebSocket client, channel, async writer).
//! - `config`: loading and merging configuration.
//! - `persistence`: the sled-backed message journal.
//! - `transport`: the WebSocket server exposing the hub.
//! - `utils`: error types and logging setup.

pub mod client;
pub mod config;
pub mod domain;
pub mod hub;
pub mod persistence;
pub mod transport;
pub mod utils;
