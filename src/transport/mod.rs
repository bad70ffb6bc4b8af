//! The `transport` module exposes the hub to remote peers over WebSockets.
//!
//! It defines the JSON protocol spoken with clients and the server loop that
//! turns client requests into [`Hub`](crate::domain::Hub) calls. Each
//! connection doubles as a sink: subscribing from a connection registers that
//! connection's [`Client`](crate::client::Client) with the hub.

pub mod message;
pub mod websocket;

#[cfg(test)]
mod tests;
