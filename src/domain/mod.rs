//! The `domain` module defines the types and capabilities the rest of the
//! crate is built around.
//!
//! Reading this module should be enough to understand what the service does:
//! subscribers register a [`Sink`] with a [`Hub`], and every published
//! [`Message`] is fanned out to the sinks registered at publish time. Concrete
//! hubs live in [`crate::hub`], concrete sinks in [`crate::client`].

pub mod hub;
pub mod message;
pub mod sink;
pub mod subscriber;

pub use hub::{DeliveryReport, Hub};
pub use message::Message;
pub use sink::Sink;
pub use subscriber::{Subscriber, SubscriberId, SubscriptionHandle};

#[cfg(test)]
mod tests;
