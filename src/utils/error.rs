//! The `error` module defines the error types used within `notihub`.
//!
//! Errors are grouped by concern: [`HubError`] is what callers of the hub see,
//! [`SinkError`] is what a sink reports back to the hub, and [`JournalError`]
//! covers the storage-backed message journal. Every [`HubError`] maps to a
//! machine-readable [`ErrorCode`] so presentation layers can render it without
//! matching on variants.

use std::fmt;

use thiserror::Error;

use crate::domain::SubscriptionHandle;

/// Machine-readable error codes, modelled on errno-style names and meant to
/// map closely onto protocol-level status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Conflict,
    Invalid,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Invalid => "invalid",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Hub`](crate::domain::Hub) operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// A freshly generated handle collided with a live subscription.
    #[error("subscription {0} already exists")]
    AlreadySubscribed(SubscriptionHandle),

    /// The handle is unknown, was unsubscribed, or was removed after a failed delivery.
    #[error("subscription {0} not found")]
    NotFound(SubscriptionHandle),

    #[error("message payload is empty")]
    EmptyMessage,

    #[error("journal failure: {0}")]
    Storage(#[from] JournalError),

    /// A blocking storage task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

impl HubError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadySubscribed(_) => ErrorCode::Conflict,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::EmptyMessage => ErrorCode::Invalid,
            Self::Storage(_) | Self::Background(_) => ErrorCode::Internal,
        }
    }

    /// Human-readable message safe to show to a remote peer.
    ///
    /// Internal failures are reduced to a generic text; their detail belongs
    /// in the server log only.
    pub fn public_message(&self) -> String {
        match self.code() {
            ErrorCode::Internal => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Failure reported by a [`Sink`](crate::domain::Sink) while accepting a message.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink is closed")]
    Closed,

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by the sled-backed message journal.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("corrupt journal entry: {0}")]
    Encode(#[from] serde_json::Error),
}
