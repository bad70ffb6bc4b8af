//! JSON protocol spoken over the WebSocket connection.
//!
//! Every frame is a text frame holding one object tagged by `type`:
//!
//! ```json
//! {"type": "subscribe", "subscriber_id": "user-42"}
//! {"type": "publish", "payload": "{\"temp\":25}", "deadline_ms": 500}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{DeliveryReport, Message, SubscriberId, SubscriptionHandle};
use crate::utils::error::{ErrorCode, HubError};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        subscriber_id: SubscriberId,
    },
    Unsubscribe {
        handle: SubscriptionHandle,
    },
    Publish {
        payload: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deadline_ms: Option<u64>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Subscribed {
        handle: SubscriptionHandle,
        subscriber_id: SubscriberId,
    },
    Unsubscribed {
        handle: SubscriptionHandle,
    },
    Published {
        report: DeliveryReport,
    },
    Notification {
        message: Message,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.as_str().to_string(),
            message: message.into(),
        }
    }
}

impl From<&HubError> for ServerMessage {
    fn from(err: &HubError) -> Self {
        Self::error(err.code(), err.public_message())
    }
}
