use std::sync::Arc;

use async_trait::async_trait;

use super::{DeliveryReport, Message, Sink, Subscriber, SubscriptionHandle};
use crate::utils::error::SinkError;

struct NullSink;

#[async_trait]
impl Sink for NullSink {
    async fn deliver(&self, _message: &Message) -> Result<(), SinkError> {
        Ok(())
    }
}

#[test]
fn test_handles_are_unique() {
    let a = SubscriptionHandle::generate();
    let b = SubscriptionHandle::generate();
    assert_ne!(a, b);
}

#[test]
fn test_handle_serializes_as_plain_string() {
    let handle = SubscriptionHandle::generate();
    let json = serde_json::to_string(&handle).unwrap();
    assert_eq!(json, format!("\"{handle}\""));

    let parsed: SubscriptionHandle = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, handle);
}

#[test]
fn test_message_new_stamps_time() {
    let msg = Message::new(7, "hello".to_string());
    assert_eq!(msg.sequence, 7);
    assert_eq!(msg.payload, "hello");
    assert!(msg.published_at > 0);
}

#[test]
fn test_subscriber_mark_dead_once() {
    let handle = SubscriptionHandle::generate();
    let sub = Subscriber::new(handle, "user-1".to_string(), Arc::new(NullSink), 3);
    assert!(sub.is_alive());
    assert_eq!(sub.handle(), handle);
    assert_eq!(sub.id(), "user-1");
    assert_eq!(sub.joined_after(), 3);

    assert!(sub.mark_dead());
    assert!(!sub.mark_dead());
    assert!(!sub.is_alive());
}

#[test]
fn test_delivery_report_attempted() {
    let report = DeliveryReport {
        sequence: 1,
        delivered: 2,
        failed: 1,
        expired: 0,
        removed: vec!["b".to_string()],
    };
    assert_eq!(report.attempted(), 3);
    assert_eq!(DeliveryReport::new(9).sequence, 9);
}
