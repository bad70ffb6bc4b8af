use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, OUTBOUND_CAPACITY};
use crate::domain::{Hub, SubscriptionHandle};
use crate::hub::InMemoryHub;
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::transport::websocket::Session;

fn new_session() -> (Session, mpsc::Receiver<WsMessage>) {
    let (tx, rx) = mpsc::channel::<WsMessage>(OUTBOUND_CAPACITY);
    (Session::new(Arc::new(Client::new(tx)), None), rx)
}

fn subscribed_handle(reply: ServerMessage) -> SubscriptionHandle {
    match reply {
        ServerMessage::Subscribed { handle, .. } => handle,
        other => panic!("Expected Subscribed, got {other:?}"),
    }
}

fn next_notification(rx: &mut mpsc::Receiver<WsMessage>) -> ServerMessage {
    let WsMessage::Text(text) = rx.try_recv().expect("no frame queued") else {
        panic!("Expected a text message");
    };
    serde_json::from_str(text.as_str()).unwrap()
}

#[test]
fn test_client_message_wire_format() {
    let msg: ClientMessage = serde_json::from_value(json!({
        "type": "publish",
        "payload": "hello"
    }))
    .unwrap();
    assert!(matches!(
        msg,
        ClientMessage::Publish { ref payload, deadline_ms: None } if payload == "hello"
    ));

    let msg: ClientMessage = serde_json::from_value(json!({
        "type": "subscribe",
        "subscriber_id": "user-1"
    }))
    .unwrap();
    assert!(matches!(msg, ClientMessage::Subscribe { ref subscriber_id } if subscriber_id == "user-1"));
}

#[test]
fn test_server_error_wire_format() {
    let value = serde_json::to_value(ServerMessage::error(
        crate::utils::error::ErrorCode::NotFound,
        "gone",
    ))
    .unwrap();
    assert_eq!(value, json!({"type": "error", "code": "not_found", "message": "gone"}));
}

#[tokio::test]
async fn test_handle_subscribe() {
    let hub = InMemoryHub::default();
    let (mut session, _rx) = new_session();

    let msg = json!({"type": "subscribe", "subscriber_id": "user-1"}).to_string();
    let handle = subscribed_handle(session.handle_text(&hub, &msg).await);

    assert!(hub.is_subscribed(&handle));
    assert!(session.handles().contains(&handle));
}

#[tokio::test]
async fn test_handle_unsubscribe() {
    let hub = InMemoryHub::default();
    let (mut session, _rx) = new_session();

    let handle = subscribed_handle(
        session
            .handle(
                &hub,
                ClientMessage::Subscribe {
                    subscriber_id: "user-1".to_string(),
                },
            )
            .await,
    );

    let msg = json!({"type": "unsubscribe", "handle": handle}).to_string();
    let reply = session.handle_text(&hub, &msg).await;

    assert!(matches!(reply, ServerMessage::Unsubscribed { handle: h } if h == handle));
    assert!(!hub.is_subscribed(&handle));

    // second attempt is not idempotent
    let reply = session.handle_text(&hub, &msg).await;
    assert!(matches!(reply, ServerMessage::Error { ref code, .. } if code == "not_found"));
}

#[tokio::test]
async fn test_cannot_unsubscribe_foreign_handle() {
    let hub = InMemoryHub::default();
    let (mut owner, _rx_owner) = new_session();
    let (mut intruder, _rx_intruder) = new_session();

    let handle = subscribed_handle(
        owner
            .handle(
                &hub,
                ClientMessage::Subscribe {
                    subscriber_id: "user-1".to_string(),
                },
            )
            .await,
    );

    let reply = intruder
        .handle(&hub, ClientMessage::Unsubscribe { handle })
        .await;
    assert!(matches!(reply, ServerMessage::Error { ref code, .. } if code == "not_found"));
    assert!(hub.is_subscribed(&handle));
}

#[tokio::test]
async fn test_handle_publish_delivers_and_reports() {
    let hub = InMemoryHub::default();
    let (mut publisher, _rx_pub) = new_session();
    let (mut listener, mut rx_listener) = new_session();

    listener
        .handle(
            &hub,
            ClientMessage::Subscribe {
                subscriber_id: "user-2".to_string(),
            },
        )
        .await;

    let msg = json!({"type": "publish", "payload": "hello"}).to_string();
    let reply = publisher.handle_text(&hub, &msg).await;

    match reply {
        ServerMessage::Published { report } => {
            assert_eq!(report.sequence, 1);
            assert_eq!(report.delivered, 1);
            assert_eq!(report.failed, 0);
        }
        other => panic!("Expected Published, got {other:?}"),
    }

    match next_notification(&mut rx_listener) {
        ServerMessage::Notification { message } => {
            assert_eq!(message.payload, "hello");
            assert_eq!(message.sequence, 1);
        }
        other => panic!("Expected Notification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_handle_empty_publish() {
    let hub = InMemoryHub::default();
    let (mut session, _rx) = new_session();

    let msg = json!({"type": "publish", "payload": ""}).to_string();
    let reply = session.handle_text(&hub, &msg).await;

    assert!(matches!(reply, ServerMessage::Error { ref code, .. } if code == "invalid"));
    assert_eq!(hub.last_sequence(), 0);
}

#[tokio::test]
async fn test_handle_invalid_message() {
    let hub = InMemoryHub::default();
    let (mut session, _rx) = new_session();

    let reply = session.handle_text(&hub, "{\"type\":\"shout\"}").await;
    assert!(matches!(reply, ServerMessage::Error { ref code, .. } if code == "invalid"));

    let reply = session.handle_text(&hub, "not json").await;
    assert!(matches!(reply, ServerMessage::Error { ref code, .. } if code == "invalid"));
}

#[tokio::test]
async fn test_close_drops_all_session_subscriptions() {
    let hub = InMemoryHub::default();
    let (mut session, _rx) = new_session();

    for id in ["a", "a", "b"] {
        session
            .handle(
                &hub,
                ClientMessage::Subscribe {
                    subscriber_id: id.to_string(),
                },
            )
            .await;
    }
    assert_eq!(hub.subscription_count(), 3);

    session.close(&hub);
    assert_eq!(hub.subscription_count(), 0);
    assert!(session.handles().is_empty());
}
