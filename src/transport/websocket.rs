//! WebSocket transport
//!
//! Minimal WebSocket server that translates protocol JSON messages into hub
//! operations. Responsibilities:
//! - Accept TCP/WebSocket connections
//! - Create a `Client` per connection; the client is the sink registered on
//!   subscribe
//! - Track the subscriptions opened by each connection and drop them when the
//!   connection goes away
//!
//! All hub calls happen on the connection's own task; nothing here holds a
//! lock across network I/O.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, OUTBOUND_CAPACITY};
use crate::config::HubSettings;
use crate::domain::{Hub, SubscriptionHandle};
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::error::{ErrorCode, HubError};

/// Binds `addr` and serves connections until the task is dropped.
pub async fn start_websocket_server(
    addr: &str,
    hub: Arc<dyn Hub>,
    settings: HubSettings,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);

    serve(listener, hub, settings.publish_deadline()).await;
    Ok(())
}

/// Accept loop over an already bound listener.
///
/// `publish_deadline` applies to publishes that do not carry their own
/// `deadline_ms`.
pub async fn serve(listener: TcpListener, hub: Arc<dyn Hub>, publish_deadline: Option<Duration>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let hub = hub.clone();
                spawn(handle_connection(stream, peer, hub, publish_deadline));
            }
            Err(e) => {
                warn!("Failed to accept connection: {e}");
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    hub: Arc<dyn Hub>,
    publish_deadline: Option<Duration>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer, "WebSocket handshake error: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<WsMessage>(OUTBOUND_CAPACITY);
    let client = Arc::new(Client::new(tx));
    let mut session = Session::new(client.clone(), publish_deadline);
    info!(client = %client.id, %peer, "connected");

    // Forward replies and notifications → client
    let forward = {
        let client_id = client.id.clone();
        spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    debug!(client = %client_id, "Failed to send message: {e}");
                    break;
                }
            }
        })
    };

    while let Some(frame) = ws_receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                debug!(client = %client.id, "read error: {e}");
                break;
            }
        };

        match msg {
            WsMessage::Text(text) => {
                let reply = session.handle_text(hub.as_ref(), text.as_str()).await;
                if client.send(&reply).await.is_err() {
                    break;
                }
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }

    session.close(hub.as_ref());
    forward.abort();
    info!(client = %client.id, "disconnected");
}

/// Per-connection protocol state: the connection's sink and the handles it
/// opened.
pub struct Session {
    client: Arc<Client>,
    handles: HashSet<SubscriptionHandle>,
    publish_deadline: Option<Duration>,
}

impl Session {
    pub fn new(client: Arc<Client>, publish_deadline: Option<Duration>) -> Self {
        Self {
            client,
            handles: HashSet::new(),
            publish_deadline,
        }
    }

    pub fn handles(&self) -> &HashSet<SubscriptionHandle> {
        &self.handles
    }

    /// Parses one text frame and runs it. Malformed input is answered with an
    /// `invalid` error; it never ends the session.
    pub async fn handle_text(&mut self, hub: &dyn Hub, text: &str) -> ServerMessage {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle(hub, msg).await,
            Err(err) => {
                warn!(
                    client = %self.client.id,
                    "Invalid client message: {err} | {}",
                    text.chars().take(100).collect::<String>()
                );
                ServerMessage::error(ErrorCode::Invalid, format!("invalid message: {err}"))
            }
        }
    }

    pub async fn handle(&mut self, hub: &dyn Hub, msg: ClientMessage) -> ServerMessage {
        let result = match msg {
            ClientMessage::Subscribe { subscriber_id } => hub
                .subscribe(subscriber_id.clone(), self.client.clone())
                .map(|handle| {
                    self.handles.insert(handle);
                    info!(client = %self.client.id, %handle, subscriber = %subscriber_id, "subscribed");
                    ServerMessage::Subscribed {
                        handle,
                        subscriber_id,
                    }
                }),
            ClientMessage::Unsubscribe { handle } => {
                // only handles opened on this connection are visible to it
                if self.handles.remove(&handle) {
                    hub.unsubscribe(&handle).map(|()| {
                        info!(client = %self.client.id, %handle, "unsubscribed");
                        ServerMessage::Unsubscribed { handle }
                    })
                } else {
                    Err(HubError::NotFound(handle))
                }
            }
            ClientMessage::Publish {
                payload,
                deadline_ms,
            } => {
                let deadline = deadline_ms
                    .map(Duration::from_millis)
                    .or(self.publish_deadline)
                    .map(|budget| Instant::now() + budget);
                hub.publish_until(payload, deadline)
                    .await
                    .map(|report| ServerMessage::Published { report })
            }
        };

        result.unwrap_or_else(|err| {
            if err.code() == ErrorCode::Internal {
                error!(client = %self.client.id, "request failed: {err}");
            } else {
                debug!(client = %self.client.id, "request rejected: {err}");
            }
            ServerMessage::from(&err)
        })
    }

    /// Drops every subscription this connection still holds.
    ///
    /// Handles already removed by a failed delivery are skipped silently.
    pub fn close(&mut self, hub: &dyn Hub) {
        for handle in self.handles.drain() {
            match hub.unsubscribe(&handle) {
                Ok(()) | Err(HubError::NotFound(_)) => {}
                Err(err) => warn!(client = %self.client.id, %handle, "cleanup failed: {err}"),
            }
        }
    }
}
