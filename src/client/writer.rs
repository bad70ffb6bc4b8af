use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::domain::{Message, Sink};
use crate::utils::error::SinkError;

#[derive(Debug)]
struct Lane<W> {
    writer: W,
    // bytes accepted but not yet written, always whole lines once drained
    pending: Vec<u8>,
}

/// Sink writing newline-delimited JSON to any async writer
/// (socket, file, pipe, in-memory buffer).
///
/// Delivery is cancel-safe: a line cut off mid-write stays buffered and is
/// completed before the next line, so the stream never carries a torn
/// object. The writer is flushed after each message. The sink never shuts
/// the writer down; use [`WriterSink::into_inner`] to take it back.
#[derive(Debug)]
pub struct WriterSink<W> {
    lane: Mutex<Lane<W>>,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self {
            lane: Mutex::new(Lane {
                writer,
                pending: Vec::new(),
            }),
        }
    }

    /// Bytes accepted but not yet handed to the writer.
    pub async fn pending_len(&self) -> usize {
        self.lane.lock().await.pending.len()
    }

    pub fn into_inner(self) -> W {
        self.lane.into_inner().writer
    }
}

#[async_trait]
impl<W> Sink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn deliver(&self, message: &Message) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');

        let mut lane = self.lane.lock().await;
        lane.pending.extend_from_slice(&line);

        let Lane { writer, pending } = &mut *lane;
        while !pending.is_empty() {
            // `write` is cancel-safe; only bytes it reports are drained
            let written = writer.write(pending).await?;
            if written == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero).into());
            }
            pending.drain(..written);
        }
        writer.flush().await?;
        Ok(())
    }
}
