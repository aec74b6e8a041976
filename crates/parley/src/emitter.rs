use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::models::chunk::ProtocolChunk;

/// Payload of the final SSE event of a successful stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Default number of chunks buffered between the agent task and the response body
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    #[error("chunk receiver is gone")]
    Closed,
}

/// Sink for the chunks of one response
#[async_trait]
pub trait ChunkEmitter: Send {
    /// Queue a chunk, waiting while the queue is full
    async fn emit(&mut self, chunk: ProtocolChunk) -> Result<(), EmitError>;

    /// Signal that no more chunks will follow
    fn close(&mut self);
}

/// Emitter backed by a bounded mpsc channel
#[derive(Debug)]
pub struct ChannelEmitter {
    tx: Option<mpsc::Sender<ProtocolChunk>>,
}

#[async_trait]
impl ChunkEmitter for ChannelEmitter {
    async fn emit(&mut self, chunk: ProtocolChunk) -> Result<(), EmitError> {
        let tx = self.tx.as_ref().ok_or(EmitError::Closed)?;
        tx.send(chunk).await.map_err(|_| EmitError::Closed)
    }

    fn close(&mut self) {
        self.tx.take();
    }
}

impl ChannelEmitter {
    pub fn is_closed(&self) -> bool {
        self.tx.as_ref().map_or(true, |tx| tx.is_closed())
    }
}

/// Create an emitter and the stream that yields its chunks in order
pub fn chunk_channel(capacity: usize) -> (ChannelEmitter, ReceiverStream<ProtocolChunk>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelEmitter { tx: Some(tx) }, ReceiverStream::new(rx))
}

/// Wire JSON for one chunk
pub fn encode_chunk(chunk: &ProtocolChunk) -> Result<String, serde_json::Error> {
    serde_json::to_string(chunk)
}

/// One server-sent event carrying `data`
pub fn sse_frame(data: &str) -> String {
    format!("data: {}\n\n", data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_chunks_arrive_in_order() {
        let (mut emitter, mut rx) = chunk_channel(4);

        let producer = tokio::spawn(async move {
            for i in 0..20 {
                emitter
                    .emit(ProtocolChunk::text_delta("m", i.to_string()))
                    .await
                    .unwrap();
            }
            emitter.close();
        });

        let mut received = Vec::new();
        while let Some(chunk) = rx.next().await {
            received.push(chunk);
        }
        producer.await.unwrap();

        let expected: Vec<_> = (0..20)
            .map(|i| ProtocolChunk::text_delta("m", i.to_string()))
            .collect();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn test_emit_waits_while_full() {
        let (mut emitter, mut rx) = chunk_channel(1);
        emitter.emit(ProtocolChunk::start()).await.unwrap();

        let blocked = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            emitter.emit(ProtocolChunk::finish()),
        )
        .await;
        assert!(blocked.is_err());

        assert_eq!(rx.next().await, Some(ProtocolChunk::start()));
        emitter.emit(ProtocolChunk::finish()).await.unwrap();
        assert_eq!(rx.next().await, Some(ProtocolChunk::finish()));
    }

    #[tokio::test]
    async fn test_emit_fails_once_receiver_is_dropped() {
        let (mut emitter, rx) = chunk_channel(8);
        drop(rx);
        assert!(emitter.is_closed());
        assert_eq!(
            emitter.emit(ProtocolChunk::start()).await,
            Err(EmitError::Closed)
        );
    }

    #[tokio::test]
    async fn test_close_ends_the_stream() {
        let (mut emitter, mut rx) = chunk_channel(8);
        emitter.emit(ProtocolChunk::start()).await.unwrap();
        emitter.close();

        assert_eq!(rx.next().await, Some(ProtocolChunk::start()));
        assert_eq!(rx.next().await, None);
        assert_eq!(
            emitter.emit(ProtocolChunk::finish()).await,
            Err(EmitError::Closed)
        );
    }

    #[test]
    fn test_sse_framing() {
        let json = encode_chunk(&ProtocolChunk::text_start("abc")).unwrap();
        assert_eq!(sse_frame(&json), "data: {\"type\":\"text-start\",\"id\":\"abc\"}\n\n");
        assert_eq!(sse_frame(DONE_SENTINEL), "data: [DONE]\n\n");
    }
}
