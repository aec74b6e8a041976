use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agent::{Agent, AgentRequest, UnsupportedInput};
use crate::emitter::{chunk_channel, ChunkEmitter, DEFAULT_CHANNEL_CAPACITY};
use crate::errors::SessionError;
use crate::models::chunk::ProtocolChunk;
use crate::models::request::ChatRequest;
use crate::translator::EventTranslator;

/// Chunks of one response; an `Err` item means the stream ended abnormally
pub type ChunkStream = BoxStream<'static, Result<ProtocolChunk, SessionError>>;

/// Runs one agent invocation per chat request and streams back its chunks
pub struct SessionOrchestrator {
    agent: Arc<dyn Agent>,
    channel_capacity: usize,
}

impl SessionOrchestrator {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }

    /// Start answering `request`.
    ///
    /// Must be called from within a tokio runtime unless the request is unsupported, in which
    /// case the fixed diagnostic stream is returned and the agent is never invoked.
    pub fn stream(&self, request: &ChatRequest) -> ChunkStream {
        let message_id = Uuid::new_v4().simple().to_string();

        match AgentRequest::from_chat(request) {
            Ok(agent_request) => self.spawn(message_id, agent_request),
            Err(reason) => {
                warn!(
                    chat_id = %request.id(),
                    reason = %reason,
                    "unsupported chat input, sending diagnostic stream"
                );
                stream::iter(diagnostic_chunks(&message_id, reason).into_iter().map(Ok)).boxed()
            }
        }
    }

    fn spawn(&self, message_id: String, request: AgentRequest) -> ChunkStream {
        let (mut emitter, mut chunks) = chunk_channel(self.channel_capacity);
        let agent = Arc::clone(&self.agent);

        let task = tokio::spawn(async move {
            let result = produce(agent.as_ref(), message_id.clone(), request, &mut emitter).await;
            emitter.close();
            match &result {
                Ok(()) => info!(message_id = %message_id, agent = agent.name(), "stream finished"),
                Err(SessionError::Disconnected) => {
                    info!(message_id = %message_id, "client disconnected, stopping agent")
                }
                Err(e) => error!(message_id = %message_id, agent = agent.name(), "agent failed: {}", e),
            }
            result
        });
        let mut task = AbortOnDrop(task);

        async_stream::stream! {
            while let Some(chunk) = chunks.next().await {
                yield Ok(chunk);
            }
            match (&mut task.0).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => yield Err(e),
                Err(e) => yield Err(SessionError::Task(e.to_string())),
            }
        }
        .boxed()
    }
}

/// Drive the agent, translating each event onto the emitter
async fn produce<E: ChunkEmitter>(
    agent: &dyn Agent,
    message_id: String,
    request: AgentRequest,
    emitter: &mut E,
) -> Result<(), SessionError> {
    let mut translator = EventTranslator::new(message_id);
    send(emitter, vec![translator.start()]).await?;

    let mut events = agent.reply(request).await?;
    while let Some(event) = events.next().await {
        let chunks = translator.translate(event?);
        send(emitter, chunks).await?;
    }

    send(emitter, translator.finish()).await
}

async fn send<E: ChunkEmitter>(emitter: &mut E, chunks: Vec<ProtocolChunk>) -> Result<(), SessionError> {
    for chunk in chunks {
        emitter
            .emit(chunk)
            .await
            .map_err(|_| SessionError::Disconnected)?;
    }
    Ok(())
}

/// The fixed stream sent instead of invoking the agent
pub fn diagnostic_chunks(message_id: &str, reason: UnsupportedInput) -> Vec<ProtocolChunk> {
    vec![
        ProtocolChunk::start(),
        ProtocolChunk::start_step(),
        ProtocolChunk::reasoning_start(message_id),
        ProtocolChunk::reasoning_delta(message_id, format!("Error: {}", reason)),
        ProtocolChunk::finish_step(),
        ProtocolChunk::finish(),
    ]
}

struct AbortOnDrop(JoinHandle<Result<(), SessionError>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
