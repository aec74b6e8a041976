use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderName},
    response::IntoResponse,
    routing::post,
    Router,
};
use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use parley::emitter::{encode_chunk, sse_frame, DONE_SENTINEL};
use parley::errors::SessionError;
use parley::models::request::ChatRequest;
use parley::session::ChunkStream;
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tracing::{error, info, warn};

const UI_MESSAGE_STREAM_HEADER: HeaderName = HeaderName::from_static("x-vercel-ai-ui-message-stream");

// Server-sent events body speaking the UI message stream protocol
pub struct SseResponse {
    frames: BoxStream<'static, Result<Bytes, SessionError>>,
}

impl SseResponse {
    fn new(chunks: ChunkStream) -> Self {
        Self {
            frames: frames(chunks),
        }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, SessionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.frames.poll_next_unpin(cx)
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> axum::response::Response {
        let body = axum::body::Body::from_stream(self);

        (
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
                (UI_MESSAGE_STREAM_HEADER, "v1"),
            ],
            body,
        )
            .into_response()
    }
}

// One `data:` event per chunk, then `[DONE]` if the stream ended cleanly
fn frames(mut chunks: ChunkStream) -> BoxStream<'static, Result<Bytes, SessionError>> {
    async_stream::stream! {
        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => match encode_chunk(&chunk) {
                    Ok(json) => yield Ok(Bytes::from(sse_frame(&json))),
                    Err(e) => error!("Failed to serialize {} chunk: {}", chunk.chunk_type(), e),
                },
                Err(e) => {
                    // Failing the body aborts the response without a [DONE]
                    warn!("Aborting response stream: {}", e);
                    yield Err(e);
                    return;
                }
            }
        }
        yield Ok(Bytes::from(sse_frame(DONE_SENTINEL)));
    }
    .boxed()
}

async fn handler(State(state): State<AppState>, body: Bytes) -> Result<SseResponse, ApiError> {
    let request = ChatRequest::from_slice(&body).map_err(|e| {
        warn!(issues = e.issues.len(), "Rejected chat request: {}", e);
        e
    })?;

    info!(
        chat_id = %request.id(),
        trigger = request.trigger(),
        messages = request.messages().len(),
        agent = state.orchestrator.agent_name(),
        "Accepted chat request"
    );

    Ok(SseResponse::new(state.orchestrator.stream(&request)))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handler))
        .with_state(state)
}
