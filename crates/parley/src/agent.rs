use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::errors::AgentResult;
use crate::event::AgentEvent;
use crate::models::request::ChatRequest;

/// Everything an agent needs to answer one chat request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub web_search: bool,
    /// Assistant message being regenerated, if any
    pub message_id: Option<String>,
}

/// Requests that are valid but cannot be handed to an agent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedInput {
    #[error("no messages provided")]
    NoMessages,
    #[error("only text parts are supported yet")]
    NonTextParts,
}

impl AgentRequest {
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Build the agent input from the last message of a chat request
    pub fn from_chat(request: &ChatRequest) -> Result<Self, UnsupportedInput> {
        let last = request
            .messages()
            .last()
            .ok_or(UnsupportedInput::NoMessages)?;
        if !last.is_text_only() {
            return Err(UnsupportedInput::NonTextParts);
        }

        let mut agent_request = Self::new(last.joined_text());
        match request {
            ChatRequest::SubmitMessage(submit) => {
                agent_request.model = Some(submit.model.clone());
                agent_request.web_search = submit.web_search;
            }
            ChatRequest::RegenerateMessage(regenerate) => {
                agent_request.message_id = Some(regenerate.message_id.clone());
            }
        }
        Ok(agent_request)
    }
}

/// A language-model agent that reports its progress as a stream of events
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Start answering `request`; the returned stream ends when the agent is done
    async fn reply(&self, request: AgentRequest)
        -> AgentResult<BoxStream<'_, AgentResult<AgentEvent>>>;
}
