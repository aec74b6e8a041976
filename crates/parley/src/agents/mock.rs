use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::agent::{Agent, AgentRequest};
use crate::errors::{AgentError, AgentResult};
use crate::event::AgentEvent;

/// A mock agent that replays pre-configured events for testing
#[derive(Debug, Default)]
pub struct MockAgent {
    events: Vec<AgentEvent>,
    failure: Option<AgentError>,
    reply_error: Option<AgentError>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl MockAgent {
    pub fn new(events: Vec<AgentEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// End the event stream with `error` after the scripted events
    pub fn with_failure(mut self, error: AgentError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Fail before producing any event
    pub fn with_reply_error(mut self, error: AgentError) -> Self {
        self.reply_error = Some(error);
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn name(&self) -> &str {
        "mock"
    }

    async fn reply(&self, request: AgentRequest) -> AgentResult<BoxStream<'_, AgentResult<AgentEvent>>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if let Some(error) = &self.reply_error {
            return Err(error.clone());
        }

        let mut items: Vec<AgentResult<AgentEvent>> = self.events.iter().cloned().map(Ok).collect();
        if let Some(error) = &self.failure {
            items.push(Err(error.clone()));
        }
        Ok(stream::iter(items).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_and_records() {
        let agent = MockAgent::new(vec![AgentEvent::text_start(0, "a")])
            .with_failure(AgentError::Internal("boom".to_string()));

        let items: Vec<_> = agent
            .reply(AgentRequest::new("first"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(
            items,
            vec![
                Ok(AgentEvent::text_start(0, "a")),
                Err(AgentError::Internal("boom".to_string()))
            ]
        );

        // Replays the same script on every call
        let again: Vec<_> = agent
            .reply(AgentRequest::new("second"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(again.len(), 2);

        let prompts: Vec<_> = agent.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_reply_error() {
        let agent = MockAgent::new(vec![]).with_reply_error(AgentError::Internal("down".into()));
        assert!(agent.reply(AgentRequest::new("x")).await.is_err());
        assert_eq!(agent.requests().len(), 1);
    }
}
