use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use crate::agent::{Agent, AgentRequest};
use crate::errors::{AgentError, AgentResult};
use crate::event::AgentEvent;

const GREETING: &[&str] = &[
    "Hi", " again", "!", " 😊", " How", " can", " I", " assist", " you", " today", "?",
];

/// Answers every prompt with the same greeting, streamed word by word.
///
/// The reply goes through the event translator like any other agent, so the client sees
/// `text-start` and `text-delta` chunks only: no step boundaries, no `text-end` and no
/// provider metadata on the text stream.
#[derive(Debug, Clone, Default)]
pub struct DemoAgent {
    delay: Duration,
}

impl DemoAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause before every delta, to make the streaming visible in a browser
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn greeting() -> String {
        GREETING.concat()
    }
}

#[async_trait]
impl Agent for DemoAgent {
    fn name(&self) -> &str {
        "demo"
    }

    async fn reply(&self, _request: AgentRequest) -> AgentResult<BoxStream<'_, AgentResult<AgentEvent>>> {
        let delay = self.delay;
        Ok(async_stream::stream! {
            yield Ok::<_, AgentError>(AgentEvent::text_start(0, ""));
            for piece in GREETING {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(AgentEvent::text_delta(0, *piece));
            }
        }
        .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_streams_the_greeting() {
        let agent = DemoAgent::new();
        let events: Vec<AgentEvent> = agent
            .reply(AgentRequest::new("hello"))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(events[0], AgentEvent::text_start(0, ""));
        let text: String = events[1..]
            .iter()
            .map(|event| match event {
                AgentEvent::PartDelta {
                    delta: crate::event::AgentPartDelta::Text { content_delta },
                    ..
                } => content_delta.as_str(),
                other => panic!("Expected text delta, got {:?}", other),
            })
            .collect();
        assert_eq!(text, "Hi again! 😊 How can I assist you today?");
        assert_eq!(text, DemoAgent::greeting());
    }

    #[tokio::test]
    async fn test_delay_between_deltas() {
        let agent = DemoAgent::new().with_delay(Duration::from_millis(5));
        let started = std::time::Instant::now();
        let events: Vec<AgentEvent> = agent
            .reply(AgentRequest::new("hello"))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(events.len(), GREETING.len() + 1);
        assert!(started.elapsed() >= Duration::from_millis(5) * GREETING.len() as u32);
    }
}
