use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::agent::{Agent, AgentRequest};
use crate::errors::{AgentError, AgentResult};
use crate::event::{AgentEvent, ToolOutcome};
use crate::tool::{Tool, ToolCall, ToolRegistry};

pub const ECHO_TOOL: &str = "echo";

/// Register the `echo` tool, which returns its `text` argument unchanged
pub fn register_echo_tool(registry: &mut ToolRegistry) {
    registry.register(
        Tool::new(
            ECHO_TOOL,
            "Echoes back the input",
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }),
        ),
        |arguments: Value| -> AgentResult<Value> {
            match arguments.get("text") {
                Some(Value::String(text)) => Ok(Value::String(text.clone())),
                _ => Err(AgentError::InvalidParameters(
                    "`text` must be a string".to_string(),
                )),
            }
        },
    );
}

/// Runs the `echo` tool on the prompt and answers with what it returned
pub struct EchoAgent {
    tools: Arc<ToolRegistry>,
}

impl EchoAgent {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Agent for EchoAgent {
    fn name(&self) -> &str {
        "echo"
    }

    async fn reply(&self, request: AgentRequest) -> AgentResult<BoxStream<'_, AgentResult<AgentEvent>>> {
        let tool_call_id = format!("call_{}", Uuid::new_v4().simple());
        let arguments = json!({ "text": request.prompt });
        let call = ToolCall::new(tool_call_id.clone(), ECHO_TOOL, arguments.clone());

        Ok(async_stream::stream! {
            yield Ok::<_, AgentError>(AgentEvent::thinking_start(
                0,
                format!("Calling the {} tool", ECHO_TOOL),
            ));
            yield Ok(AgentEvent::tool_call_start(1, tool_call_id.clone(), ECHO_TOOL, Some(arguments.clone())));
            yield Ok(AgentEvent::FunctionToolCall {
                tool_call_id: tool_call_id.clone(),
                tool_name: ECHO_TOOL.to_string(),
                args: Some(arguments),
            });

            let (outcome, answer) = match self.tools.call(&call).await {
                Ok(content) => {
                    let answer = match &content {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    let outcome = ToolOutcome::Return {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: ECHO_TOOL.to_string(),
                        content,
                    };
                    (outcome, answer)
                }
                Err(e) => {
                    let outcome = ToolOutcome::RetryPrompt {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: Some(ECHO_TOOL.to_string()),
                        content: json!(e.to_string()),
                    };
                    (outcome, format!("The {} tool failed: {}", ECHO_TOOL, e))
                }
            };

            yield Ok(AgentEvent::FunctionToolResult { result: outcome });
            yield Ok(AgentEvent::text_start(2, answer));
        }
        .boxed())
    }
}
