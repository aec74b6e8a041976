//! Events an agent reports while it runs.
//!
//! Events come in two layers. Part events describe the assistant message as it is generated:
//! a part starts and then grows through deltas. Tool events describe the function and
//! builtin tool calls the agent makes along the way. Every family has an `Other` variant for
//! shapes this crate does not know yet, which the translator ignores.
use serde_json::Value;

/// A message part that just started, with its initial content
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPart {
    Text {
        content: String,
    },
    Thinking {
        content: String,
    },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Option<Value>,
    },
    BuiltinToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Option<Value>,
    },
    BuiltinToolResult {
        tool_call_id: String,
        tool_name: String,
        content: Value,
    },
    Other {
        kind: String,
    },
}

/// Incremental content for the part at the same index
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPartDelta {
    Text {
        content_delta: String,
    },
    Thinking {
        content_delta: Option<String>,
    },
    ToolCall {
        tool_call_id: Option<String>,
        tool_name_delta: Option<String>,
        args_delta: Option<Value>,
    },
    Other {
        kind: String,
    },
}

/// How a function tool call ended
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Return {
        tool_call_id: String,
        tool_name: String,
        content: Value,
    },
    /// The tool asked the model to try again, usually after bad arguments
    RetryPrompt {
        tool_call_id: String,
        tool_name: Option<String>,
        content: Value,
    },
}

impl ToolOutcome {
    pub fn tool_call_id(&self) -> &str {
        match self {
            ToolOutcome::Return { tool_call_id, .. } => tool_call_id,
            ToolOutcome::RetryPrompt { tool_call_id, .. } => tool_call_id,
        }
    }

    pub fn content(&self) -> &Value {
        match self {
            ToolOutcome::Return { content, .. } => content,
            ToolOutcome::RetryPrompt { content, .. } => content,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    PartStart {
        index: usize,
        part: AgentPart,
    },
    PartDelta {
        index: usize,
        delta: AgentPartDelta,
    },
    /// The model produced its final answer, possibly through an output tool
    FinalResult {
        tool_call_id: Option<String>,
        tool_name: Option<String>,
    },
    FunctionToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Option<Value>,
    },
    FunctionToolResult {
        result: ToolOutcome,
    },
    BuiltinToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Option<Value>,
    },
    BuiltinToolResult {
        tool_call_id: String,
        output: Value,
    },
    Other {
        kind: String,
    },
}

impl AgentEvent {
    pub fn text_start<S: Into<String>>(index: usize, content: S) -> Self {
        AgentEvent::PartStart {
            index,
            part: AgentPart::Text {
                content: content.into(),
            },
        }
    }

    pub fn text_delta<S: Into<String>>(index: usize, content_delta: S) -> Self {
        AgentEvent::PartDelta {
            index,
            delta: AgentPartDelta::Text {
                content_delta: content_delta.into(),
            },
        }
    }

    pub fn thinking_start<S: Into<String>>(index: usize, content: S) -> Self {
        AgentEvent::PartStart {
            index,
            part: AgentPart::Thinking {
                content: content.into(),
            },
        }
    }

    pub fn tool_call_start<I, N>(index: usize, tool_call_id: I, tool_name: N, args: Option<Value>) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        AgentEvent::PartStart {
            index,
            part: AgentPart::ToolCall {
                tool_call_id: tool_call_id.into(),
                tool_name: tool_name.into(),
                args,
            },
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &str {
        match self {
            AgentEvent::PartStart { .. } => "part-start",
            AgentEvent::PartDelta { .. } => "part-delta",
            AgentEvent::FinalResult { .. } => "final-result",
            AgentEvent::FunctionToolCall { .. } => "function-tool-call",
            AgentEvent::FunctionToolResult { .. } => "function-tool-result",
            AgentEvent::BuiltinToolCall { .. } => "builtin-tool-call",
            AgentEvent::BuiltinToolResult { .. } => "builtin-tool-result",
            AgentEvent::Other { kind } => kind,
        }
    }
}
