use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Agent execution failed: {0}")]
    ExecutionError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Failures that end a streamed response early
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("agent invocation failed: {0}")]
    Agent(#[from] AgentError),

    /// The consuming side of the chunk channel went away (client disconnect)
    #[error("chunk receiver closed before the stream finished")]
    Disconnected,

    #[error("agent task failed: {0}")]
    Task(String),
}
