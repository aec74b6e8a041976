use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};

/// A tool that can be used by a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema of the arguments the tool accepts
    pub parameters: Value,
}

impl Tool {
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A request to run a registered tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub tool_call_id: String,
    /// The name of the tool to execute
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new<I: Into<String>, S: Into<String>>(tool_call_id: I, name: S, arguments: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> AgentResult<Value>;
}

#[async_trait]
impl<F> ToolHandler for F
where
    F: Fn(Value) -> AgentResult<Value> + Send + Sync,
{
    async fn call(&self, arguments: Value) -> AgentResult<Value> {
        self(arguments)
    }
}

/// Tools available to an agent, keyed by name.
///
/// Built once at startup and then shared read-only behind an `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, (Tool, Arc<dyn ToolHandler>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any earlier tool with the same name
    pub fn register<H: ToolHandler + 'static>(&mut self, tool: Tool, handler: H) {
        self.tools
            .insert(tool.name.clone(), (tool, Arc::new(handler)));
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name).map(|(tool, _)| tool)
    }

    /// All registered tools, sorted by name
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.tools.values().map(|(tool, _)| tool.clone()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub async fn call(&self, call: &ToolCall) -> AgentResult<Value> {
        let (_, handler) = self
            .tools
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;
        handler.call(call.arguments.clone()).await
    }
}

impl Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Adder;

    #[async_trait]
    impl ToolHandler for Adder {
        async fn call(&self, arguments: Value) -> AgentResult<Value> {
            let a = arguments["a"]
                .as_i64()
                .ok_or_else(|| AgentError::InvalidParameters("a must be an integer".into()))?;
            let b = arguments["b"]
                .as_i64()
                .ok_or_else(|| AgentError::InvalidParameters("b must be an integer".into()))?;
            Ok(json!(a + b))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            Tool::new("add", "Adds two integers", json!({"type": "object"})),
            Adder,
        );
        registry.register(
            Tool::new("upper", "Uppercases text", json!({"type": "object"})),
            |arguments: Value| -> AgentResult<Value> {
                Ok(json!(arguments["text"].as_str().unwrap_or_default().to_uppercase()))
            },
        );
        registry
    }

    #[tokio::test]
    async fn test_call_async_and_closure_handlers() {
        let registry = registry();

        let sum = registry
            .call(&ToolCall::new("1", "add", json!({"a": 2, "b": 3})))
            .await
            .unwrap();
        assert_eq!(sum, json!(5));

        let upper = registry
            .call(&ToolCall::new("2", "upper", json!({"text": "hi"})))
            .await
            .unwrap();
        assert_eq!(upper, json!("HI"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry()
            .call(&ToolCall::new("1", "missing", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, AgentError::ToolNotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_handler_errors_propagate() {
        let err = registry()
            .call(&ToolCall::new("1", "add", json!({"a": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidParameters(_)));
    }

    #[test]
    fn test_tools_are_listed_by_name() {
        let names: Vec<_> = registry().tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["add", "upper"]);
        assert!(registry().get("add").is_some());
        assert!(registry().get("sub").is_none());
    }
}
