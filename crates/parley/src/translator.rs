use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::event::{AgentEvent, AgentPart, AgentPartDelta, ToolOutcome};
use crate::models::chunk::ProtocolChunk;
use crate::models::message::ToolState;

/// Turns the events of one agent run into UI message stream chunks.
///
/// Text and reasoning streams are keyed by the assistant message id, tool streams by their
/// tool call id. The translator guarantees that a start chunk precedes every delta or output
/// for the same id, and that a tool call never goes back to input once its output was sent.
/// Tool chunks for a call that never started and whose name is unknown are dropped, except
/// argument deltas under the empty id.
#[derive(Debug)]
pub struct EventTranslator {
    message_id: String,
    final_result_tool_call_id: Option<String>,
    text_open: bool,
    reasoning_open: bool,
    tool_phases: HashMap<String, ToolState>,
    tool_names: HashMap<String, String>,
}

impl EventTranslator {
    pub fn new<S: Into<String>>(message_id: S) -> Self {
        Self {
            message_id: message_id.into(),
            final_result_tool_call_id: None,
            text_open: false,
            reasoning_open: false,
            tool_phases: HashMap::new(),
            tool_names: HashMap::new(),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Tool call recorded as the one carrying the final result, if any
    pub fn final_result_tool_call_id(&self) -> Option<&str> {
        self.final_result_tool_call_id.as_deref()
    }

    pub fn start(&self) -> ProtocolChunk {
        ProtocolChunk::start()
    }

    pub fn translate(&mut self, event: AgentEvent) -> Vec<ProtocolChunk> {
        let mut chunks = Vec::new();

        match event {
            AgentEvent::PartStart { part, .. } => self.part_start(part, &mut chunks),
            AgentEvent::PartDelta { delta, .. } => self.part_delta(delta, &mut chunks),
            AgentEvent::FinalResult {
                tool_call_id: Some(tool_call_id),
                tool_name: Some(tool_name),
            } => {
                self.final_result_tool_call_id = Some(tool_call_id.clone());
                self.tool_input_start(tool_call_id, tool_name, &mut chunks);
            }
            AgentEvent::FinalResult { .. } => {}
            AgentEvent::FunctionToolCall {
                tool_call_id,
                tool_name,
                ..
            } => {
                self.tool_names.entry(tool_call_id).or_insert(tool_name);
            }
            AgentEvent::FunctionToolResult { result } => {
                let (tool_call_id, tool_name, content) = match result {
                    ToolOutcome::Return {
                        tool_call_id,
                        tool_name,
                        content,
                    } => (tool_call_id, Some(tool_name), content),
                    ToolOutcome::RetryPrompt {
                        tool_call_id,
                        tool_name,
                        content,
                    } => (tool_call_id, tool_name, content),
                };
                self.tool_output(tool_call_id, tool_name, content, &mut chunks);
            }
            AgentEvent::BuiltinToolCall {
                tool_call_id,
                tool_name,
                args,
            } => self.tool_call(tool_call_id, tool_name, args, &mut chunks),
            AgentEvent::BuiltinToolResult {
                tool_call_id,
                output,
            } => self.tool_output(tool_call_id, None, output, &mut chunks),
            AgentEvent::Other { kind } => {
                debug!(kind = %kind, "ignoring unrecognised agent event");
            }
        }

        chunks
    }

    /// Chunks closing the stream once the agent is done
    pub fn finish(&mut self) -> Vec<ProtocolChunk> {
        let mut chunks = Vec::new();
        if let Some(tool_call_id) = self.final_result_tool_call_id.clone() {
            self.tool_phases
                .insert(tool_call_id.clone(), ToolState::OutputAvailable);
            chunks.push(ProtocolChunk::tool_output_available(tool_call_id, Value::Null));
        }
        chunks.push(ProtocolChunk::finish());
        chunks
    }

    fn part_start(&mut self, part: AgentPart, chunks: &mut Vec<ProtocolChunk>) {
        match part {
            AgentPart::Text { content } => {
                self.text_open = true;
                chunks.push(ProtocolChunk::text_start(&self.message_id));
                if !content.is_empty() {
                    chunks.push(ProtocolChunk::text_delta(&self.message_id, content));
                }
            }
            AgentPart::Thinking { content } => {
                self.reasoning_open = true;
                chunks.push(ProtocolChunk::reasoning_start(&self.message_id));
                chunks.push(ProtocolChunk::reasoning_delta(&self.message_id, content));
            }
            AgentPart::ToolCall {
                tool_call_id,
                tool_name,
                args,
            }
            | AgentPart::BuiltinToolCall {
                tool_call_id,
                tool_name,
                args,
            } => self.tool_call(tool_call_id, tool_name, args, chunks),
            AgentPart::BuiltinToolResult {
                tool_call_id,
                tool_name,
                content,
            } => self.tool_output(tool_call_id, Some(tool_name), content, chunks),
            AgentPart::Other { kind } => {
                debug!(kind = %kind, "ignoring unrecognised part");
            }
        }
    }

    fn part_delta(&mut self, delta: AgentPartDelta, chunks: &mut Vec<ProtocolChunk>) {
        match delta {
            AgentPartDelta::Text { content_delta } => {
                if !self.text_open {
                    self.text_open = true;
                    chunks.push(ProtocolChunk::text_start(&self.message_id));
                }
                chunks.push(ProtocolChunk::text_delta(&self.message_id, content_delta));
            }
            AgentPartDelta::Thinking { content_delta } => {
                let Some(content_delta) = content_delta.filter(|delta| !delta.is_empty()) else {
                    return;
                };
                if !self.reasoning_open {
                    self.reasoning_open = true;
                    chunks.push(ProtocolChunk::reasoning_start(&self.message_id));
                }
                chunks.push(ProtocolChunk::reasoning_delta(&self.message_id, content_delta));
            }
            AgentPartDelta::ToolCall {
                tool_call_id,
                tool_name_delta,
                args_delta,
            } => {
                // Deltas without an id are forwarded under the empty id
                let tool_call_id = tool_call_id.unwrap_or_default();
                if self.reached_output(&tool_call_id) {
                    return;
                }
                if !self.tool_phases.contains_key(&tool_call_id) {
                    let known = tool_name_delta
                        .filter(|name| !name.is_empty())
                        .or_else(|| self.tool_names.get(&tool_call_id).cloned());
                    match known {
                        Some(tool_name) => {
                            self.tool_input_start(tool_call_id.clone(), tool_name, chunks);
                        }
                        None if tool_call_id.is_empty() => {}
                        None => {
                            debug!(tool_call_id = %tool_call_id, "dropping args for a tool call that never started");
                            return;
                        }
                    }
                }
                push_args(tool_call_id, args_delta.as_ref(), chunks);
            }
            AgentPartDelta::Other { kind } => {
                debug!(kind = %kind, "ignoring unrecognised part delta");
            }
        }
    }

    fn tool_call(
        &mut self,
        tool_call_id: String,
        tool_name: String,
        args: Option<Value>,
        chunks: &mut Vec<ProtocolChunk>,
    ) {
        if self.tool_input_start(tool_call_id.clone(), tool_name, chunks) {
            push_args(tool_call_id, args.as_ref(), chunks);
        }
    }

    /// Emit `tool-input-start` unless the call already has output; reports whether it was sent
    fn tool_input_start(
        &mut self,
        tool_call_id: String,
        tool_name: String,
        chunks: &mut Vec<ProtocolChunk>,
    ) -> bool {
        if self.reached_output(&tool_call_id) {
            return false;
        }
        self.tool_phases
            .entry(tool_call_id.clone())
            .or_insert(ToolState::InputStreaming);
        self.tool_names
            .entry(tool_call_id.clone())
            .or_insert_with(|| tool_name.clone());
        chunks.push(ProtocolChunk::tool_input_start(tool_call_id, tool_name));
        true
    }

    fn tool_output(
        &mut self,
        tool_call_id: String,
        tool_name: Option<String>,
        output: Value,
        chunks: &mut Vec<ProtocolChunk>,
    ) {
        if !self.tool_phases.contains_key(&tool_call_id) {
            let known = tool_name.or_else(|| self.tool_names.get(&tool_call_id).cloned());
            match known {
                Some(tool_name) => {
                    self.tool_input_start(tool_call_id.clone(), tool_name, chunks);
                }
                None => {
                    debug!(tool_call_id = %tool_call_id, "dropping output for a tool call that never started");
                    return;
                }
            }
        }
        self.tool_phases
            .insert(tool_call_id.clone(), ToolState::OutputAvailable);
        chunks.push(ProtocolChunk::tool_output_available(tool_call_id, output));
    }

    fn reached_output(&self, tool_call_id: &str) -> bool {
        match self.tool_phases.get(tool_call_id) {
            Some(phase) if phase.regresses_to(ToolState::InputStreaming) => {
                debug!(
                    tool_call_id = %tool_call_id,
                    phase = %phase,
                    "suppressing input chunk for a tool call that already has output"
                );
                true
            }
            _ => false,
        }
    }
}

fn push_args(tool_call_id: String, args: Option<&Value>, chunks: &mut Vec<ProtocolChunk>) {
    match encode_args(args) {
        Some(Ok(delta)) => chunks.push(ProtocolChunk::tool_input_delta(tool_call_id, delta)),
        Some(Err(e)) => chunks.push(ProtocolChunk::error(e)),
        None => {}
    }
}

/// Arguments as `tool-input-delta` text: strings verbatim, anything else as JSON.
///
/// `None` when there is nothing worth sending (absent, null, `""` or `{}`).
fn encode_args(args: Option<&Value>) -> Option<Result<String, String>> {
    match args? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        Value::String(text) => Some(Ok(text.clone())),
        other => Some(
            serde_json::to_string(other)
                .map_err(|e| format!("Failed to serialize tool arguments: {}", e)),
        ),
    }
}
