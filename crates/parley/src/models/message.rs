use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::tagged::{self, serialize_tagged, split_tag};

/// Provider specific metadata, keyed by provider name
pub type ProviderMetadata = BTreeMap<String, Map<String, Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Streaming state of a text or reasoning part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    Streaming,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextPart {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StreamState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReasoningPart {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StreamState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceUrlPart {
    pub source_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceDocumentPart {
    pub source_id: String,
    pub media_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

/// A file attached to a message, either hosted or inlined as a data URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilePart {
    /// IANA media type of the file
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

/// Marks the boundary between two agent steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepStartPart {}

/// Application data carried as `data-{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataPart {
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data: Value,
}

/// Position of a tool call along input-streaming → input-available → output.
///
/// Both output states are terminal and share the same stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolState {
    InputStreaming,
    InputAvailable,
    OutputAvailable,
    OutputError,
}

impl ToolState {
    pub fn stage(self) -> u8 {
        match self {
            ToolState::InputStreaming => 0,
            ToolState::InputAvailable => 1,
            ToolState::OutputAvailable | ToolState::OutputError => 2,
        }
    }

    /// Whether moving from `self` to `next` would go backwards
    pub fn regresses_to(self, next: ToolState) -> bool {
        next.stage() < self.stage()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolState::InputStreaming => "input-streaming",
            ToolState::InputAvailable => "input-available",
            ToolState::OutputAvailable => "output-available",
            ToolState::OutputError => "output-error",
        }
    }
}

impl fmt::Display for ToolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputStreaming {
    pub tool_call_id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputAvailable {
    pub tool_call_id: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolOutputAvailable {
    pub tool_call_id: String,
    pub input: Value,
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preliminary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolOutputError {
    pub tool_call_id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw_input: Value,
    pub error_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
}

/// State-dependent body of a `tool-{name}` part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ToolInvocation {
    InputStreaming(ToolInputStreaming),
    InputAvailable(ToolInputAvailable),
    OutputAvailable(ToolOutputAvailable),
    OutputError(ToolOutputError),
}

impl ToolInvocation {
    pub fn tool_call_id(&self) -> &str {
        match self {
            ToolInvocation::InputStreaming(part) => &part.tool_call_id,
            ToolInvocation::InputAvailable(part) => &part.tool_call_id,
            ToolInvocation::OutputAvailable(part) => &part.tool_call_id,
            ToolInvocation::OutputError(part) => &part.tool_call_id,
        }
    }

    pub fn state(&self) -> ToolState {
        match self {
            ToolInvocation::InputStreaming(_) => ToolState::InputStreaming,
            ToolInvocation::InputAvailable(_) => ToolState::InputAvailable,
            ToolInvocation::OutputAvailable(_) => ToolState::OutputAvailable,
            ToolInvocation::OutputError(_) => ToolState::OutputError,
        }
    }
}

/// A call to a statically known tool, carried as `tool-{name}`
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPart {
    pub tool_name: String,
    pub invocation: ToolInvocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DynamicToolInputStreaming {
    pub tool_name: String,
    pub tool_call_id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DynamicToolInputAvailable {
    pub tool_name: String,
    pub tool_call_id: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DynamicToolOutputAvailable {
    pub tool_name: String,
    pub tool_call_id: String,
    pub input: Value,
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preliminary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DynamicToolOutputError {
    pub tool_name: String,
    pub tool_call_id: String,
    pub input: Value,
    pub error_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_provider_metadata: Option<ProviderMetadata>,
}

/// A call to a tool that was not known ahead of time, carried as `dynamic-tool`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum DynamicToolPart {
    InputStreaming(DynamicToolInputStreaming),
    InputAvailable(DynamicToolInputAvailable),
    OutputAvailable(DynamicToolOutputAvailable),
    OutputError(DynamicToolOutputError),
}

impl DynamicToolPart {
    pub fn tool_name(&self) -> &str {
        match self {
            DynamicToolPart::InputStreaming(part) => &part.tool_name,
            DynamicToolPart::InputAvailable(part) => &part.tool_name,
            DynamicToolPart::OutputAvailable(part) => &part.tool_name,
            DynamicToolPart::OutputError(part) => &part.tool_name,
        }
    }

    pub fn tool_call_id(&self) -> &str {
        match self {
            DynamicToolPart::InputStreaming(part) => &part.tool_call_id,
            DynamicToolPart::InputAvailable(part) => &part.tool_call_id,
            DynamicToolPart::OutputAvailable(part) => &part.tool_call_id,
            DynamicToolPart::OutputError(part) => &part.tool_call_id,
        }
    }

    pub fn state(&self) -> ToolState {
        match self {
            DynamicToolPart::InputStreaming(_) => ToolState::InputStreaming,
            DynamicToolPart::InputAvailable(_) => ToolState::InputAvailable,
            DynamicToolPart::OutputAvailable(_) => ToolState::OutputAvailable,
            DynamicToolPart::OutputError(_) => ToolState::OutputError,
        }
    }
}

/// One unit of a stored chat message
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(TextPart),
    Reasoning(ReasoningPart),
    SourceUrl(SourceUrlPart),
    SourceDocument(SourceDocumentPart),
    File(FilePart),
    StepStart(StepStartPart),
    Data(DataPart),
    Tool(ToolPart),
    DynamicTool(DynamicToolPart),
}

impl Part {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Part::Text(TextPart {
            text: text.into(),
            state: None,
            provider_metadata: None,
        })
    }

    /// Get the text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(part) => Some(&part.text),
            _ => None,
        }
    }

    /// Tool call id and state for either tool family
    pub fn tool_progress(&self) -> Option<(&str, ToolState)> {
        match self {
            Part::Tool(part) => Some((part.invocation.tool_call_id(), part.invocation.state())),
            Part::DynamicTool(part) => Some((part.tool_call_id(), part.state())),
            _ => None,
        }
    }

    /// The wire discriminator of this part
    pub fn part_type(&self) -> String {
        match self {
            Part::Text(_) => "text".to_string(),
            Part::Reasoning(_) => "reasoning".to_string(),
            Part::SourceUrl(_) => "source-url".to_string(),
            Part::SourceDocument(_) => "source-document".to_string(),
            Part::File(_) => "file".to_string(),
            Part::StepStart(_) => "step-start".to_string(),
            Part::Data(part) => format!("data-{}", part.name),
            Part::Tool(part) => format!("tool-{}", part.tool_name),
            Part::DynamicTool(_) => "dynamic-tool".to_string(),
        }
    }

    fn from_tagged<E: serde::de::Error>(tag: &str, fields: Map<String, Value>) -> Result<Self, E> {
        let part = match tag {
            "text" => Part::Text(tagged::body::<_, E>(fields)?),
            "reasoning" => Part::Reasoning(tagged::body::<_, E>(fields)?),
            "source-url" => Part::SourceUrl(tagged::body::<_, E>(fields)?),
            "source-document" => Part::SourceDocument(tagged::body::<_, E>(fields)?),
            "file" => Part::File(tagged::body::<_, E>(fields)?),
            "step-start" => Part::StepStart(tagged::body::<_, E>(fields)?),
            "dynamic-tool" => Part::DynamicTool(tagged::body::<_, E>(fields)?),
            _ => {
                if let Some(name) = tag.strip_prefix("data-") {
                    let mut part: DataPart = tagged::body::<_, E>(fields)?;
                    part.name = name.to_string();
                    Part::Data(part)
                } else if let Some(name) = tag.strip_prefix("tool-") {
                    Part::Tool(ToolPart {
                        tool_name: name.to_string(),
                        invocation: tagged::body::<_, E>(fields)?,
                    })
                } else {
                    return Err(E::custom(format_args!("unknown part type `{}`", tag)));
                }
            }
        };
        Ok(part)
    }
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.part_type();
        match self {
            Part::Text(part) => serialize_tagged(serializer, &tag, part),
            Part::Reasoning(part) => serialize_tagged(serializer, &tag, part),
            Part::SourceUrl(part) => serialize_tagged(serializer, &tag, part),
            Part::SourceDocument(part) => serialize_tagged(serializer, &tag, part),
            Part::File(part) => serialize_tagged(serializer, &tag, part),
            Part::StepStart(part) => serialize_tagged(serializer, &tag, part),
            Part::Data(part) => serialize_tagged(serializer, &tag, part),
            Part::Tool(part) => serialize_tagged(serializer, &tag, &part.invocation),
            Part::DynamicTool(part) => serialize_tagged(serializer, &tag, part),
        }
    }
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, fields) = split_tag::<D::Error>(Value::deserialize(deserializer)?)?;
        Part::from_tagged(&tag, fields)
    }
}

/// A message as stored and rendered by the chat interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UIMessage {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
    pub parts: Vec<Part>,
}

impl UIMessage {
    pub fn new<S: Into<String>>(id: S, role: Role) -> Self {
        UIMessage {
            id: id.into(),
            role,
            metadata: Value::Null,
            parts: Vec::new(),
        }
    }

    pub fn user<S: Into<String>>(id: S) -> Self {
        Self::new(id, Role::User)
    }

    pub fn assistant<S: Into<String>>(id: S) -> Self {
        Self::new(id, Role::Assistant)
    }

    /// Add any part to the message
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a text part to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_part(Part::text(text))
    }

    pub fn is_text_only(&self) -> bool {
        self.parts.iter().all(|part| matches!(part, Part::Text(_)))
    }

    /// Text parts joined with newlines
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(value: Value) -> Value {
        let part: Part = serde_json::from_value(value).unwrap();
        let encoded = serde_json::to_value(&part).unwrap();
        let decoded: Part = serde_json::from_value(encoded.clone()).unwrap();
        assert_eq!(decoded, part);
        encoded
    }

    #[test]
    fn test_text_part_wire_shape() {
        let part = Part::text("hello");
        let json = serde_json::to_string(&part).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hello"}"#);
    }

    #[test]
    fn test_every_part_family_roundtrips() {
        let parts = vec![
            json!({"type": "text", "text": "hi", "state": "done"}),
            json!({"type": "reasoning", "text": "thinking", "providerMetadata": {"openai": {"itemId": "x"}}}),
            json!({"type": "source-url", "sourceId": "s1", "url": "https://example.com", "title": "Example"}),
            json!({"type": "source-document", "sourceId": "s2", "mediaType": "application/pdf", "title": "Doc"}),
            json!({"type": "file", "mediaType": "image/png", "url": "data:image/png;base64,AAAA", "filename": "a.png"}),
            json!({"type": "step-start"}),
            json!({"type": "data-weather", "id": "w1", "data": {"city": "Lisbon", "temp": 21}}),
            json!({"type": "tool-calc", "toolCallId": "c1", "state": "input-streaming"}),
            json!({"type": "tool-calc", "toolCallId": "c1", "state": "input-available", "input": {"a": 1}}),
            json!({"type": "tool-calc", "toolCallId": "c1", "state": "output-available", "input": {"a": 1}, "output": 2, "preliminary": false}),
            json!({"type": "tool-calc", "toolCallId": "c1", "state": "output-error", "rawInput": "{a:", "errorText": "bad input"}),
            json!({"type": "dynamic-tool", "toolName": "search", "toolCallId": "d1", "state": "input-available", "input": null}),
            json!({"type": "dynamic-tool", "toolName": "search", "toolCallId": "d1", "state": "output-error", "input": {}, "errorText": "boom"}),
        ];

        for value in parts {
            let encoded = roundtrip(value.clone());
            assert_eq!(encoded, value);
        }
    }

    #[test]
    fn test_dynamic_discriminators() {
        let part: Part =
            serde_json::from_value(json!({"type": "data-chart", "data": [1, 2, 3]})).unwrap();
        match &part {
            Part::Data(data) => {
                assert_eq!(data.name, "chart");
                assert_eq!(data.data, json!([1, 2, 3]));
            }
            other => panic!("Expected data part, got {:?}", other),
        }
        assert_eq!(part.part_type(), "data-chart");

        let part: Part = serde_json::from_value(json!({
            "type": "tool-get_weather",
            "toolCallId": "t9",
            "state": "input-available",
            "input": {"city": "Porto"}
        }))
        .unwrap();
        assert_eq!(part.part_type(), "tool-get_weather");
        assert_eq!(part.tool_progress(), Some(("t9", ToolState::InputAvailable)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = serde_json::from_value::<Part>(json!({"type": "text", "text": "a", "extra": 1}))
            .unwrap_err();
        assert!(err.to_string().starts_with("unknown field `extra`"));

        // Named tool parts do not accept the dynamic-only field
        let err = serde_json::from_value::<Part>(json!({
            "type": "tool-calc",
            "toolName": "calc",
            "toolCallId": "c1",
            "state": "input-streaming"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("toolName"));
    }

    #[test]
    fn test_unknown_part_type_is_rejected() {
        let err = serde_json::from_value::<Part>(json!({"type": "video", "url": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "unknown part type `video`");

        let err = serde_json::from_value::<Part>(json!({"text": "no tag"})).unwrap_err();
        assert_eq!(err.to_string(), "missing field `type`");
    }

    #[test]
    fn test_any_payloads_accept_arbitrary_json() {
        let message: UIMessage = serde_json::from_value(json!({
            "id": "m1",
            "role": "assistant",
            "metadata": {"anything": [1, {"nested": true}], "extra": null},
            "parts": [{"type": "data-x", "data": {"free": {"form": ["json"]}}}]
        }))
        .unwrap();
        assert_eq!(message.metadata["anything"][1]["nested"], json!(true));
    }

    #[test]
    fn test_message_roundtrip_is_stable() {
        let message = UIMessage::assistant("m1")
            .with_text("first")
            .with_part(Part::StepStart(StepStartPart::default()))
            .with_part(Part::Tool(ToolPart {
                tool_name: "calc".to_string(),
                invocation: ToolInvocation::OutputAvailable(ToolOutputAvailable {
                    tool_call_id: "c1".to_string(),
                    input: json!({"expr": "1+1"}),
                    output: json!(2),
                    provider_executed: None,
                    call_provider_metadata: None,
                    preliminary: None,
                }),
            }));

        let first = serde_json::to_string(&message).unwrap();
        let decoded: UIMessage = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&decoded).unwrap();
        assert_eq!(first, second);
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_null_any_fields_roundtrip() {
        let message: UIMessage = serde_json::from_value(json!({
            "id": "m1",
            "role": "assistant",
            "metadata": null,
            "parts": [
                {"type": "tool-calc", "state": "input-streaming", "toolCallId": "c1", "input": null},
                {"type": "tool-calc", "state": "output-error", "toolCallId": "c2", "input": null, "rawInput": null, "errorText": "bad"},
                {"type": "dynamic-tool", "state": "input-streaming", "toolName": "search", "toolCallId": "d1", "input": null}
            ]
        }))
        .unwrap();
        assert_eq!(message.metadata, Value::Null);

        let first = serde_json::to_string(&message).unwrap();
        let decoded: UIMessage = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&decoded).unwrap();
        assert_eq!(first, second);
        assert_eq!(decoded, message);
        assert!(!first.contains("null"));

        // Built in code rather than decoded
        let mut built = UIMessage::assistant("m2");
        built.metadata = Value::Null;
        let built = built.with_part(Part::Tool(ToolPart {
            tool_name: "calc".to_string(),
            invocation: ToolInvocation::InputStreaming(ToolInputStreaming {
                tool_call_id: "c1".to_string(),
                input: Value::Null,
                provider_executed: None,
            }),
        }));
        let first = serde_json::to_string(&built).unwrap();
        let decoded: UIMessage = serde_json::from_str(&first).unwrap();
        assert_eq!(serde_json::to_string(&decoded).unwrap(), first);
    }

    #[test]
    fn test_joined_text_and_text_only() {
        let message = UIMessage::user("u1").with_text("line one").with_text("line two");
        assert!(message.is_text_only());
        assert_eq!(message.joined_text(), "line one\nline two");

        let message = message.with_part(Part::StepStart(StepStartPart::default()));
        assert!(!message.is_text_only());
    }

    #[test]
    fn test_tool_state_stages() {
        assert!(ToolState::OutputAvailable.regresses_to(ToolState::InputStreaming));
        assert!(ToolState::InputAvailable.regresses_to(ToolState::InputStreaming));
        assert!(!ToolState::InputStreaming.regresses_to(ToolState::OutputError));
        assert!(!ToolState::OutputError.regresses_to(ToolState::OutputAvailable));
        assert_eq!(ToolState::OutputError.to_string(), "output-error");
    }
}
