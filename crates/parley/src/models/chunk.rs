use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::message::{ProviderMetadata, SourceDocumentPart, SourceUrlPart};
use super::tagged::{self, serialize_tagged, split_tag};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StartChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub message_metadata: Value,
}

/// Body of `finish` and `message-metadata`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataChunk {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub message_metadata: Value,
}

/// Opens or closes a text or reasoning stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoundaryChunk {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeltaChunk {
    pub id: String,
    pub delta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputStartChunk {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputDeltaChunk {
    pub tool_call_id: String,
    pub input_text_delta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputAvailableChunk {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolInputErrorChunk {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
    pub error_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolOutputAvailableChunk {
    pub tool_call_id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub output: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preliminary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolOutputErrorChunk {
    pub tool_call_id: String,
    pub error_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_executed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileChunk {
    pub url: String,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DataChunk {
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErrorChunk {
    pub error_text: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoFields {}

/// One event of the UI message stream protocol
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolChunk {
    Start(StartChunk),
    Finish(MetadataChunk),
    Abort,
    StartStep,
    FinishStep,
    MessageMetadata(MetadataChunk),
    TextStart(BoundaryChunk),
    TextDelta(DeltaChunk),
    TextEnd(BoundaryChunk),
    ReasoningStart(BoundaryChunk),
    ReasoningDelta(DeltaChunk),
    ReasoningEnd(BoundaryChunk),
    ToolInputStart(ToolInputStartChunk),
    ToolInputDelta(ToolInputDeltaChunk),
    ToolInputAvailable(ToolInputAvailableChunk),
    ToolInputError(ToolInputErrorChunk),
    ToolOutputAvailable(ToolOutputAvailableChunk),
    ToolOutputError(ToolOutputErrorChunk),
    SourceUrl(SourceUrlPart),
    SourceDocument(SourceDocumentPart),
    File(FileChunk),
    Data(DataChunk),
    Error(ErrorChunk),
}

impl ProtocolChunk {
    /// `start` without a message id; the client assigns one
    pub fn start() -> Self {
        ProtocolChunk::Start(StartChunk::default())
    }

    pub fn finish() -> Self {
        ProtocolChunk::Finish(MetadataChunk::default())
    }

    pub fn abort() -> Self {
        ProtocolChunk::Abort
    }

    pub fn start_step() -> Self {
        ProtocolChunk::StartStep
    }

    pub fn finish_step() -> Self {
        ProtocolChunk::FinishStep
    }

    pub fn message_metadata(metadata: Value) -> Self {
        ProtocolChunk::MessageMetadata(MetadataChunk {
            message_metadata: metadata,
        })
    }

    pub fn text_start<S: Into<String>>(id: S) -> Self {
        ProtocolChunk::TextStart(BoundaryChunk::new(id))
    }

    pub fn text_delta<S: Into<String>, D: Into<String>>(id: S, delta: D) -> Self {
        ProtocolChunk::TextDelta(DeltaChunk::new(id, delta))
    }

    pub fn text_end<S: Into<String>>(id: S) -> Self {
        ProtocolChunk::TextEnd(BoundaryChunk::new(id))
    }

    pub fn reasoning_start<S: Into<String>>(id: S) -> Self {
        ProtocolChunk::ReasoningStart(BoundaryChunk::new(id))
    }

    pub fn reasoning_delta<S: Into<String>, D: Into<String>>(id: S, delta: D) -> Self {
        ProtocolChunk::ReasoningDelta(DeltaChunk::new(id, delta))
    }

    pub fn reasoning_end<S: Into<String>>(id: S) -> Self {
        ProtocolChunk::ReasoningEnd(BoundaryChunk::new(id))
    }

    pub fn tool_input_start<S: Into<String>, N: Into<String>>(tool_call_id: S, tool_name: N) -> Self {
        ProtocolChunk::ToolInputStart(ToolInputStartChunk {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            provider_executed: None,
            dynamic: None,
        })
    }

    pub fn tool_input_delta<S: Into<String>, D: Into<String>>(tool_call_id: S, delta: D) -> Self {
        ProtocolChunk::ToolInputDelta(ToolInputDeltaChunk {
            tool_call_id: tool_call_id.into(),
            input_text_delta: delta.into(),
        })
    }

    pub fn tool_input_available<S: Into<String>, N: Into<String>>(
        tool_call_id: S,
        tool_name: N,
        input: Value,
    ) -> Self {
        ProtocolChunk::ToolInputAvailable(ToolInputAvailableChunk {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            input,
            provider_executed: None,
            provider_metadata: None,
            dynamic: None,
        })
    }

    pub fn tool_output_available<S: Into<String>>(tool_call_id: S, output: Value) -> Self {
        ProtocolChunk::ToolOutputAvailable(ToolOutputAvailableChunk {
            tool_call_id: tool_call_id.into(),
            output,
            provider_executed: None,
            dynamic: None,
            preliminary: None,
        })
    }

    pub fn tool_output_error<S: Into<String>, E: Into<String>>(tool_call_id: S, error_text: E) -> Self {
        ProtocolChunk::ToolOutputError(ToolOutputErrorChunk {
            tool_call_id: tool_call_id.into(),
            error_text: error_text.into(),
            provider_executed: None,
            dynamic: None,
        })
    }

    pub fn error<S: Into<String>>(error_text: S) -> Self {
        ProtocolChunk::Error(ErrorChunk {
            error_text: error_text.into(),
        })
    }

    /// The wire discriminator of this chunk
    pub fn chunk_type(&self) -> String {
        let name = match self {
            ProtocolChunk::Start(_) => "start",
            ProtocolChunk::Finish(_) => "finish",
            ProtocolChunk::Abort => "abort",
            ProtocolChunk::StartStep => "start-step",
            ProtocolChunk::FinishStep => "finish-step",
            ProtocolChunk::MessageMetadata(_) => "message-metadata",
            ProtocolChunk::TextStart(_) => "text-start",
            ProtocolChunk::TextDelta(_) => "text-delta",
            ProtocolChunk::TextEnd(_) => "text-end",
            ProtocolChunk::ReasoningStart(_) => "reasoning-start",
            ProtocolChunk::ReasoningDelta(_) => "reasoning-delta",
            ProtocolChunk::ReasoningEnd(_) => "reasoning-end",
            ProtocolChunk::ToolInputStart(_) => "tool-input-start",
            ProtocolChunk::ToolInputDelta(_) => "tool-input-delta",
            ProtocolChunk::ToolInputAvailable(_) => "tool-input-available",
            ProtocolChunk::ToolInputError(_) => "tool-input-error",
            ProtocolChunk::ToolOutputAvailable(_) => "tool-output-available",
            ProtocolChunk::ToolOutputError(_) => "tool-output-error",
            ProtocolChunk::SourceUrl(_) => "source-url",
            ProtocolChunk::SourceDocument(_) => "source-document",
            ProtocolChunk::File(_) => "file",
            ProtocolChunk::Data(chunk) => return format!("data-{}", chunk.name),
            ProtocolChunk::Error(_) => "error",
        };
        name.to_string()
    }

    /// The id that ties this chunk to a text, reasoning or tool-call stream
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            ProtocolChunk::TextStart(chunk)
            | ProtocolChunk::TextEnd(chunk)
            | ProtocolChunk::ReasoningStart(chunk)
            | ProtocolChunk::ReasoningEnd(chunk) => Some(&chunk.id),
            ProtocolChunk::TextDelta(chunk) | ProtocolChunk::ReasoningDelta(chunk) => {
                Some(&chunk.id)
            }
            ProtocolChunk::ToolInputStart(chunk) => Some(&chunk.tool_call_id),
            ProtocolChunk::ToolInputDelta(chunk) => Some(&chunk.tool_call_id),
            ProtocolChunk::ToolInputAvailable(chunk) => Some(&chunk.tool_call_id),
            ProtocolChunk::ToolInputError(chunk) => Some(&chunk.tool_call_id),
            ProtocolChunk::ToolOutputAvailable(chunk) => Some(&chunk.tool_call_id),
            ProtocolChunk::ToolOutputError(chunk) => Some(&chunk.tool_call_id),
            _ => None,
        }
    }

    fn from_tagged<E: serde::de::Error>(tag: &str, fields: Map<String, Value>) -> Result<Self, E> {
        let chunk = match tag {
            "start" => ProtocolChunk::Start(tagged::body::<_, E>(fields)?),
            "finish" => ProtocolChunk::Finish(tagged::body::<_, E>(fields)?),
            "abort" => {
                tagged::body::<NoFields, E>(fields)?;
                ProtocolChunk::Abort
            }
            "start-step" => {
                tagged::body::<NoFields, E>(fields)?;
                ProtocolChunk::StartStep
            }
            "finish-step" => {
                tagged::body::<NoFields, E>(fields)?;
                ProtocolChunk::FinishStep
            }
            "message-metadata" => ProtocolChunk::MessageMetadata(tagged::body::<_, E>(fields)?),
            "text-start" => ProtocolChunk::TextStart(tagged::body::<_, E>(fields)?),
            "text-delta" => ProtocolChunk::TextDelta(tagged::body::<_, E>(fields)?),
            "text-end" => ProtocolChunk::TextEnd(tagged::body::<_, E>(fields)?),
            "reasoning-start" => ProtocolChunk::ReasoningStart(tagged::body::<_, E>(fields)?),
            "reasoning-delta" => ProtocolChunk::ReasoningDelta(tagged::body::<_, E>(fields)?),
            "reasoning-end" => ProtocolChunk::ReasoningEnd(tagged::body::<_, E>(fields)?),
            "tool-input-start" => ProtocolChunk::ToolInputStart(tagged::body::<_, E>(fields)?),
            "tool-input-delta" => ProtocolChunk::ToolInputDelta(tagged::body::<_, E>(fields)?),
            "tool-input-available" => ProtocolChunk::ToolInputAvailable(tagged::body::<_, E>(fields)?),
            "tool-input-error" => ProtocolChunk::ToolInputError(tagged::body::<_, E>(fields)?),
            "tool-output-available" => ProtocolChunk::ToolOutputAvailable(tagged::body::<_, E>(fields)?),
            "tool-output-error" => ProtocolChunk::ToolOutputError(tagged::body::<_, E>(fields)?),
            "source-url" => ProtocolChunk::SourceUrl(tagged::body::<_, E>(fields)?),
            "source-document" => ProtocolChunk::SourceDocument(tagged::body::<_, E>(fields)?),
            "file" => ProtocolChunk::File(tagged::body::<_, E>(fields)?),
            "error" => ProtocolChunk::Error(tagged::body::<_, E>(fields)?),
            _ => match tag.strip_prefix("data-") {
                Some(name) => {
                    let mut chunk: DataChunk = tagged::body::<_, E>(fields)?;
                    chunk.name = name.to_string();
                    ProtocolChunk::Data(chunk)
                }
                None => return Err(E::custom(format_args!("unknown chunk type `{}`", tag))),
            },
        };
        Ok(chunk)
    }
}

impl BoundaryChunk {
    pub fn new<S: Into<String>>(id: S) -> Self {
        BoundaryChunk {
            id: id.into(),
            provider_metadata: None,
        }
    }
}

impl DeltaChunk {
    pub fn new<S: Into<String>, D: Into<String>>(id: S, delta: D) -> Self {
        DeltaChunk {
            id: id.into(),
            delta: delta.into(),
            provider_metadata: None,
        }
    }
}

impl Serialize for ProtocolChunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.chunk_type();
        match self {
            ProtocolChunk::Start(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::Finish(chunk) | ProtocolChunk::MessageMetadata(chunk) => {
                serialize_tagged(serializer, &tag, chunk)
            }
            ProtocolChunk::Abort | ProtocolChunk::StartStep | ProtocolChunk::FinishStep => {
                serialize_tagged(serializer, &tag, &NoFields {})
            }
            ProtocolChunk::TextStart(chunk)
            | ProtocolChunk::TextEnd(chunk)
            | ProtocolChunk::ReasoningStart(chunk)
            | ProtocolChunk::ReasoningEnd(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::TextDelta(chunk) | ProtocolChunk::ReasoningDelta(chunk) => {
                serialize_tagged(serializer, &tag, chunk)
            }
            ProtocolChunk::ToolInputStart(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::ToolInputDelta(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::ToolInputAvailable(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::ToolInputError(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::ToolOutputAvailable(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::ToolOutputError(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::SourceUrl(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::SourceDocument(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::File(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::Data(chunk) => serialize_tagged(serializer, &tag, chunk),
            ProtocolChunk::Error(chunk) => serialize_tagged(serializer, &tag, chunk),
        }
    }
}

impl<'de> Deserialize<'de> for ProtocolChunk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, fields) = split_tag::<D::Error>(Value::deserialize(deserializer)?)?;
        ProtocolChunk::from_tagged(&tag, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_is_written_first() {
        let chunk = ProtocolChunk::text_delta("msg_1", "Hello");
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"type":"text-delta","id":"msg_1","delta":"Hello"}"#
        );

        let chunk = ProtocolChunk::tool_input_start("call_1", "get_weather");
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"type":"tool-input-start","toolCallId":"call_1","toolName":"get_weather"}"#
        );
    }

    #[test]
    fn test_null_values_are_omitted() {
        let chunk = ProtocolChunk::tool_output_available("t1", Value::Null);
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"type":"tool-output-available","toolCallId":"t1"}"#
        );

        assert_eq!(
            serde_json::to_string(&ProtocolChunk::start()).unwrap(),
            r#"{"type":"start"}"#
        );
        assert_eq!(
            serde_json::to_string(&ProtocolChunk::finish()).unwrap(),
            r#"{"type":"finish"}"#
        );
    }

    #[test]
    fn test_absent_any_field_decodes_as_null() {
        let chunk: ProtocolChunk =
            serde_json::from_str(r#"{"type":"tool-output-available","toolCallId":"t1"}"#).unwrap();
        assert_eq!(chunk, ProtocolChunk::tool_output_available("t1", Value::Null));
    }

    #[test]
    fn test_all_kinds_roundtrip() {
        let chunks = vec![
            json!({"type": "start", "messageId": "m1", "messageMetadata": {"model": "x"}}),
            json!({"type": "finish", "messageMetadata": {"usage": 12}}),
            json!({"type": "abort"}),
            json!({"type": "start-step"}),
            json!({"type": "finish-step"}),
            json!({"type": "message-metadata", "messageMetadata": {"k": [1, 2]}}),
            json!({"type": "text-start", "id": "m1"}),
            json!({"type": "text-delta", "id": "m1", "delta": "hi", "providerMetadata": {"p": {"a": 1}}}),
            json!({"type": "text-end", "id": "m1"}),
            json!({"type": "reasoning-start", "id": "m1"}),
            json!({"type": "reasoning-delta", "id": "m1", "delta": "hmm"}),
            json!({"type": "reasoning-end", "id": "m1"}),
            json!({"type": "tool-input-start", "toolCallId": "c1", "toolName": "calc", "providerExecuted": true, "dynamic": false}),
            json!({"type": "tool-input-delta", "toolCallId": "c1", "inputTextDelta": "{\"a\":"}),
            json!({"type": "tool-input-available", "toolCallId": "c1", "toolName": "calc", "input": {"a": 1}}),
            json!({"type": "tool-input-error", "toolCallId": "c1", "toolName": "calc", "input": "{a", "errorText": "bad json"}),
            json!({"type": "tool-output-available", "toolCallId": "c1", "output": [1, "two"], "preliminary": true}),
            json!({"type": "tool-output-error", "toolCallId": "c1", "errorText": "failed"}),
            json!({"type": "source-url", "sourceId": "s1", "url": "https://example.com"}),
            json!({"type": "source-document", "sourceId": "s2", "mediaType": "text/plain", "title": "Notes", "filename": "notes.txt"}),
            json!({"type": "file", "url": "https://example.com/a.png", "mediaType": "image/png"}),
            json!({"type": "data-progress", "id": "p1", "data": {"pct": 50}}),
            json!({"type": "error", "errorText": "oops"}),
        ];
        assert_eq!(chunks.len(), 23);

        for value in chunks {
            let chunk: ProtocolChunk = serde_json::from_value(value.clone()).unwrap();
            let first = serde_json::to_string(&chunk).unwrap();
            let decoded: ProtocolChunk = serde_json::from_str(&first).unwrap();
            let second = serde_json::to_string(&decoded).unwrap();
            assert_eq!(first, second);
            assert_eq!(serde_json::to_value(&decoded).unwrap(), value);
            assert_eq!(chunk.chunk_type(), value["type"].as_str().unwrap());
        }
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = serde_json::from_str::<ProtocolChunk>(r#"{"type":"abort","reason":"x"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown field `reason`"));

        let err = serde_json::from_str::<ProtocolChunk>(r#"{"type":"tool-call"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown chunk type `tool-call`");
    }

    #[test]
    fn test_correlation_ids() {
        assert_eq!(ProtocolChunk::text_start("m1").correlation_id(), Some("m1"));
        assert_eq!(
            ProtocolChunk::tool_input_delta("c1", "{}").correlation_id(),
            Some("c1")
        );
        assert_eq!(ProtocolChunk::finish().correlation_id(), None);
    }
}
