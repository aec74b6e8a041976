use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::message::{Part, ToolState, UIMessage};
use super::tagged::TAG;

const TRIGGER: &str = "trigger";
const SUBMIT_FIELDS: &[&str] = &[TRIGGER, "id", "messages", "model", "webSearch"];
const REGENERATE_FIELDS: &[&str] = &[TRIGGER, "id", "messages", "messageId"];
const MESSAGE_FIELDS: &[&str] = &["id", "role", "metadata", "parts"];
const ROLES: &[&str] = &["system", "user", "assistant"];
const STATIC_PART_TYPES: &[&str] = &[
    "text",
    "reasoning",
    "source-url",
    "source-document",
    "file",
    "step-start",
    "dynamic-tool",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitMessage {
    pub id: String,
    pub messages: Vec<UIMessage>,
    pub model: String,
    pub web_search: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegenerateMessage {
    pub id: String,
    pub messages: Vec<UIMessage>,
    pub message_id: String,
}

/// Body of `POST /api/chat`, discriminated by `trigger`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "kebab-case")]
pub enum ChatRequest {
    SubmitMessage(SubmitMessage),
    RegenerateMessage(RegenerateMessage),
}

impl ChatRequest {
    /// Parse and validate a raw request body.
    ///
    /// Every problem found is reported, each with the path of the offending field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            ValidationError::from(ValidationIssue::new(
                Vec::new(),
                format!("Invalid JSON: {}", e),
                IssueKind::JsonInvalid,
            ))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let mut validator = Validator::default();
        validator.chat_request(&value);
        validator.into_result()?;

        let request: ChatRequest = serde_json::from_value(value).map_err(|e| {
            ValidationError::from(ValidationIssue::new(
                Vec::new(),
                e.to_string(),
                IssueKind::ValueError,
            ))
        })?;

        let issues = tool_state_regressions(request.messages());
        if issues.is_empty() {
            Ok(request)
        } else {
            Err(ValidationError { issues })
        }
    }

    pub fn trigger(&self) -> &'static str {
        match self {
            ChatRequest::SubmitMessage(_) => "submit-message",
            ChatRequest::RegenerateMessage(_) => "regenerate-message",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChatRequest::SubmitMessage(request) => &request.id,
            ChatRequest::RegenerateMessage(request) => &request.id,
        }
    }

    pub fn messages(&self) -> &[UIMessage] {
        match self {
            ChatRequest::SubmitMessage(request) => &request.messages,
            ChatRequest::RegenerateMessage(request) => &request.messages,
        }
    }
}

/// One step of a field path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(field: &str) -> Self {
        LocSegment::Field(field.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Field(field) => f.write_str(field),
            LocSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    JsonInvalid,
    ModelType,
    UnionTagNotFound,
    UnionTagInvalid,
    Missing,
    ExtraForbidden,
    StringType,
    BoolType,
    ListType,
    LiteralError,
    InvalidType,
    ValueError,
    ToolStateRegression,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::JsonInvalid => "json_invalid",
            IssueKind::ModelType => "model_type",
            IssueKind::UnionTagNotFound => "union_tag_not_found",
            IssueKind::UnionTagInvalid => "union_tag_invalid",
            IssueKind::Missing => "missing",
            IssueKind::ExtraForbidden => "extra_forbidden",
            IssueKind::StringType => "string_type",
            IssueKind::BoolType => "bool_type",
            IssueKind::ListType => "list_type",
            IssueKind::LiteralError => "literal_error",
            IssueKind::InvalidType => "invalid_type",
            IssueKind::ValueError => "value_error",
            IssueKind::ToolStateRegression => "tool_state_regression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    pub fn new<S: Into<String>>(loc: Vec<LocSegment>, msg: S, kind: IssueKind) -> Self {
        ValidationIssue {
            loc,
            msg: msg.into(),
            kind: kind.as_str().to_string(),
        }
    }

    /// Dotted form of `loc`, e.g. `messages.0.parts`
    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("request failed validation with {} issue(s)", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl From<ValidationIssue> for ValidationError {
    fn from(issue: ValidationIssue) -> Self {
        ValidationError {
            issues: vec![issue],
        }
    }
}

/// Walks a request body collecting every structural problem it finds
#[derive(Default)]
struct Validator {
    path: Vec<LocSegment>,
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn into_result(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }

    fn report(&mut self, field: Option<&str>, msg: impl Into<String>, kind: IssueKind) {
        let mut loc = self.path.clone();
        if let Some(field) = field {
            loc.push(field.into());
        }
        self.issues.push(ValidationIssue::new(loc, msg, kind));
    }

    fn nested<F: FnOnce(&mut Self)>(&mut self, segment: LocSegment, f: F) {
        self.path.push(segment);
        f(self);
        self.path.pop();
    }

    fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(fields) => Some(fields),
            _ => {
                self.report(None, "Input should be a valid dictionary or object", IssueKind::ModelType);
                None
            }
        }
    }

    /// Report missing and extra keys against the allowed set, `optional` keys may be absent
    fn fields(&mut self, fields: &Map<String, Value>, allowed: &[&str], optional: &[&str]) {
        for &name in allowed {
            if !optional.contains(&name) && !fields.contains_key(name) {
                self.report(Some(name), "Field required", IssueKind::Missing);
            }
        }
        for name in fields.keys() {
            if !allowed.contains(&name.as_str()) {
                self.report(
                    Some(name.as_str()),
                    "Extra inputs are not permitted",
                    IssueKind::ExtraForbidden,
                );
            }
        }
    }

    fn string(&mut self, fields: &Map<String, Value>, name: &str) {
        if let Some(value) = fields.get(name) {
            if !value.is_string() {
                self.report(Some(name), "Input should be a valid string", IssueKind::StringType);
            }
        }
    }

    fn boolean(&mut self, fields: &Map<String, Value>, name: &str) {
        if let Some(value) = fields.get(name) {
            if !value.is_boolean() {
                self.report(Some(name), "Input should be a valid boolean", IssueKind::BoolType);
            }
        }
    }

    fn list<'a>(&mut self, fields: &'a Map<String, Value>, name: &str) -> Option<&'a Vec<Value>> {
        match fields.get(name)? {
            Value::Array(items) => Some(items),
            _ => {
                self.report(Some(name), "Input should be a valid list", IssueKind::ListType);
                None
            }
        }
    }

    fn chat_request(&mut self, value: &Value) {
        let Some(fields) = self.object(value) else {
            return;
        };

        let allowed = match fields.get(TRIGGER) {
            None => {
                self.report(
                    Some(TRIGGER),
                    format!("Unable to extract tag using discriminator '{}'", TRIGGER),
                    IssueKind::UnionTagNotFound,
                );
                return;
            }
            Some(Value::String(trigger)) if trigger == "submit-message" => SUBMIT_FIELDS,
            Some(Value::String(trigger)) if trigger == "regenerate-message" => REGENERATE_FIELDS,
            Some(other) => {
                self.report(
                    Some(TRIGGER),
                    format!(
                        "Input tag {} found using '{}' does not match any of the expected tags: 'submit-message', 'regenerate-message'",
                        other, TRIGGER
                    ),
                    IssueKind::UnionTagInvalid,
                );
                return;
            }
        };

        self.fields(fields, allowed, &[]);
        self.string(fields, "id");
        self.string(fields, "model");
        self.string(fields, "messageId");
        self.boolean(fields, "webSearch");

        if let Some(messages) = self.list(fields, "messages") {
            self.nested("messages".into(), |v| {
                for (index, message) in messages.iter().enumerate() {
                    v.nested(index.into(), |v| v.message(message));
                }
            });
        }
    }

    fn message(&mut self, value: &Value) {
        let Some(fields) = self.object(value) else {
            return;
        };

        self.fields(fields, MESSAGE_FIELDS, &["metadata"]);
        self.string(fields, "id");

        if let Some(role) = fields.get("role") {
            match role.as_str() {
                Some(role) if ROLES.contains(&role) => {}
                _ => self.report(
                    Some("role"),
                    "Input should be 'system', 'user' or 'assistant'",
                    IssueKind::LiteralError,
                ),
            }
        }

        if let Some(parts) = self.list(fields, "parts") {
            self.nested("parts".into(), |v| {
                for (index, part) in parts.iter().enumerate() {
                    v.nested(index.into(), |v| v.part(part));
                }
            });
        }
    }

    fn part(&mut self, value: &Value) {
        let Some(fields) = self.object(value) else {
            return;
        };

        match fields.get(TAG) {
            None => {
                self.report(
                    Some(TAG),
                    format!("Unable to extract tag using discriminator '{}'", TAG),
                    IssueKind::UnionTagNotFound,
                );
                return;
            }
            Some(Value::String(tag))
                if STATIC_PART_TYPES.contains(&tag.as_str())
                    || is_named(tag, "data-")
                    || is_named(tag, "tool-") => {}
            Some(other) => {
                self.report(
                    Some(TAG),
                    format!("Input tag {} found using '{}' does not match any of the expected part types", other, TAG),
                    IssueKind::UnionTagInvalid,
                );
                return;
            }
        }

        if let Err(e) = serde_json::from_value::<Part>(value.clone()) {
            let (field, msg, kind) = describe_serde_error(&e.to_string());
            self.report(field.as_deref(), msg, kind);
        }
    }
}

fn is_named(tag: &str, prefix: &str) -> bool {
    tag.strip_prefix(prefix).is_some_and(|name| !name.is_empty())
}

/// Map a serde error message onto a field, a readable message and an issue kind
fn describe_serde_error(message: &str) -> (Option<String>, String, IssueKind) {
    if let Some(field) = backticked(message, "missing field `") {
        return (Some(field), "Field required".to_string(), IssueKind::Missing);
    }
    if let Some(field) = backticked(message, "unknown field `") {
        return (
            Some(field),
            "Extra inputs are not permitted".to_string(),
            IssueKind::ExtraForbidden,
        );
    }
    // Enums inside parts are the `state` literals
    if message.starts_with("unknown variant `") {
        return (Some("state".to_string()), message.to_string(), IssueKind::LiteralError);
    }
    if message.starts_with("invalid type:") {
        let kind = if message.ends_with("expected a string") {
            IssueKind::StringType
        } else if message.ends_with("expected a boolean") {
            IssueKind::BoolType
        } else if message.ends_with("expected a sequence") {
            IssueKind::ListType
        } else {
            IssueKind::InvalidType
        };
        return (None, message.to_string(), kind);
    }
    (None, message.to_string(), IssueKind::ValueError)
}

fn backticked(message: &str, prefix: &str) -> Option<String> {
    let rest = message.strip_prefix(prefix)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Tool call ids whose state goes backwards across the message history
fn tool_state_regressions(messages: &[UIMessage]) -> Vec<ValidationIssue> {
    let mut phases: HashMap<&str, ToolState> = HashMap::new();
    let mut issues = Vec::new();

    for (message_index, message) in messages.iter().enumerate() {
        for (part_index, part) in message.parts.iter().enumerate() {
            let Some((tool_call_id, state)) = part.tool_progress() else {
                continue;
            };
            match phases.get(tool_call_id) {
                Some(previous) if previous.regresses_to(state) => {
                    issues.push(ValidationIssue::new(
                        vec![
                            "messages".into(),
                            message_index.into(),
                            "parts".into(),
                            part_index.into(),
                            "state".into(),
                        ],
                        format!(
                            "Tool call '{}' cannot move from {} back to {}",
                            tool_call_id, previous, state
                        ),
                        IssueKind::ToolStateRegression,
                    ));
                }
                _ => {
                    phases.insert(tool_call_id, state);
                }
            }
        }
    }

    issues
}
