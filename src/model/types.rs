//! Core types for the model connection

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
    /// Serialized tool outcome relayed back to the model
    Tool,
}

impl TurnRole {
    pub fn as_str(&self) -> &str {
        match self {
            TurnRole::System => "system",
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::Tool => "tool",
        }
    }
}

/// One operation invocation requested by the model.
///
/// `arguments` is already parsed from the connection's JSON-string
/// representation; operation code never sees the model SDK's types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// A turn in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    /// Set on an assistant turn that requested an operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallRequest>,
    /// Set on a tool turn; links the outcome to the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
            tool_call: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            tool_call: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            tool_call: None,
            tool_call_id: None,
        }
    }

    /// Assistant turn carrying an operation request.
    pub fn assistant_tool_call(call: ToolCallRequest) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: String::new(),
            tool_call: Some(call),
            tool_call_id: None,
        }
    }

    /// Tool turn carrying the serialized outcome of `call_id`.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Tool,
            content: content.into(),
            tool_call: None,
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// What the model decided to do with the latest turn.
#[derive(Debug, Clone)]
pub enum ModelReply {
    /// Plain text for the user
    Text(String),
    /// A single operation invocation to execute
    ToolCall(ToolCallRequest),
}

/// Declaration of one catalog operation, consumed by the model for
/// operation selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema for the parameters (type, properties, required)
    pub parameters: Value,
}
