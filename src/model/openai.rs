//! OpenAI-compatible chat model connection (Chat Completions API)
//!
//! Speaks the `tools` / `tool_calls` function-calling dialect, so any
//! compatible endpoint (or proxy) can serve as the conversation provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{RollcallError, RollcallResult};

use super::types::{ChatTurn, ModelReply, ToolCallRequest, ToolDeclaration, TurnRole};
use super::ChatModel;

#[derive(Debug, Serialize)]
struct RequestBody {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageOut,
}

#[derive(Debug, Deserialize)]
struct MessageOut {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallOut>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallOut {
    id: String,
    function: Option<FunctionOut>,
}

#[derive(Debug, Deserialize)]
struct FunctionOut {
    name: Option<String>,
    /// JSON-encoded argument object
    arguments: Option<String>,
}

/// Chat Completions client.
pub struct OpenAiModel {
    config: ModelConfig,
    client: reqwest::Client,
}

impl OpenAiModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Construct from the environment (`OPENAI_API_KEY` required).
    pub fn from_env() -> RollcallResult<Self> {
        ModelConfig::from_env().map(Self::new)
    }

    fn build_body(&self, turns: &[ChatTurn], tools: &[ToolDeclaration]) -> RequestBody {
        let messages = turns.iter().map(turn_to_message).collect();
        let tools = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    },
                })
            })
            .collect();
        RequestBody {
            model: self.config.model.clone(),
            messages,
            tools,
            temperature: self.config.temperature,
        }
    }
}

fn turn_to_message(turn: &ChatTurn) -> Value {
    match turn.role {
        TurnRole::Assistant => {
            if let Some(call) = &turn.tool_call {
                json!({
                    "role": "assistant",
                    "content": turn.content,
                    "tool_calls": [{
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.arguments.to_string(),
                        },
                    }],
                })
            } else {
                json!({ "role": "assistant", "content": turn.content })
            }
        }
        TurnRole::Tool => json!({
            "role": "tool",
            "tool_call_id": turn.tool_call_id,
            "content": turn.content,
        }),
        role => json!({ "role": role.as_str(), "content": turn.content }),
    }
}

/// Parse the function-call arguments string; an absent or unparseable
/// string becomes an empty object so argument validation in the registry
/// can report what is missing.
fn parse_arguments(raw: Option<&str>) -> Value {
    match raw {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(s).unwrap_or_else(|_| json!({})),
        _ => json!({}),
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn reply(
        &self,
        turns: &[ChatTurn],
        tools: &[ToolDeclaration],
    ) -> RollcallResult<ModelReply> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = self.build_body(turns, tools);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RollcallError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RollcallError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => RollcallError::ModelAuth(text),
                429 => RollcallError::ModelRateLimit(text),
                400..=499 => RollcallError::ModelRequest(text),
                _ => RollcallError::Model(text),
            });
        }

        let parsed: ResponseBody = serde_json::from_str(&text)
            .map_err(|e| RollcallError::MalformedReply(format!("{}: {}", e, text)))?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| RollcallError::MalformedReply("no choices in reply".to_string()))?;

        // The loop executes one operation per round, so only the first
        // requested call is surfaced; the model re-requests any others on
        // the next round.
        if let Some(call) = message.tool_calls.into_iter().flatten().next() {
            let name = call
                .function
                .as_ref()
                .and_then(|f| f.name.clone())
                .ok_or_else(|| {
                    RollcallError::MalformedReply("tool call without a function name".to_string())
                })?;
            let arguments =
                parse_arguments(call.function.as_ref().and_then(|f| f.arguments.as_deref()));
            debug!(tool = %name, "model requested operation");
            return Ok(ModelReply::ToolCall(ToolCallRequest {
                id: call.id,
                name,
                arguments,
            }));
        }

        Ok(ModelReply::Text(message.content.unwrap_or_default()))
    }
}
