//! Model connection: the conversation-provider seam
//!
//! The dispatch loop talks to the model only through [`ChatModel`], so the
//! provider can be swapped (or scripted in tests) without touching the
//! loop. The shipped implementation is OpenAI-compatible function calling.

pub mod openai;
pub mod types;

pub use openai::OpenAiModel;
pub use types::{ChatTurn, ModelReply, ToolCallRequest, ToolDeclaration, TurnRole};

use async_trait::async_trait;

use crate::error::RollcallResult;

/// A conversation provider.
///
/// Takes the accumulated turn history plus the declared operation catalog
/// and returns either plain text or a single operation invocation request.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn reply(
        &self,
        turns: &[ChatTurn],
        tools: &[ToolDeclaration],
    ) -> RollcallResult<ModelReply>;
}
