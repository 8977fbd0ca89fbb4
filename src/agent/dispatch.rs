//! The dispatch loop: user text in, model-written text out
//!
//! Per user turn the loop alternates between asking the model and executing
//! the operation it requested, until the model answers with plain text.
//! Rounds are hard-capped so a model that keeps requesting operations
//! cannot spin the loop forever. Every failure path ends in a text reply;
//! the loop never exits ungracefully mid-turn.

use std::sync::Arc;

use tracing::{info, warn};

use crate::model::{ChatModel, ChatTurn, ModelReply};
use crate::tools::ToolRegistry;

use super::session::ConversationSession;

/// Default maximum operation executions per user turn.
pub const MAX_TOOL_ROUNDS: usize = 5;

/// The conversational control loop.
pub struct Dispatcher {
    model: Arc<dyn ChatModel>,
    registry: ToolRegistry,
    max_tool_rounds: usize,
}

impl Dispatcher {
    pub fn new(model: Arc<dyn ChatModel>, registry: ToolRegistry) -> Self {
        Self {
            model,
            registry,
            max_tool_rounds: MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Resolve one user turn to a text reply.
    ///
    /// Appends the user turn, then loops: a text reply from the model ends
    /// the turn; an operation request is executed through the registry and
    /// its serialized outcome (success or failure alike) goes back to the
    /// model as a tool turn for the next round.
    pub async fn handle_turn(&self, session: &mut ConversationSession, input: &str) -> String {
        session.push(ChatTurn::user(input));
        let declarations = self.registry.declarations();

        let mut rounds = 0;
        loop {
            let reply = match self.model.reply(session.turns(), &declarations).await {
                Ok(reply) => reply,
                Err(err) => {
                    warn!(error = %err, "model connection failed");
                    let text = format!(
                        "I ran into a problem talking to the language model ({}). Please try again.",
                        err
                    );
                    session.push(ChatTurn::assistant(text.clone()));
                    return text;
                }
            };

            match reply {
                ModelReply::Text(text) => {
                    session.push(ChatTurn::assistant(text.clone()));
                    return text;
                }
                ModelReply::ToolCall(call) => {
                    if rounds >= self.max_tool_rounds {
                        warn!(
                            limit = self.max_tool_rounds,
                            "tool round limit reached; ending turn"
                        );
                        let text = format!(
                            "I stopped after {} operations without reaching an answer. \
                             Please narrow the question and try again.",
                            self.max_tool_rounds
                        );
                        session.push(ChatTurn::assistant(text.clone()));
                        return text;
                    }
                    rounds += 1;
                    info!(operation = %call.name, round = rounds, "model requested operation");

                    let outcome = self.registry.execute(&call.name, &call.arguments).await;
                    let call_id = call.id.clone();
                    session.push(ChatTurn::assistant_tool_call(call));
                    session.push(ChatTurn::tool_result(call_id, outcome.to_relay_json()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollcallError;
    use crate::model::{ToolCallRequest, ToolDeclaration, TurnRole};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Model stub that plays back a scripted sequence of replies.
    struct ScriptedModel {
        script: Mutex<Vec<Result<ModelReply, RollcallError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<ModelReply, RollcallError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn reply(
            &self,
            _turns: &[ChatTurn],
            _tools: &[ToolDeclaration],
        ) -> Result<ModelReply, RollcallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(ModelReply::Text("done".to_string()))
            } else {
                script.remove(0)
            }
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn unknown_call(n: usize) -> ToolCallRequest {
        ToolCallRequest {
            id: format!("call-{}", n),
            name: "does_not_exist".to_string(),
            arguments: json!({}),
        }
    }

    #[tokio::test]
    async fn test_plain_text_reply_ends_turn() {
        let model = ScriptedModel::new(vec![Ok(ModelReply::Text("hello there".to_string()))]);
        let dispatcher = Dispatcher::new(model.clone(), ToolRegistry::new());
        let mut session = session();

        let reply = dispatcher.handle_turn(&mut session, "hi").await;
        assert_eq!(reply, "hello there");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        // system + user + assistant
        assert_eq!(session.len(), 3);
        assert_eq!(session.turns()[2].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn test_unknown_operation_relayed_not_crashed() {
        let model = ScriptedModel::new(vec![
            Ok(ModelReply::ToolCall(unknown_call(1))),
            Ok(ModelReply::Text("sorry, no such report".to_string())),
        ]);
        let dispatcher = Dispatcher::new(model, ToolRegistry::new());
        let mut session = session();

        let reply = dispatcher.handle_turn(&mut session, "run the thing").await;
        assert_eq!(reply, "sorry, no such report");

        // The tool turn carries the serialized failure outcome.
        let tool_turn = session
            .turns()
            .iter()
            .find(|t| t.role == TurnRole::Tool)
            .unwrap();
        assert!(tool_turn.content.contains("unknown_operation"));
        assert_eq!(tool_turn.tool_call_id.as_deref(), Some("call-1"));
    }

    #[tokio::test]
    async fn test_round_limit_stops_a_looping_model() {
        // A model that never stops asking for operations.
        let script: Vec<_> = (0..20)
            .map(|n| Ok(ModelReply::ToolCall(unknown_call(n))))
            .collect();
        let model = ScriptedModel::new(script);
        let dispatcher = Dispatcher::new(model.clone(), ToolRegistry::new());
        let mut session = session();

        let reply = dispatcher.handle_turn(&mut session, "loop forever").await;
        assert!(reply.contains("stopped after 5 operations"));
        // 5 executed rounds plus the capped sixth request.
        assert_eq!(model.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_model_error_becomes_text() {
        let model = ScriptedModel::new(vec![Err(RollcallError::Network(
            "connection reset".to_string(),
        ))]);
        let dispatcher = Dispatcher::new(model, ToolRegistry::new());
        let mut session = session();

        let reply = dispatcher.handle_turn(&mut session, "hi").await;
        assert!(reply.contains("problem talking to the language model"));
        // The failed turn still left the session in a consistent state.
        assert_eq!(session.turns().last().unwrap().role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn test_tool_turn_ordering() {
        let model = ScriptedModel::new(vec![
            Ok(ModelReply::ToolCall(unknown_call(1))),
            Ok(ModelReply::Text("final".to_string())),
        ]);
        let dispatcher = Dispatcher::new(model, ToolRegistry::new());
        let mut session = session();

        dispatcher.handle_turn(&mut session, "go").await;
        let roles: Vec<TurnRole> = session.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TurnRole::System,
                TurnRole::User,
                TurnRole::Assistant, // tool call request
                TurnRole::Tool,      // serialized outcome
                TurnRole::Assistant, // final text
            ]
        );
    }
}
