//! Rollcall: a conversational assistant over HR data.
//!
//! This library provides:
//! - A backend client for HR REST endpoints (leave, employee master,
//!   attendance) with uniform outcome classification
//! - A fixed tool catalog the language model selects operations from
//! - The dispatch loop alternating between model replies and operation
//!   execution
//! - Name resolution over the employee roster
//! - A readline console adapter
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rollcall::{Config, Dispatcher, HrClient, OpenAiModel, ToolRegistry};
//! use rollcall::agent::ConversationSession;
//!
//! let config = Config::from_env()?;
//! let client = Arc::new(HrClient::new(config.backend));
//! let registry = ToolRegistry::with_catalog(client);
//! let model = Arc::new(OpenAiModel::new(config.model));
//! let dispatcher = Dispatcher::new(model, registry);
//!
//! let mut session = ConversationSession::new();
//! let reply = dispatcher.handle_turn(&mut session, "Who is MMT6765's manager?").await;
//! ```

pub mod agent;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod tools;
pub mod validate;

// Re-export key types
pub use crate::agent::{ConversationSession, Dispatcher};
pub use crate::backend::{FailureKind, HrApi, HrClient, ToolOutcome};
pub use crate::config::{BackendConfig, Config, ModelConfig};
pub use crate::error::{RollcallError, RollcallResult};
pub use crate::model::{ChatModel, OpenAiModel};
pub use crate::tools::{Tool, ToolRegistry};
