//! Injected configuration for the backend client and the model connection
//!
//! Credentials and addresses are never embedded in source. Everything is
//! loaded once at startup from the environment and handed to the components
//! at construction.

use std::time::Duration;

use crate::error::{RollcallError, RollcallResult};

/// Default chat-completions endpoint base.
const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model id when `OPENAI_MODEL` is not set.
const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";

/// Connection settings for the HR backend API
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base address, e.g. `https://acme.example.com` (no trailing slash)
    pub base_url: String,
    /// HTTP Basic Auth username
    pub username: String,
    /// HTTP Basic Auth password
    pub password: String,
    /// In-body API key for the leave endpoint
    pub leave_api_key: String,
    /// In-body API key for the employee master endpoint
    pub employee_api_key: String,
    /// In-body dataset key for the employee master endpoint
    pub employee_dataset_key: String,
    /// In-body API key for the attendance endpoint
    pub attendance_api_key: String,
    /// Timeout for small-payload calls (employee lookup)
    pub short_timeout: Duration,
    /// Timeout for medium calls (leave, attendance)
    pub medium_timeout: Duration,
    /// Timeout for the full-roster fetch
    pub roster_timeout: Duration,
    /// How long a fetched roster stays valid in the read-through cache
    pub roster_cache_ttl: Duration,
}

/// Connection settings for the chat model
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// API key, from `OPENAI_API_KEY`
    pub api_key: String,
    /// Base URL, default `https://api.openai.com/v1`; any compatible endpoint works
    pub base_url: String,
    /// Model id, e.g. `gpt-4o-mini`
    pub model: String,
    /// Sampling temperature; kept low so tool selection stays consistent
    pub temperature: f32,
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub model: ModelConfig,
    /// Maximum tool rounds the dispatch loop allows per user turn
    pub max_tool_rounds: usize,
}

fn required(name: &str) -> RollcallResult<String> {
    std::env::var(name).map_err(|_| RollcallError::Configuration(format!("{} not set", name)))
}

impl BackendConfig {
    /// Load backend settings from the environment.
    ///
    /// Required: `HR_API_BASE_URL`, `HR_API_USERNAME`, `HR_API_PASSWORD`,
    /// `HR_LEAVE_API_KEY`, `HR_EMPLOYEE_API_KEY`, `HR_EMPLOYEE_DATASET_KEY`,
    /// `HR_ATTENDANCE_API_KEY`.
    pub fn from_env() -> RollcallResult<Self> {
        let base_url = required("HR_API_BASE_URL")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: required("HR_API_USERNAME")?,
            password: required("HR_API_PASSWORD")?,
            leave_api_key: required("HR_LEAVE_API_KEY")?,
            employee_api_key: required("HR_EMPLOYEE_API_KEY")?,
            employee_dataset_key: required("HR_EMPLOYEE_DATASET_KEY")?,
            attendance_api_key: required("HR_ATTENDANCE_API_KEY")?,
            short_timeout: Duration::from_secs(15),
            medium_timeout: Duration::from_secs(30),
            roster_timeout: Duration::from_secs(60),
            roster_cache_ttl: Duration::from_secs(600),
        })
    }
}

impl ModelConfig {
    /// Load model settings from the environment.
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_BASE_URL` and `OPENAI_MODEL`
    /// are optional.
    pub fn from_env() -> RollcallResult<Self> {
        let api_key = required("OPENAI_API_KEY")?;
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_MODEL_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: 0.1,
        })
    }
}

impl Config {
    /// Load the full configuration from the environment.
    pub fn from_env() -> RollcallResult<Self> {
        Ok(Self {
            backend: BackendConfig::from_env()?,
            model: ModelConfig::from_env()?,
            max_tool_rounds: 5,
        })
    }
}
