use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    /// Ask the provider to return a single JSON object.
    JsonObject,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub raw: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub response_format: ResponseFormat,
}

#[derive(Clone, Debug)]
pub struct ProviderError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(code: &str, message: &str, retryable: bool) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            retryable,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProviderError {}

pub trait ProviderAdapter: Send + Sync {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError>;
}

/// Maps a failed HTTP status and body to a provider error code.
pub(crate) fn classify_http_failure(status: u16, body: &str) -> ProviderError {
    let lowered = body.to_lowercase();
    if status == 401 || status == 403 {
        return ProviderError::new("auth_error", body, false);
    }
    if status == 429 || lowered.contains("quota") || lowered.contains("resource_exhausted") {
        return ProviderError::new("rate_limit", body, true);
    }
    if status >= 500 {
        return ProviderError::new("server_error", body, true);
    }
    ProviderError::new("api_error", body, false)
}

pub(crate) fn network_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::new("timeout", &err.to_string(), true);
    }
    ProviderError::new("network_error", &err.to_string(), true)
}
