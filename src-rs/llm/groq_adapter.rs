use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::rotation::Rotator;
use super::types::{
    classify_http_failure, network_error, CompletionRequest, LLMResponse, ProviderAdapter,
    ProviderError, ResponseFormat,
};

pub const GROQ_BASE_URL: &str = "https://api.groq.com";
pub const GROQ_DEFAULT_MODEL: &str = "llama3-8b-8192";

pub struct GroqConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

/// OpenAI-compatible chat completions client for Groq.
pub struct GroqAdapter {
    cfg: GroqConfig,
    rotator: Rotator,
    client: Client,
}

impl GroqAdapter {
    pub fn new(mut cfg: GroqConfig) -> Result<Self, ProviderError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = GROQ_BASE_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = GROQ_DEFAULT_MODEL.to_string();
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string(), false))?;
        Ok(Self {
            rotator: Rotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }
}

impl ProviderAdapter for GroqAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let model = request.model.clone().unwrap_or_else(|| self.cfg.model.clone());
        let temperature = request.temperature.unwrap_or(self.cfg.temperature);
        let key = self
            .rotator
            .next()
            .ok_or_else(|| ProviderError::new("auth_error", "no Groq API keys", false))?;

        let payload = build_payload(&request, &model, temperature);
        let endpoint = format!(
            "{}/openai/v1/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        debug!(%model, "sending groq completion");

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(key)
            .json(&payload)
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if !status.is_success() {
            return Err(classify_http_failure(status.as_u16(), &body));
        }

        let raw: Value = serde_json::from_str(&body)
            .map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
        let content = raw
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::new("parse_error", "missing choices", false))?
            .to_string();
        Ok(LLMResponse {
            content,
            raw: Some(raw),
        })
    }
}

fn build_payload(request: &CompletionRequest, model: &str, temperature: f64) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": request.messages,
        "temperature": temperature,
    });
    if request.response_format == ResponseFormat::JsonObject {
        payload["response_format"] = json!({"type": "json_object"});
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;
    use mockito::Matcher;

    fn adapter(base_url: String) -> GroqAdapter {
        GroqAdapter::new(GroqConfig {
            api_keys: vec!["test-key".to_string()],
            base_url,
            model: String::new(),
            temperature: 0.0,
            timeout_secs: 5,
        })
        .expect("adapter")
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::system("classify"), Message::user("I feel great")],
            temperature: Some(0.0),
            model: None,
            provider: None,
            response_format: ResponseFormat::JsonObject,
        }
    }

    #[test]
    fn sends_json_mode_request_and_reads_first_choice() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": GROQ_DEFAULT_MODEL,
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"action\":\"NONE\",\"reply\":\"hi\"}"}}]
                })
                .to_string(),
            )
            .create();

        let resp = adapter(server.url()).complete(request()).expect("completion");
        assert_eq!(resp.content, "{\"action\":\"NONE\",\"reply\":\"hi\"}");
        mock.assert();
    }

    #[test]
    fn maps_unauthorized_to_auth_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create();

        let err = adapter(server.url()).complete(request()).expect_err("401 must fail");
        assert_eq!(err.code, "auth_error");
        assert!(!err.retryable);
    }

    #[test]
    fn maps_server_failure_and_missing_choices() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create();
        let err = adapter(server.url()).complete(request()).expect_err("503 must fail");
        assert_eq!(err.code, "server_error");

        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(200)
            .with_body("{\"choices\": []}")
            .create();
        let err = adapter(server.url()).complete(request()).expect_err("empty choices");
        assert_eq!(err.code, "parse_error");
    }
}
