use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::rotation::Rotator;
use super::types::{
    classify_http_failure, network_error, CompletionRequest, LLMResponse, Message,
    ProviderAdapter, ProviderError, ResponseFormat,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

pub struct GeminiAdapter {
    cfg: GeminiConfig,
    rotator: Rotator,
    client: Client,
}

impl GeminiAdapter {
    pub fn new(mut cfg: GeminiConfig) -> Result<Self, ProviderError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = GEMINI_BASE_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = GEMINI_DEFAULT_MODEL.to_string();
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

impl ProviderAdapter for GeminiAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let model = request.model.clone().unwrap_or_else(|| self.cfg.model.clone());
        let temperature = request.temperature.unwrap_or(self.cfg.temperature);
        let key = self
            .rotator
            .next()
            .ok_or_else(|| ProviderError::new("auth_error", "no Gemini API keys", false))?;
        let payload = build_payload(&request.messages, request.response_format, temperature);
        send_request(&self.client, &self.cfg.base_url, &model, &key, &payload)
    }
}

fn build_payload(messages: &[Message], format: ResponseFormat, temperature: f64) -> Value {
    let mut contents = Vec::new();
    let mut system_instruction = None;

    for msg in messages {
        if msg.role == "system" {
            system_instruction = Some(msg.content.clone());
            continue;
        }
        let role = if msg.role == "user" { "user" } else { "model" };
        contents.push(json!({
            "role": role,
            "parts": [{"text": msg.content}]
        }));
    }

    let mut payload = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": temperature
        }
    });

    if format == ResponseFormat::JsonObject {
        payload["generationConfig"]["responseMimeType"] = json!("application/json");
    }

    if let Some(system) = system_instruction {
        payload["systemInstruction"] = json!({
            "parts": [{"text": system}]
        });
    }

    payload
}

fn send_request(
    client: &Client,
    base_url: &str,
    model: &str,
    api_key: &str,
    payload: &Value,
) -> Result<LLMResponse, ProviderError> {
    let endpoint = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );
    debug!(%model, "sending gemini completion");
    let resp = client
        .post(endpoint)
        .header("x-goog-api-key", api_key)
        .json(payload)
        .send()
        .map_err(network_error)?;

    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(classify_http_failure(status.as_u16(), &body));
    }

    let raw: Value = serde_json::from_str(&body)
        .map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
    let content = parse_response(&raw);
    Ok(LLMResponse {
        content,
        raw: Some(raw),
    })
}

fn parse_response(raw: &Value) -> String {
    raw.pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}
