use tracing::{debug, warn};

use super::parse::parse_classification;
use super::types::Classification;
use crate::error::ClassifierError;
use crate::llm::{CompletionRequest, LLMRouter, Message, ResponseFormat};

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are Echo, a mood-adaptive scheduler.
1. If the user is MOTIVATED or ENERGETIC: return {"action": "FILL", "reply": "Great! Moving tasks to your schedule."}
2. If the user wants to focus on something specific: return {"action": "ADD", "topic": "<the subject>", "reply": "<short encouragement>"}
3. If the user is STRESSED or TIRED: return {"action": "CLEAR", "reply": "Understood. Clearing schedule for rest."}
4. Otherwise: return {"action": "NONE", "reply": "Tell me more."}
RETURN ONLY RAW JSON."#;

const MAX_OUTPUT_LOG_CHARS: usize = 400;

/// Turns one free-text message into an intent. Implementations make a single
/// attempt and never retry.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}

pub struct LlmClassifier {
    router: LLMRouter,
    system_prompt: String,
    provider: Option<String>,
    model: Option<String>,
    temperature: f64,
}

impl LlmClassifier {
    pub fn new(router: LLMRouter) -> Self {
        Self {
            router,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            provider: None,
            model: None,
            temperature: 0.0,
        }
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        if !prompt.trim().is_empty() {
            self.system_prompt = prompt.to_string();
        }
        self
    }

    pub fn with_provider(mut self, provider: &str, model: Option<String>) -> Self {
        self.provider = Some(provider.to_string());
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

impl IntentClassifier for LlmClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let request = CompletionRequest {
            messages: vec![Message::system(&self.system_prompt), Message::user(text)],
            temperature: Some(self.temperature),
            model: self.model.clone(),
            provider: self.provider.clone(),
            response_format: ResponseFormat::JsonObject,
        };
        let response = self.router.complete(request).map_err(|err| {
            warn!(code = %err.code, retryable = err.retryable, "classifier call failed");
            ClassifierError::from(err)
        })?;
        debug!(
            output = %truncate_for_log(&response.content, MAX_OUTPUT_LOG_CHARS),
            "classifier raw output"
        );
        parse_classification(&response.content)
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
