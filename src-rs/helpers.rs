use std::env;
use std::sync::Arc;

use tracing::info;

use crate::config::EchoConfig;
use crate::error::EchoError;
use crate::intent::LlmClassifier;
use crate::llm::{GeminiAdapter, GeminiConfig, GroqAdapter, GroqConfig, LLMRouter, ProviderError};
use crate::task::{JsonFileBackend, MemoryBackend, TaskBackend, TaskStore};

fn load_keys_from_env(primary: &str, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Ok(raw) = env::var(primary) {
        for item in raw.split(',') {
            let trimmed = item.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    for idx in 2..=10 {
        let key = format!("{}_{}", prefix, idx);
        if let Ok(value) = env::var(&key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    keys
}

pub fn load_groq_keys() -> Vec<String> {
    load_keys_from_env("GROQ_API_KEY", "GROQ_API_KEY")
}

pub fn load_gemini_keys() -> Vec<String> {
    load_keys_from_env("GEMINI_API_KEY", "GEMINI_API_KEY")
}

/// Registers every provider that has keys in the environment. The configured
/// provider must be among them.
pub fn build_llm_router(cfg: &EchoConfig) -> Result<LLMRouter, ProviderError> {
    let mut router = LLMRouter::new(&cfg.provider);
    let model_for = |provider: &str| {
        if cfg.provider == provider {
            cfg.model.clone().unwrap_or_default()
        } else {
            String::new()
        }
    };

    let groq_keys = load_groq_keys();
    if !groq_keys.is_empty() {
        let adapter = GroqAdapter::new(GroqConfig {
            api_keys: groq_keys,
            base_url: env::var("GROQ_BASE_URL").unwrap_or_default(),
            model: model_for("groq"),
            temperature: cfg.temperature,
            timeout_secs: cfg.timeout_secs,
        })?;
        router.register_provider("groq", Arc::new(adapter));
    }

    let gemini_keys = load_gemini_keys();
    if !gemini_keys.is_empty() {
        let adapter = GeminiAdapter::new(GeminiConfig {
            api_keys: gemini_keys,
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_default(),
            model: model_for("gemini"),
            temperature: cfg.temperature,
            timeout_secs: cfg.timeout_secs,
        })?;
        router.register_provider("gemini", Arc::new(adapter));
    }

    if !router.has_provider(&cfg.provider) {
        return Err(ProviderError::new(
            "provider_missing",
            &format!(
                "{} provider selected but no {}_API_KEY found",
                cfg.provider,
                cfg.provider.to_uppercase()
            ),
            false,
        ));
    }
    Ok(router)
}

pub fn build_classifier(cfg: &EchoConfig) -> Result<LlmClassifier, ProviderError> {
    let router = build_llm_router(cfg)?;
    let mut classifier = LlmClassifier::new(router)
        .with_provider(&cfg.provider, cfg.model.clone())
        .with_temperature(cfg.temperature);
    if let Some(prompt) = &cfg.system_prompt {
        classifier = classifier.with_system_prompt(prompt);
    }
    Ok(classifier)
}

/// Opens the task store over the configured backend, seeding it from config
/// when the backend is empty.
pub fn open_task_store(cfg: &EchoConfig) -> Result<TaskStore, EchoError> {
    let backend: Box<dyn TaskBackend> = match &cfg.data_file {
        Some(path) => {
            info!(path = %path.display(), "using json task file");
            Box::new(JsonFileBackend::new(path.clone()))
        }
        None => Box::new(MemoryBackend),
    };
    Ok(TaskStore::open(cfg.initial_snapshot(), backend)?)
}
