use std::collections::HashMap;
use std::sync::Arc;

use super::types::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};

pub struct LLMRouter {
    default_provider: String,
    providers: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl LLMRouter {
    pub fn new(default_provider: &str) -> Self {
        Self {
            default_provider: default_provider.to_string(),
            providers: HashMap::new(),
        }
    }

    pub fn register_provider(&mut self, name: &str, adapter: Arc<dyn ProviderAdapter>) {
        self.providers.insert(name.to_string(), adapter);
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let provider = request
            .provider
            .clone()
            .unwrap_or_else(|| self.default_provider.clone());
        let adapter = self.providers.get(&provider).ok_or_else(|| {
            ProviderError::new("provider_missing", &format!("provider not registered: {}", provider), false)
        })?;
        adapter.complete(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ResponseFormat;

    struct Canned(&'static str);

    impl ProviderAdapter for Canned {
        fn complete(&self, _request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            Ok(LLMResponse {
                content: self.0.to_string(),
                raw: None,
            })
        }
    }

    fn request(provider: Option<&str>) -> CompletionRequest {
        CompletionRequest {
            messages: Vec::new(),
            temperature: None,
            model: None,
            provider: provider.map(str::to_string),
            response_format: ResponseFormat::Text,
        }
    }

    #[test]
    fn routes_to_default_or_named_provider() {
        let mut router = LLMRouter::new("groq");
        router.register_provider("groq", Arc::new(Canned("from groq")));
        router.register_provider("gemini", Arc::new(Canned("from gemini")));

        assert_eq!(router.complete(request(None)).expect("default").content, "from groq");
        assert_eq!(
            router.complete(request(Some("gemini"))).expect("named").content,
            "from gemini"
        );
        let err = router.complete(request(Some("other"))).expect_err("unregistered");
        assert_eq!(err.code, "provider_missing");
    }
}
