pub mod gemini_adapter;
pub mod groq_adapter;
pub mod rotation;
pub mod router;
pub mod types;

pub use gemini_adapter::{GeminiAdapter, GeminiConfig};
pub use groq_adapter::{GroqAdapter, GroqConfig};
pub use rotation::Rotator;
pub use router::LLMRouter;
pub use types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, ResponseFormat};
