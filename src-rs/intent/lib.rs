pub mod classifier;
pub mod parse;
pub mod types;

pub use classifier::{IntentClassifier, LlmClassifier, DEFAULT_SYSTEM_PROMPT};
pub use parse::parse_classification;
pub use types::{Classification, Intent};
