use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::task::{FillOutcome, Task};

/// The single store mutation a chat turn performed, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnAction {
    Fill {
        /// Task synthesized from the classifier's topic before filling.
        synthesized: Option<Task>,
        outcome: FillOutcome,
    },
    Clear {
        moved: usize,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnResult {
    pub success: bool,
    pub reply: String,
    pub intent: Option<Intent>,
    pub action: Option<TurnAction>,
    pub error: Option<String>,
}

impl TurnResult {
    pub fn failed(reply: &str, error: String) -> Self {
        Self {
            success: false,
            reply: reply.to_string(),
            intent: None,
            action: None,
            error: Some(error),
        }
    }
}
