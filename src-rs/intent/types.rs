use serde::{Deserialize, Serialize};

/// What a classified message asks the scheduler to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Move work onto the schedule (`FILL` or `ADD`).
    Fill,
    /// Hand unlocked work back to the backlog.
    Clear,
    /// Conversation only.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub topic: Option<String>,
    pub reply: String,
}
