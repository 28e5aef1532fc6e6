use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub debug: bool,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AddTaskRequest {
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotInfo {
    pub label: String,
    pub task: Option<TaskInfo>,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScheduleInfo {
    Slots { slots: Vec<SlotInfo> },
    Active { tasks: Vec<TaskInfo> },
}

#[derive(Debug, Deserialize)]
pub struct StateInfo {
    pub backlog: Vec<TaskInfo>,
    pub schedule: ScheduleInfo,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FillInfo {
    Placed { task: TaskInfo, slot: Option<String> },
    Exhausted { reason: String },
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    pub intent: Option<String>,
    pub action: Option<serde_json::Value>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClearResponse {
    pub moved: usize,
}
