use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::agent::Agent;
use crate::error::StoreError;
use crate::result::TurnResult;
use crate::task::{FillOutcome, Snapshot, Task};

pub type SharedAgent = Arc<Agent>;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
    pub task: Option<Task>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub moved: usize,
}

type ApiError = (StatusCode, Json<Value>);

fn store_error(err: StoreError) -> ApiError {
    let status = match err {
        StoreError::EmptyDescription => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"error": err.to_string()})))
}

pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_state(State(agent): State<SharedAgent>) -> Result<Json<Snapshot>, ApiError> {
    agent.tasks.snapshot().map(Json).map_err(store_error)
}

pub async fn handle_chat(
    State(agent): State<SharedAgent>,
    Json(req): Json<ChatRequest>,
) -> Json<TurnResult> {
    if req.message.trim().is_empty() {
        return Json(TurnResult::failed("", "message required".to_string()));
    }

    // The classifier blocks on HTTP, keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || agent.handle_message(&req.message)).await;
    match result {
        Ok(result) => Json(result),
        Err(err) => Json(TurnResult::failed("", err.to_string())),
    }
}

pub async fn handle_add_task(
    State(agent): State<SharedAgent>,
    Json(req): Json<AddTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = agent.tasks.add(&req.description).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn handle_remove_task(
    State(agent): State<SharedAgent>,
    Path(id): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let task = agent.tasks.remove(&id).map_err(store_error)?;
    Ok(Json(RemoveResponse {
        removed: task.is_some(),
        task,
    }))
}

pub async fn handle_fill(State(agent): State<SharedAgent>) -> Result<Json<FillOutcome>, ApiError> {
    agent.tasks.fill().map(Json).map_err(store_error)
}

pub async fn handle_clear(State(agent): State<SharedAgent>) -> Result<Json<ClearResponse>, ApiError> {
    let moved = agent.tasks.clear().map_err(store_error)?;
    Ok(Json(ClearResponse { moved }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EchoConfig;
    use crate::error::ClassifierError;
    use crate::intent::{Classification, Intent, IntentClassifier};
    use crate::result::TurnAction;
    use crate::task::TaskStore;

    struct AlwaysFill;

    impl IntentClassifier for AlwaysFill {
        fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
            Ok(Classification {
                intent: Intent::Fill,
                topic: None,
                reply: "Moving tasks.".to_string(),
            })
        }
    }

    fn shared_agent() -> SharedAgent {
        let config = EchoConfig::default();
        let tasks = TaskStore::in_memory(config.initial_snapshot()).expect("store");
        Arc::new(Agent::new("api-test", config, Box::new(AlwaysFill), tasks))
    }

    #[tokio::test]
    async fn add_then_chat_schedules_the_task() {
        let agent = shared_agent();
        let (status, Json(task)) = handle_add_task(
            State(agent.clone()),
            Json(AddTaskRequest {
                description: "Chemistry Test".to_string(),
            }),
        )
        .await
        .expect("add");
        assert_eq!(status, StatusCode::CREATED);

        let Json(turn) = handle_chat(
            State(agent.clone()),
            Json(ChatRequest {
                message: "I feel unstoppable".to_string(),
            }),
        )
        .await;
        assert!(turn.success);
        assert!(matches!(
            turn.action,
            Some(TurnAction::Fill { outcome: FillOutcome::Placed { .. }, .. })
        ));

        let Json(state) = handle_state(State(agent)).await.expect("state");
        assert!(state.backlog.is_empty());
        assert_eq!(state.schedule.tasks()[0].id, task.id);
    }

    #[tokio::test]
    async fn blank_description_is_bad_request() {
        let err = handle_add_task(
            State(shared_agent()),
            Json(AddTaskRequest {
                description: " ".to_string(),
            }),
        )
        .await
        .expect_err("blank must fail");
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remove_unknown_id_reports_not_removed() {
        let Json(resp) = handle_remove_task(State(shared_agent()), Path("missing".to_string()))
            .await
            .expect("remove");
        assert!(!resp.removed);
        assert!(resp.task.is_none());
    }

    #[tokio::test]
    async fn fill_and_clear_endpoints_round_trip() {
        let agent = shared_agent();
        agent.tasks.add("A").expect("add");
        let Json(outcome) = handle_fill(State(agent.clone())).await.expect("fill");
        assert!(outcome.placed_task().is_some());
        let Json(cleared) = handle_clear(State(agent.clone())).await.expect("clear");
        assert_eq!(cleared.moved, 1);
        let Json(cleared) = handle_clear(State(agent)).await.expect("clear");
        assert_eq!(cleared.moved, 0);
    }
}
