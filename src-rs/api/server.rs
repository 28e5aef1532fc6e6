use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tracing::info;

use crate::agent::Agent;
use crate::api::handlers::{
    handle_add_task, handle_chat, handle_clear, handle_fill, handle_health, handle_remove_task,
    handle_state,
};
use crate::error::EchoError;

pub struct EchoServer {
    pub port: u16,
    pub agent: Arc<Agent>,
}

impl EchoServer {
    pub fn new(port: u16, agent: Arc<Agent>) -> Self {
        Self { port, agent }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .route("/state", get(handle_state))
            .route("/chat", post(handle_chat))
            .route("/backlog", post(handle_add_task))
            .route("/backlog/:id", delete(handle_remove_task))
            .route("/fill", post(handle_fill))
            .route("/clear", post(handle_clear))
            .with_state(self.agent.clone())
    }

    pub async fn start(&self) -> Result<(), EchoError> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, agent = %self.agent.name, "echo scheduler listening");
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .map_err(|err| EchoError::Server(err.to_string()))
    }
}
