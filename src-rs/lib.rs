//! Mood-adaptive task scheduler.
//!
//! A chat message is classified by a hosted model into an [`intent::Intent`];
//! the [`Agent`] then moves tasks between the backlog and the day's schedule
//! through the [`task::TaskStore`].

pub mod agent;
pub mod config;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod result;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "intent/lib.rs"]
pub mod intent;
#[path = "task/lib.rs"]
pub mod task;
#[path = "api/lib.rs"]
pub mod api;

pub use agent::Agent;
pub use config::EchoConfig;
pub use error::{ClassifierError, ConfigError, EchoError, StoreError};
pub use result::{TurnAction, TurnResult};
