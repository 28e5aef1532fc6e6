pub use crate::agent::Agent;
pub use crate::config::EchoConfig;
pub use crate::result::{TurnAction, TurnResult};
pub use crate::task::{FillOutcome, Snapshot, Task, TaskStore};

pub mod handlers;
pub mod server;
