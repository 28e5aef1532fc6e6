pub mod backend;
pub mod store;
pub mod types;

pub use backend::{JsonFileBackend, MemoryBackend, TaskBackend};
pub use store::{empty_slots, new_task, validate_snapshot, TaskStore};
pub use types::{AllocationPolicy, Exhaustion, FillOutcome, Schedule, Slot, Snapshot, Task};
