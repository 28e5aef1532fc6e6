use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A labelled capacity unit in the day's schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub label: String,
    pub task: Option<Task>,
    #[serde(default)]
    pub locked: bool,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.task.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Fixed, ordered slot sequence; fill stops when every slot is taken.
    #[default]
    Slots,
    /// Plain active list with no capacity bound.
    Active,
}

/// The scheduled side of the store. Which variant is live is fixed per
/// deployment by [`AllocationPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Schedule {
    Slots { slots: Vec<Slot> },
    Active { tasks: Vec<Task> },
}

impl Schedule {
    pub fn policy(&self) -> AllocationPolicy {
        match self {
            Schedule::Slots { .. } => AllocationPolicy::Slots,
            Schedule::Active { .. } => AllocationPolicy::Active,
        }
    }

    pub fn tasks(&self) -> Vec<&Task> {
        match self {
            Schedule::Slots { slots } => slots.iter().filter_map(|s| s.task.as_ref()).collect(),
            Schedule::Active { tasks } => tasks.iter().collect(),
        }
    }
}

/// Consistent copy of both collections, used for display and persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub backlog: Vec<Task>,
    pub schedule: Schedule,
}

impl Snapshot {
    pub fn task_count(&self) -> usize {
        self.backlog.len() + self.schedule.tasks().len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhaustion {
    BacklogEmpty,
    CalendarFull,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::BacklogEmpty => write!(f, "Backlog empty"),
            Exhaustion::CalendarFull => write!(f, "Calendar Full"),
        }
    }
}

/// Result of a single fill call. Running out of tasks or slots is an
/// ordinary outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FillOutcome {
    Placed { task: Task, slot: Option<String> },
    Exhausted { reason: Exhaustion },
}

impl FillOutcome {
    pub fn placed_task(&self) -> Option<&Task> {
        match self {
            FillOutcome::Placed { task, .. } => Some(task),
            FillOutcome::Exhausted { .. } => None,
        }
    }
}
