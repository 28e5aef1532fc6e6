use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, info};

use super::backend::{MemoryBackend, TaskBackend};
use super::types::{Exhaustion, FillOutcome, Schedule, Slot, Snapshot, Task};
use crate::error::StoreError;

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Owns the backlog and the schedule for one user.
///
/// Both collections sit behind a single lock. Every mutation computes the
/// next state on a copy, hands it to the backend, and only then swaps it in,
/// so a failed save never leaves a half-moved task behind.
pub struct TaskStore {
    backend: Box<dyn TaskBackend>,
    state: RwLock<Snapshot>,
}

impl TaskStore {
    /// Opens a store over `backend`, falling back to `initial` when the
    /// backend holds nothing yet. Persisted state must keep the slot layout
    /// and policy of `initial`.
    pub fn open(initial: Snapshot, backend: Box<dyn TaskBackend>) -> Result<Self, StoreError> {
        validate_snapshot(&initial)?;
        let state = match backend.load()? {
            Some(persisted) => {
                validate_snapshot(&persisted)?;
                ensure_same_layout(&initial.schedule, &persisted.schedule)?;
                info!(
                    backlog = persisted.backlog.len(),
                    scheduled = persisted.schedule.tasks().len(),
                    "task store restored"
                );
                persisted
            }
            None => {
                backend.save(&initial)?;
                initial
            }
        };
        Ok(Self {
            backend,
            state: RwLock::new(state),
        })
    }

    pub fn in_memory(initial: Snapshot) -> Result<Self, StoreError> {
        Self::open(initial, Box::new(MemoryBackend))
    }

    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.clone())
    }

    pub fn backlog(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.snapshot()?.backlog)
    }

    /// Appends a fresh task to the tail of the backlog.
    pub fn add(&self, description: &str) -> Result<Task, StoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StoreError::EmptyDescription);
        }
        let task = new_task(description);
        let added = task.clone();
        self.commit(move |state| {
            state.backlog.push(added);
            ((), true)
        })?;
        info!(task_id = %task.id, "task added to backlog");
        Ok(task)
    }

    /// Removes a backlog task by id. Returns `None` when the id is not in the
    /// backlog, including when the task currently sits in the schedule.
    pub fn remove(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let removed = self.commit(|state| match state.backlog.iter().position(|t| t.id == id) {
            Some(idx) => (Some(state.backlog.remove(idx)), true),
            None => (None, false),
        })?;
        match &removed {
            Some(task) => info!(task_id = %task.id, "task removed from backlog"),
            None => debug!(task_id = %id, "remove ignored, task not in backlog"),
        }
        Ok(removed)
    }

    /// Moves the head of the backlog into the schedule.
    pub fn fill(&self) -> Result<FillOutcome, StoreError> {
        let outcome = self.commit(fill_state)?;
        log_fill(&outcome);
        Ok(outcome)
    }

    /// Appends a fresh task to the backlog and fills, as one saved change.
    /// Nothing is kept when the save fails.
    pub fn add_and_fill(&self, description: &str) -> Result<(Task, FillOutcome), StoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StoreError::EmptyDescription);
        }
        let task = new_task(description);
        let added = task.clone();
        let outcome = self.commit(move |state| {
            state.backlog.push(added);
            let (outcome, _) = fill_state(state);
            (outcome, true)
        })?;
        info!(task_id = %task.id, "task added to backlog");
        log_fill(&outcome);
        Ok((task, outcome))
    }

    /// Returns every unlocked scheduled task to the head of the backlog, in
    /// schedule order, and reports how many moved.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let moved = self.commit(|state| {
            let reclaimed: Vec<Task> = match &mut state.schedule {
                Schedule::Slots { slots } => slots
                    .iter_mut()
                    .filter(|slot| !slot.locked)
                    .filter_map(|slot| slot.task.take())
                    .collect(),
                Schedule::Active { tasks } => std::mem::take(tasks),
            };
            let count = reclaimed.len();
            let mut backlog = reclaimed;
            backlog.append(&mut state.backlog);
            state.backlog = backlog;
            (count, count > 0)
        })?;
        if moved > 0 {
            info!(moved, "schedule cleared back to backlog");
        }
        Ok(moved)
    }

    fn commit<T>(&self, op: impl FnOnce(&mut Snapshot) -> (T, bool)) -> Result<T, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = state.clone();
        let (value, changed) = op(&mut next);
        if changed {
            self.backend.save(&next)?;
            *state = next;
        }
        Ok(value)
    }
}

/// Moves the backlog head into the schedule. With slots the target is the
/// earliest free slot; an active list takes every task until the backlog
/// runs dry. The flag reports whether anything moved.
fn fill_state(state: &mut Snapshot) -> (FillOutcome, bool) {
    if state.backlog.is_empty() {
        return (exhausted(Exhaustion::BacklogEmpty), false);
    }
    match &mut state.schedule {
        Schedule::Slots { slots } => {
            let Some(slot) = slots.iter_mut().find(|slot| slot.is_free()) else {
                return (exhausted(Exhaustion::CalendarFull), false);
            };
            let task = state.backlog.remove(0);
            slot.task = Some(task.clone());
            let placed = FillOutcome::Placed {
                task,
                slot: Some(slot.label.clone()),
            };
            (placed, true)
        }
        Schedule::Active { tasks } => {
            let task = state.backlog.remove(0);
            tasks.push(task.clone());
            (FillOutcome::Placed { task, slot: None }, true)
        }
    }
}

fn log_fill(outcome: &FillOutcome) {
    match outcome {
        FillOutcome::Placed { task, slot } => info!(
            task_id = %task.id,
            slot = slot.as_deref().unwrap_or("active"),
            "task scheduled"
        ),
        FillOutcome::Exhausted { reason } => debug!(%reason, "fill found nothing to move"),
    }
}

fn exhausted(reason: Exhaustion) -> FillOutcome {
    FillOutcome::Exhausted { reason }
}

pub fn new_task(description: &str) -> Task {
    Task {
        id: next_id(),
        description: description.to_string(),
        created_at: Utc::now(),
    }
}

/// Builds the empty slot sequence for a list of labels.
pub fn empty_slots<S: AsRef<str>>(labels: &[S]) -> Vec<Slot> {
    labels
        .iter()
        .map(|label| Slot {
            label: label.as_ref().to_string(),
            task: None,
            locked: false,
        })
        .collect()
}

/// Checks the invariants every reachable state must hold: unique task ids
/// across both collections, unique non-empty slot labels, locked slots filled.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), StoreError> {
    let mut ids = HashSet::new();
    for task in snapshot.backlog.iter().chain(snapshot.schedule.tasks()) {
        if !ids.insert(task.id.as_str()) {
            return Err(StoreError::InvalidSnapshot(format!(
                "task {} appears more than once",
                task.id
            )));
        }
    }
    if let Schedule::Slots { slots } = &snapshot.schedule {
        let mut labels = HashSet::new();
        for slot in slots {
            if slot.label.trim().is_empty() {
                return Err(StoreError::InvalidSnapshot("empty slot label".to_string()));
            }
            if !labels.insert(slot.label.as_str()) {
                return Err(StoreError::InvalidSnapshot(format!(
                    "duplicate slot label {}",
                    slot.label
                )));
            }
            if slot.locked && slot.task.is_none() {
                return Err(StoreError::InvalidSnapshot(format!(
                    "locked slot {} has no task",
                    slot.label
                )));
            }
        }
    }
    Ok(())
}

fn ensure_same_layout(expected: &Schedule, found: &Schedule) -> Result<(), StoreError> {
    if expected.policy() != found.policy() {
        return Err(StoreError::InvalidSnapshot(format!(
            "persisted policy {:?} does not match configured {:?}",
            found.policy(),
            expected.policy()
        )));
    }
    if let (Schedule::Slots { slots: want }, Schedule::Slots { slots: got }) = (expected, found) {
        let want: Vec<(&str, bool)> = want.iter().map(|s| (s.label.as_str(), s.locked)).collect();
        let got: Vec<(&str, bool)> = got.iter().map(|s| (s.label.as_str(), s.locked)).collect();
        if want != got {
            return Err(StoreError::InvalidSnapshot(format!(
                "persisted slots (label, locked) {:?} do not match configured {:?}",
                got, want
            )));
        }
    }
    Ok(())
}

fn next_id() -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("task_{}_{}", Utc::now().timestamp_millis(), count)
}
