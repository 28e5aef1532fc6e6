use std::fs;
use std::path::PathBuf;

use super::types::Snapshot;
use crate::error::StoreError;

/// Where the store keeps its two collections between runs.
pub trait TaskBackend: Send + Sync {
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Keeps nothing; state lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryBackend;

impl TaskBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(None)
    }

    fn save(&self, _snapshot: &Snapshot) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Whole-snapshot JSON file, rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TaskBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path).map_err(|err| StoreError::Load {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        let snapshot = serde_json::from_str::<Snapshot>(&data).map_err(|err| StoreError::Load {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let persist_err = |message: String| StoreError::Persist {
            path: self.path.clone(),
            message,
        };
        let serialized =
            serde_json::to_string_pretty(snapshot).map_err(|err| persist_err(err.to_string()))?;
        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized).map_err(|err| persist_err(err.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|err| persist_err(err.to_string()))
    }
}

/// Accepts saves until `failing` is raised, then refuses every one.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct SwitchableBackend {
    pub failing: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl TaskBackend for SwitchableBackend {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(None)
    }

    fn save(&self, _snapshot: &Snapshot) -> Result<(), StoreError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Persist {
                path: PathBuf::from("unwritable.json"),
                message: "disk full".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::types::{Schedule, Slot};

    fn sample() -> Snapshot {
        Snapshot {
            backlog: Vec::new(),
            schedule: Schedule::Slots {
                slots: vec![Slot {
                    label: "09:00 AM".to_string(),
                    task: None,
                    locked: false,
                }],
            },
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path().join("tasks.json"));
        assert!(backend.load().expect("load").is_none());
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path().join("tasks.json"));
        backend.save(&sample()).expect("save");
        assert_eq!(backend.load().expect("load"), Some(sample()));
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").expect("write");
        let err = JsonFileBackend::new(path).load().expect_err("corrupt file must fail");
        assert!(matches!(err, StoreError::Load { .. }));
    }
}
