//! Scheduler configuration.
//!
//! Read from the TOML file named by `ECHO_CONFIG` when set, then overridden
//! field by field from the environment. Every field has a default, so an
//! empty file (or no file) yields a working five-slot day.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::task::{empty_slots, new_task, AllocationPolicy, Schedule, Snapshot};

pub const DEFAULT_SLOT_LABELS: [&str; 5] = ["09:00 AM", "11:00 AM", "01:00 PM", "03:00 PM", "05:00 PM"];

/// One entry of the fixed slot sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub label: String,
    /// Task seeded into the slot at construction.
    #[serde(default)]
    pub task: Option<String>,
    /// Locked slots are never reclaimed; they need a seeded task.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model override; each provider falls back to its own default.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub policy: AllocationPolicy,
    #[serde(default = "default_slots")]
    pub slots: Vec<SlotConfig>,
    /// Descriptions placed in the backlog when no persisted state exists.
    #[serde(default)]
    pub backlog: Vec<String>,
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_slots() -> Vec<SlotConfig> {
    DEFAULT_SLOT_LABELS
        .iter()
        .map(|label| SlotConfig {
            label: label.to_string(),
            task: None,
            locked: false,
        })
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            system_prompt: None,
            policy: AllocationPolicy::default(),
            slots: default_slots(),
            backlog: Vec::new(),
            data_file: None,
            log_level: default_log_level(),
            port: default_port(),
        }
    }
}

impl EchoConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: EchoConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// File named by `ECHO_CONFIG` (or defaults), then environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = match env_opt("ECHO_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(provider) = env_opt("ECHO_PROVIDER") {
            cfg.provider = provider;
        }
        if let Some(model) = env_opt("ECHO_MODEL") {
            cfg.model = Some(model);
        }
        if let Some(path) = env_opt("ECHO_DATA_FILE") {
            cfg.data_file = Some(PathBuf::from(path));
        }
        if let Some(level) = env_opt("ECHO_LOG") {
            cfg.log_level = level;
        }
        if let Some(port) = env_opt("PORT") {
            cfg.port = port
                .parse::<u16>()
                .map_err(|err| ConfigError::invalid("PORT", err.to_string()))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::invalid("provider", "cannot be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid("temperature", "must be between 0.0 and 2.0"));
        }
        if self.policy == AllocationPolicy::Slots && self.slots.is_empty() {
            return Err(ConfigError::invalid("slots", "slot policy needs at least one slot"));
        }
        let mut labels = HashSet::new();
        for slot in &self.slots {
            if slot.label.trim().is_empty() {
                return Err(ConfigError::invalid("slots", "slot label cannot be empty"));
            }
            if !labels.insert(slot.label.as_str()) {
                return Err(ConfigError::invalid(
                    "slots",
                    format!("duplicate slot label `{}`", slot.label),
                ));
            }
            let seeded = slot.task.as_deref().is_some_and(|task| !task.trim().is_empty());
            if slot.locked && !seeded {
                return Err(ConfigError::invalid(
                    "slots",
                    format!("locked slot `{}` needs a task", slot.label),
                ));
            }
        }
        if self.backlog.iter().any(|task| task.trim().is_empty()) {
            return Err(ConfigError::invalid("backlog", "seed tasks cannot be empty"));
        }
        Ok(())
    }

    /// Builds the state a fresh store starts from: the fixed slot sequence
    /// (with seeded and locked entries) and the seed backlog. Under the
    /// active-list policy seeded slot tasks start on the active list.
    pub fn initial_snapshot(&self) -> Snapshot {
        let backlog = self.backlog.iter().map(|desc| new_task(desc.trim())).collect();
        let schedule = match self.policy {
            AllocationPolicy::Slots => {
                let labels: Vec<&str> = self.slots.iter().map(|s| s.label.as_str()).collect();
                let mut slots = empty_slots(&labels);
                for (slot, seed) in slots.iter_mut().zip(&self.slots) {
                    slot.task = seeded_task(seed);
                    slot.locked = seed.locked;
                }
                Schedule::Slots { slots }
            }
            AllocationPolicy::Active => Schedule::Active {
                tasks: self.slots.iter().filter_map(seeded_task).collect(),
            },
        };
        Snapshot { backlog, schedule }
    }
}

fn seeded_task(seed: &SlotConfig) -> Option<crate::task::Task> {
    seed.task
        .as_deref()
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .map(new_task)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
