//! Error types shared across the store, configuration and classifier
//! boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::ProviderError;

/// Task store failures. Every variant leaves the in-memory state untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("task description cannot be empty")]
    EmptyDescription,

    #[error("failed to persist tasks to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    #[error("failed to load tasks from {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Persisted state that breaks a store invariant is rejected rather than repaired.
    #[error("invalid task snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("task store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Failures at the intent classifier boundary. Neither variant mutates the store.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(#[from] ProviderError),

    #[error("classifier returned an unexpected format: {0}")]
    Format(String),
}

#[derive(Error, Debug)]
pub enum EchoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("server error: {0}")]
    Server(String),
}
