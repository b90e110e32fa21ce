//! Typed configuration from environment variables, plus the trigger
//! registry and the store the engine reads at dispatch time.
//!
//! Loads once at startup, fails fast if required vars are missing.

pub mod registry;
pub mod store;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub use registry::TriggerRegistry;
pub use store::{ConfigStore, InMemoryStore};

const DEFAULT_STEP_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug)]
pub struct Config {
    pub triggers_dir: PathBuf,
    pub step_timeout: Duration,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_triggers_dir(None)
    }

    /// Like [`Config::from_env`], but an explicit `triggers_dir` takes
    /// precedence and makes `SPOOL_TRIGGERS_DIR` optional.
    pub fn from_env_with_triggers_dir(triggers_dir: Option<PathBuf>) -> Result<Self> {
        let step_timeout_ms = match std::env::var("SPOOL_STEP_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("SPOOL_STEP_TIMEOUT_MS is not a number: {raw}"))
            })?,
            Err(_) => DEFAULT_STEP_TIMEOUT_MS,
        };

        Ok(Self {
            triggers_dir: match triggers_dir {
                Some(dir) => dir,
                None => PathBuf::from(required_var("SPOOL_TRIGGERS_DIR")?),
            },
            step_timeout: Duration::from_millis(step_timeout_ms),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            step_timeout: self.step_timeout,
        }
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

/// Runtime knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for every external call made by an action step.
    pub step_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_millis(DEFAULT_STEP_TIMEOUT_MS),
        }
    }
}
