//! Metering configuration

use std::time::Duration;

use fabrik_common::{FabrikError, Result};
use serde::{Deserialize, Serialize};

/// Metering service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringConfig {
    /// Upper bound for a single create call (milliseconds)
    pub create_timeout_ms: u64,
    /// tracing `EnvFilter` directive
    pub log_filter: String,
}

impl Default for MeteringConfig {
    fn default() -> Self {
        Self {
            create_timeout_ms: crate::DEFAULT_CREATE_TIMEOUT_MS,
            log_filter: "info".to_string(),
        }
    }
}

impl MeteringConfig {
    /// Load configuration from a `.env` file and the environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(val) = lookup("FABRIK_CREATE_TIMEOUT_MS") {
            cfg.create_timeout_ms = val.trim().parse().map_err(|e| {
                FabrikError::Config(format!("FABRIK_CREATE_TIMEOUT_MS={val:?}: {e}"))
            })?;
        }
        if let Some(val) = lookup("FABRIK_LOG") {
            cfg.log_filter = val;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.create_timeout_ms == 0 {
            return Err(FabrikError::Config(
                "create_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn create_timeout(&self) -> Duration {
        Duration::from_millis(self.create_timeout_ms)
    }
}
