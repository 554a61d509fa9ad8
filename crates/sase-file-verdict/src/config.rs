//! File verdict cache configuration

use crate::error::{FileVerdictError, FileVerdictResult};
use crate::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// How `record` treats an entry already holding `Block`/`Reject`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalRefresh {
    /// Overwrite verdict and restart the TTL on every sighting
    #[default]
    Refresh,
    /// Keep the blocking verdict and its expiry until it lapses
    Preserve,
}

/// File verdict cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVerdictConfig {
    /// Maximum tracked files per worker
    pub capacity: usize,
    /// Refresh behaviour for blocking verdicts
    pub terminal_refresh: TerminalRefresh,
    /// Treat a zero timeout as "never expires" (off: the entry lapses at once)
    pub never_expire_on_zero_timeout: bool,
}

impl Default for FileVerdictConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            terminal_refresh: TerminalRefresh::Refresh,
            never_expire_on_zero_timeout: false,
        }
    }
}

impl FileVerdictConfig {
    /// Parse and validate a JSON config
    pub fn from_json(raw: &str) -> FileVerdictResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values
    pub fn validate(&self) -> FileVerdictResult<()> {
        if self.capacity == 0 {
            return Err(FileVerdictError::InvalidConfig(
                "capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Absolute expiry for a record made at `now`
    pub fn expiry_for(&self, now: u64, timeout_secs: u32) -> Option<u64> {
        if timeout_secs == 0 && self.never_expire_on_zero_timeout {
            None
        } else {
            Some(now.saturating_add(timeout_secs as u64))
        }
    }
}
