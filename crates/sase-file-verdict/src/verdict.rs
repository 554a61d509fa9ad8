//! File verdicts and the file events logged when they are enforced

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enforcement disposition for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Verdict {
    /// No opinion yet
    Unknown = 0,
    /// Log and let the file through
    Log = 1,
    /// Drop the packet and the session
    Block = 2,
    /// Block and send a protocol reject
    Reject = 3,
    /// Enforced provisionally, final answer outstanding
    Pending = 4,
}

impl Verdict {
    /// True for `Block` and `Reject`
    #[inline(always)]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Block | Self::Reject)
    }

    /// True when this verdict carries an opinion
    #[inline(always)]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Lowercase name used in logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Log => "log",
            Self::Block => "block",
            Self::Reject => "reject",
            Self::Pending => "pending",
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File event emitted to the log sink on a resumed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileAction {
    /// Resumed file was logged and forgotten
    #[serde(rename = "resume-log")]
    ResumeLog,
    /// Resumed file was blocked
    #[serde(rename = "resume-block")]
    ResumeBlock,
}

impl FileAction {
    /// Event tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ResumeLog => "resume-log",
            Self::ResumeBlock => "resume-block",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
