//! OpenSASE File Verdict Cache
//!
//! Remembers the verdict reached for a file on a flow so that a resumed,
//! retransmitted or restarted transfer of the same file is enforced without
//! re-inspecting it.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 FileDispositionService (per worker)               │
//! │                                                                   │
//! │  record(key, verdict, ttl)          evaluate(key, session, now)   │
//! │         │                                     │                   │
//! │         ▼                                     ▼                   │
//! │  ┌──────────────┐   find (lazy expiry) ┌──────────────┐           │
//! │  │  CacheStore  │◄─────────────────────│   Resolver   │◄── type / │
//! │  │ (FIFO ring,  │                      │  (cascade)   │    sig    │
//! │  │  16K files)  │──────────────────────►              │  policies │
//! │  └──────────────┘   update / remove    └──────┬───────┘           │
//! │                                               │ Directive         │
//! │                                               ▼                   │
//! │                                        ┌──────────────┐           │
//! │                                        │   Executor   │──► drop / │
//! │                                        │              │  reject / │
//! │                                        └──────────────┘    log    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Verdict lifecycle
//!
//! | Verdict | Enforcement | Cache |
//! |---------|-------------|-------|
//! | Unknown | none | kept |
//! | Log | `resume-log` event | removed |
//! | Block | drop packet + session, `resume-block` | sticky |
//! | Reject | Block + protocol reject | sticky |
//! | Pending | drop, reports the cached verdict | unchanged |
//!
//! # Threading
//!
//! One service per packet worker. Nothing is shared, nothing blocks, and
//! no locks sit on the forwarding path.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod enforcement;
pub mod entry;
pub mod error;
pub mod key;
pub mod resolver;
pub mod service;
pub mod session;
pub mod store;
pub mod verdict;

pub use config::{FileVerdictConfig, TerminalRefresh};
pub use enforcement::EnforcementExecutor;
pub use entry::DispositionEntry;
pub use error::{FileVerdictError, FileVerdictResult};
pub use key::{DispositionKey, FileDigest, DIGEST_LEN};
pub use resolver::{resolve, Directive, EntryUpdate, Resolution};
pub use service::FileDispositionService;
pub use session::{FileEventSink, FileTypePolicy, Session, SignaturePolicy, TracingEventSink};
pub use store::{CacheStats, CacheStore};
pub use verdict::{FileAction, Verdict};

/// Default number of files tracked per worker
pub const DEFAULT_CAPACITY: usize = 16384;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_CAPACITY, 16384);
        assert_eq!(DIGEST_LEN, 32);
    }
}
