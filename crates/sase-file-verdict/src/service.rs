//! File disposition service
//!
//! Per-worker façade over the store, resolver and executor. The detection
//! pipeline seeds entries with [`record`](FileDispositionService::record)
//! when it first sees a file, and calls
//! [`evaluate`](FileDispositionService::evaluate) when the same file shows
//! up again on a resumed or retransmitted transfer.
//!
//! # Known limitation
//!
//! Instances are not shared between workers. If a flow is steered to two
//! workers, each tracks the file on its own and they may enforce different
//! verdicts.

use crate::config::{FileVerdictConfig, TerminalRefresh};
use crate::enforcement::EnforcementExecutor;
use crate::entry::DispositionEntry;
use crate::error::FileVerdictResult;
use crate::key::{DispositionKey, FileDigest};
use crate::resolver::{resolve, EntryUpdate};
use crate::session::{FileEventSink, FileTypePolicy, Session, SignaturePolicy};
use crate::store::{CacheStats, CacheStore};
use crate::verdict::Verdict;

/// Resume verdict service (one per worker)
pub struct FileDispositionService {
    config: FileVerdictConfig,
    store: CacheStore,
    type_policy: Option<Box<dyn FileTypePolicy>>,
    signature_policy: Option<Box<dyn SignaturePolicy>>,
    executor: EnforcementExecutor,
}

impl FileDispositionService {
    /// Create service with config, no policy providers and the tracing sink
    pub fn new(config: FileVerdictConfig) -> FileVerdictResult<Self> {
        config.validate()?;
        let store = CacheStore::new(config.capacity)?;

        tracing::info!(capacity = config.capacity, "File verdict cache initialized");

        Ok(Self {
            config,
            store,
            type_policy: None,
            signature_policy: None,
            executor: EnforcementExecutor::default(),
        })
    }

    /// Set file type policy provider
    pub fn with_type_policy<P: FileTypePolicy + 'static>(mut self, policy: P) -> Self {
        self.type_policy = Some(Box::new(policy));
        self
    }

    /// Set content signature policy provider
    pub fn with_signature_policy<P: SignaturePolicy + 'static>(mut self, policy: P) -> Self {
        self.signature_policy = Some(Box::new(policy));
        self
    }

    /// Set file event sink
    pub fn with_event_sink<S: FileEventSink + 'static>(mut self, sink: S) -> Self {
        self.executor = EnforcementExecutor::new(Box::new(sink));
        self
    }

    /// Seed or refresh the disposition of a file
    ///
    /// Restarts the TTL on every call (unless a blocking verdict is being
    /// preserved). A zero type id or an empty digest leaves the recorded
    /// value in place.
    pub fn record(
        &mut self,
        key: DispositionKey,
        verdict: Verdict,
        timeout_secs: u32,
        file_type_id: u32,
        digest: Option<&FileDigest>,
        now: u64,
    ) -> FileVerdictResult<()> {
        let expires_at = self.config.expiry_for(now, timeout_secs);

        // A lapsed entry must not carry its old state into the new record
        self.store.evict_if_expired(&key, now);

        let entry = self
            .store
            .upsert(key, || DispositionEntry::new(verdict, expires_at))?;

        let preserve = self.config.terminal_refresh == TerminalRefresh::Preserve
            && entry.verdict.is_blocking();
        if !preserve {
            entry.verdict = verdict;
            entry.expires_at = expires_at;
        }
        entry.merge_metadata(file_type_id, digest);

        tracing::debug!(
            key = %key,
            verdict = %entry.verdict,
            expires_at = ?entry.expires_at,
            preserved = preserve,
            "Recorded file node"
        );

        Ok(())
    }

    /// Record using the flow endpoints and timestamp of `session`
    pub fn record_packet(
        &mut self,
        session: &dyn Session,
        file_sig: u32,
        timeout_secs: u32,
        verdict: Verdict,
        file_type_id: u32,
        digest: Option<&FileDigest>,
    ) -> FileVerdictResult<()> {
        let key = DispositionKey::new(session.client_addr(), session.server_addr(), file_sig)?;
        self.record(key, verdict, timeout_secs, file_type_id, digest, session.packet_time())
    }

    /// Re-derive and enforce the verdict for a resumed file
    ///
    /// Returns `Unknown` without side effects if the file is not tracked or
    /// its entry has lapsed.
    pub fn evaluate(&mut self, key: &DispositionKey, session: &mut dyn Session, now: u64) -> Verdict {
        let Some(entry) = self.store.find(key, now) else {
            metrics::counter!("file_verdict_misses_total").increment(1);
            return Verdict::Unknown;
        };
        metrics::counter!("file_verdict_hits_total").increment(1);
        tracing::debug!(key = %key, cached = %entry.verdict, "Found resumed file");

        // Query the policies in case the verdict has changed
        let type_opinion = match &self.type_policy {
            Some(policy) if entry.has_file_type() => {
                Some(policy.file_type_verdict(&*session, entry.file_type_id))
            }
            _ => None,
        };
        let sig_opinion = match &self.signature_policy {
            Some(policy) if !type_opinion.is_some_and(|v| v.is_known()) => {
                Some(policy.signature_verdict(&*session, &entry.digest))
            }
            _ => None,
        };

        let resolution = resolve(entry, type_opinion, sig_opinion);

        match resolution.update {
            EntryUpdate::Keep => {}
            EntryUpdate::SetVerdict(verdict) => entry.verdict = verdict,
            EntryUpdate::Remove => {
                self.store.remove(key);
            }
        }

        self.executor.apply(&resolution.directive, session);

        if resolution.verdict.is_known() {
            metrics::counter!("file_verdict_enforced_total", "verdict" => resolution.verdict.as_str())
                .increment(1);
        }
        tracing::debug!(
            key = %key,
            type_opinion = ?type_opinion,
            sig_opinion = ?sig_opinion,
            verdict = %resolution.verdict,
            "Resolved resumed file"
        );

        resolution.verdict
    }

    /// Evaluate using the flow endpoints and timestamp of `session`
    ///
    /// Addresses that cannot form a key are treated as untracked.
    pub fn check_packet(&mut self, session: &mut dyn Session, file_sig: u32) -> Verdict {
        match DispositionKey::new(session.client_addr(), session.server_addr(), file_sig) {
            Ok(key) => {
                let now = session.packet_time();
                self.evaluate(&key, session, now)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Skipping resume check");
                Verdict::Unknown
            }
        }
    }

    /// Read-only view of a tracked file (ignores expiry)
    pub fn peek(&self, key: &DispositionKey) -> Option<&DispositionEntry> {
        self.store.peek(key)
    }

    /// Forget every tracked file
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Get tracked file count
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get capacity
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Store counters
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Active config
    pub fn config(&self) -> &FileVerdictConfig {
        &self.config
    }
}
