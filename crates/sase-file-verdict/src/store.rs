//! Bounded disposition store
//!
//! # Design
//!
//! - Fixed capacity, allocated up front
//! - FIFO ring eviction: entries are never promoted on access, so the
//!   victim on overflow is always the least-recently-inserted file
//! - Lazy expiry: a lapsed entry is dropped by the lookup that sees it
//! - Single-owner, no locks (one store per worker)

use crate::entry::DispositionEntry;
use crate::error::{FileVerdictError, FileVerdictResult};
use crate::key::DispositionKey;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Store counters (per instance)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries dropped on lookup after lapsing
    pub expired: u64,
    /// Entries recycled to make room
    pub evictions: u64,
    /// New entries created
    pub inserts: u64,
    /// Existing entries refreshed in place
    pub refreshes: u64,
}

/// Capacity-bounded key -> entry store
pub struct CacheStore {
    entries: LruCache<DispositionKey, DispositionEntry>,
    stats: CacheStats,
}

impl CacheStore {
    /// Create store holding at most `capacity` entries
    pub fn new(capacity: usize) -> FileVerdictResult<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or_else(|| {
            FileVerdictError::InvalidConfig("capacity must be greater than zero".into())
        })?;

        Ok(Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        })
    }

    /// Get the entry for `key`, inserting `factory()` if absent
    ///
    /// When the store is full the oldest inserted entry is recycled first.
    /// Expiry is not checked here; callers that care use [`find`](Self::find)
    /// first.
    pub fn upsert<F>(&mut self, key: DispositionKey, factory: F) -> FileVerdictResult<&mut DispositionEntry>
    where
        F: FnOnce() -> DispositionEntry,
    {
        if self.entries.contains(&key) {
            self.stats.refreshes += 1;
        } else {
            if let Some((victim, _)) = self.entries.push(key, factory()) {
                self.stats.evictions += 1;
                metrics::counter!("file_verdict_evictions_total").increment(1);
                tracing::debug!(victim = %victim, "Recycled oldest file node");
            }
            self.stats.inserts += 1;
        }

        self.entries
            .peek_mut(&key)
            .ok_or(FileVerdictError::CapacityExhausted)
    }

    /// Drop the entry for `key` if it has lapsed at `now`
    pub fn evict_if_expired(&mut self, key: &DispositionKey, now: u64) -> bool {
        let expired = self
            .entries
            .peek(key)
            .is_some_and(|entry| entry.is_expired(now));

        if expired {
            self.entries.pop(key);
            self.stats.expired += 1;
            metrics::counter!("file_verdict_expired_total").increment(1);
            tracing::debug!(key = %key, now, "File expired");
        }
        expired
    }

    /// Lookup live entry, dropping it if it has lapsed at `now`
    pub fn find(&mut self, key: &DispositionKey, now: u64) -> Option<&mut DispositionEntry> {
        // Fast path: nothing tracked on this worker
        if self.entries.is_empty() {
            self.stats.misses += 1;
            return None;
        }

        if self.evict_if_expired(key, now) {
            self.stats.misses += 1;
            return None;
        }

        match self.entries.peek_mut(key) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(entry)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Read-only lookup with no expiry side effects
    pub fn peek(&self, key: &DispositionKey) -> Option<&DispositionEntry> {
        self.entries.peek(key)
    }

    /// Remove entry; absent keys are a no-op
    pub fn remove(&mut self, key: &DispositionKey) -> Option<DispositionEntry> {
        self.entries.pop(key)
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get current entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get capacity
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Counter snapshot
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;
    use proptest::prelude::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn key(sig: u32) -> DispositionKey {
        DispositionKey::new(
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            sig,
        )
        .unwrap()
    }

    #[test]
    fn test_upsert_insert_and_refresh() {
        let mut store = CacheStore::new(8).unwrap();

        store
            .upsert(key(1), || DispositionEntry::new(Verdict::Pending, Some(130)))
            .unwrap();
        let entry = store
            .upsert(key(1), || DispositionEntry::new(Verdict::Log, None))
            .unwrap();

        // Factory not used for an existing key
        assert_eq!(entry.verdict, Verdict::Pending);
        entry.verdict = Verdict::Block;

        assert_eq!(store.len(), 1);
        assert_eq!(store.peek(&key(1)).unwrap().verdict, Verdict::Block);
        assert_eq!(store.stats().inserts, 1);
        assert_eq!(store.stats().refreshes, 1);
    }

    #[test]
    fn test_find_expires_lazily() {
        let mut store = CacheStore::new(8).unwrap();
        store
            .upsert(key(1), || DispositionEntry::new(Verdict::Block, Some(130)))
            .unwrap();

        assert!(store.find(&key(1), 129).is_some());
        assert!(store.find(&key(1), 130).is_none());
        assert!(store.peek(&key(1)).is_none());
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expired, 1);
        assert_eq!(store.stats().hits, 1);
        assert_eq!(store.stats().misses, 1);

        // Lookups on an empty store still count as misses
        assert!(store.find(&key(1), 131).is_none());
        assert_eq!(store.stats().misses, 2);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut store = CacheStore::new(3).unwrap();
        for sig in 1..=3 {
            store.upsert(key(sig), DispositionEntry::default).unwrap();
        }

        // Touching the oldest must not save it from eviction
        assert!(store.find(&key(1), 0).is_some());
        store.upsert(key(1), DispositionEntry::default).unwrap();

        store.upsert(key(4), DispositionEntry::default).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.peek(&key(1)).is_none());
        assert!(store.peek(&key(2)).is_some());
        assert!(store.peek(&key(4)).is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_remove_idempotent() {
        let mut store = CacheStore::new(4).unwrap();
        store.upsert(key(1), DispositionEntry::default).unwrap();

        assert!(store.remove(&key(1)).is_some());
        assert!(store.remove(&key(1)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            CacheStore::new(0),
            Err(FileVerdictError::InvalidConfig(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_len_bounded_by_capacity(cap in 1usize..64, sigs in prop::collection::vec(any::<u32>(), 0..256)) {
            let mut store = CacheStore::new(cap).unwrap();
            for sig in &sigs {
                prop_assert!(store.upsert(key(*sig), DispositionEntry::default).is_ok());
                prop_assert!(store.len() <= cap);
            }
        }

        #[test]
        fn prop_one_entry_per_key(sig in any::<u32>(), repeats in 1usize..50) {
            let mut store = CacheStore::new(16).unwrap();
            for i in 0..repeats {
                let entry = store.upsert(key(sig), DispositionEntry::default).unwrap();
                entry.file_type_id = i as u32 + 1;
            }
            prop_assert_eq!(store.len(), 1);
            prop_assert_eq!(store.peek(&key(sig)).unwrap().file_type_id, repeats as u32);
        }
    }
}
