//! Cached disposition of a tracked file

use crate::key::FileDigest;
use crate::verdict::Verdict;

/// Per-file cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispositionEntry {
    /// Absolute expiry in seconds (`None` = never expires)
    pub expires_at: Option<u64>,
    /// Cached verdict
    pub verdict: Verdict,
    /// File type classification (0 = not yet classified)
    pub file_type_id: u32,
    /// Content digest (zero until a signature is supplied)
    pub digest: FileDigest,
}

impl DispositionEntry {
    /// Create entry with the given verdict and expiry
    pub fn new(verdict: Verdict, expires_at: Option<u64>) -> Self {
        Self {
            expires_at,
            verdict,
            file_type_id: 0,
            digest: FileDigest::EMPTY,
        }
    }

    /// Check if entry has lapsed at `now`
    #[inline(always)]
    pub fn is_expired(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    /// Merge classification and digest
    ///
    /// Zero type ids and empty digests never overwrite recorded values.
    pub fn merge_metadata(&mut self, file_type_id: u32, digest: Option<&FileDigest>) {
        if file_type_id != 0 {
            self.file_type_id = file_type_id;
        }
        if let Some(d) = digest.filter(|d| !d.is_empty()) {
            self.digest = *d;
        }
    }

    /// True if the file has been classified
    #[inline(always)]
    pub fn has_file_type(&self) -> bool {
        self.file_type_id != 0
    }
}

impl Default for DispositionEntry {
    fn default() -> Self {
        Self::new(Verdict::Unknown, None)
    }
}
