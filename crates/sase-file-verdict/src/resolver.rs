//! Resume verdict resolution
//!
//! Pure decision step. Given the cached entry and the current opinions of
//! the policy providers, picks the authoritative verdict and describes the
//! enforcement and cache mutation it implies. Nothing is executed here.
//!
//! Cascade (first known opinion wins):
//!
//! ```text
//! file type policy ──Unknown──► signature policy ──Unknown──► cached verdict
//! ```

use crate::entry::DispositionEntry;
use crate::verdict::{FileAction, Verdict};

/// Enforcement side effects for one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directive {
    /// Drop the packet being processed
    pub force_drop_packet: bool,
    /// Drop the rest of the session
    pub drop_session: bool,
    /// Queue a protocol reject response
    pub enqueue_reject: bool,
    /// File event to log
    pub log: Option<FileAction>,
}

impl Directive {
    /// No side effects
    pub const NONE: Self = Self {
        force_drop_packet: false,
        drop_session: false,
        enqueue_reject: false,
        log: None,
    };

    fn log_only() -> Self {
        Self {
            log: Some(FileAction::ResumeLog),
            ..Self::NONE
        }
    }

    fn block(reject: bool) -> Self {
        Self {
            force_drop_packet: true,
            drop_session: true,
            enqueue_reject: reject,
            log: Some(FileAction::ResumeBlock),
        }
    }

    /// True if nothing is to be done
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Change to apply to the cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryUpdate {
    /// Leave the entry alone
    Keep,
    /// Forget the file
    Remove,
    /// Persist a new verdict
    SetVerdict(Verdict),
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Verdict reported to the caller (what was enforced)
    pub verdict: Verdict,
    /// Side effects to execute
    pub directive: Directive,
    /// Cache mutation
    pub update: EntryUpdate,
}

/// Pick the first known opinion in cascade order
#[inline]
pub fn cascade(type_opinion: Option<Verdict>, sig_opinion: Option<Verdict>, cached: Verdict) -> Verdict {
    [type_opinion, sig_opinion]
        .into_iter()
        .flatten()
        .find(Verdict::is_known)
        .unwrap_or(cached)
}

/// Resolve the verdict for a resumed file
///
/// `type_opinion` is `None` when the type policy was not consulted (no
/// provider, or the file is unclassified); likewise `sig_opinion`.
pub fn resolve(
    entry: &DispositionEntry,
    type_opinion: Option<Verdict>,
    sig_opinion: Option<Verdict>,
) -> Resolution {
    let resolved = cascade(type_opinion, sig_opinion, entry.verdict);

    match resolved {
        Verdict::Unknown => Resolution {
            verdict: Verdict::Unknown,
            directive: Directive::NONE,
            update: EntryUpdate::Keep,
        },
        Verdict::Log => Resolution {
            verdict: Verdict::Log,
            directive: Directive::log_only(),
            update: EntryUpdate::Remove,
        },
        Verdict::Block => Resolution {
            verdict: Verdict::Block,
            directive: Directive::block(false),
            update: EntryUpdate::SetVerdict(Verdict::Block),
        },
        Verdict::Reject => Resolution {
            verdict: Verdict::Reject,
            directive: Directive::block(true),
            update: EntryUpdate::SetVerdict(Verdict::Reject),
        },
        // Enforce now, report what was cached, keep the entry as is
        Verdict::Pending => Resolution {
            verdict: match entry.verdict {
                Verdict::Pending => Verdict::Unknown,
                prior => prior,
            },
            directive: Directive::block(entry.verdict == Verdict::Reject),
            update: EntryUpdate::Keep,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(verdict: Verdict) -> DispositionEntry {
        DispositionEntry::new(verdict, Some(1_000))
    }

    #[test]
    fn test_cascade_order() {
        use Verdict::*;

        assert_eq!(cascade(Some(Log), Some(Block), Reject), Log);
        assert_eq!(cascade(Some(Unknown), Some(Block), Reject), Block);
        assert_eq!(cascade(None, Some(Block), Reject), Block);
        assert_eq!(cascade(None, Some(Unknown), Reject), Reject);
        assert_eq!(cascade(None, None, Unknown), Unknown);
    }

    #[test]
    fn test_unknown_does_nothing() {
        let r = resolve(&cached(Verdict::Unknown), Some(Verdict::Unknown), None);
        assert_eq!(r.verdict, Verdict::Unknown);
        assert!(r.directive.is_none());
        assert_eq!(r.update, EntryUpdate::Keep);
    }

    #[test]
    fn test_type_log_overrides_cached_block() {
        let r = resolve(&cached(Verdict::Block), Some(Verdict::Log), None);
        assert_eq!(r.verdict, Verdict::Log);
        assert_eq!(r.directive.log, Some(FileAction::ResumeLog));
        assert!(!r.directive.force_drop_packet);
        assert_eq!(r.update, EntryUpdate::Remove);
    }

    #[test]
    fn test_block_and_reject() {
        let r = resolve(&cached(Verdict::Unknown), None, Some(Verdict::Block));
        assert_eq!(r.verdict, Verdict::Block);
        assert!(r.directive.force_drop_packet && r.directive.drop_session);
        assert!(!r.directive.enqueue_reject);
        assert_eq!(r.directive.log, Some(FileAction::ResumeBlock));
        assert_eq!(r.update, EntryUpdate::SetVerdict(Verdict::Block));

        let r = resolve(&cached(Verdict::Block), Some(Verdict::Reject), None);
        assert_eq!(r.verdict, Verdict::Reject);
        assert!(r.directive.enqueue_reject);
        assert_eq!(r.update, EntryUpdate::SetVerdict(Verdict::Reject));
    }

    #[test]
    fn test_pending_reports_cached_verdict() {
        let r = resolve(&cached(Verdict::Reject), None, Some(Verdict::Pending));
        assert_eq!(r.verdict, Verdict::Reject);
        assert!(r.directive.force_drop_packet && r.directive.drop_session);
        assert!(r.directive.enqueue_reject);
        assert_eq!(r.directive.log, Some(FileAction::ResumeBlock));
        assert_eq!(r.update, EntryUpdate::Keep);

        let r = resolve(&cached(Verdict::Block), Some(Verdict::Pending), None);
        assert_eq!(r.verdict, Verdict::Block);
        assert!(!r.directive.enqueue_reject);
    }

    #[test]
    fn test_cached_pending_with_no_opinion() {
        let r = resolve(&cached(Verdict::Pending), None, None);
        assert_eq!(r.verdict, Verdict::Unknown);
        assert!(r.directive.drop_session);
        assert!(!r.directive.enqueue_reject);
        assert_eq!(r.update, EntryUpdate::Keep);
    }
}
