//! Collaborator interfaces
//!
//! The engine never parses packets or tears down sessions itself; it talks
//! to the flow layer, the policy providers and the log sink through the
//! traits below.

use crate::key::FileDigest;
use crate::verdict::{FileAction, Verdict};
use std::net::IpAddr;

/// Live packet/session handed in by the flow layer
pub trait Session {
    /// Client endpoint of the flow
    fn client_addr(&self) -> IpAddr;

    /// Server endpoint of the flow
    fn server_addr(&self) -> IpAddr;

    /// Timestamp of the current packet (seconds)
    fn packet_time(&self) -> u64;

    /// Drop the packet being processed
    fn force_drop_packet(&mut self);

    /// Drop every further packet of the session
    fn drop_session(&mut self);

    /// Queue a protocol-specific reject response
    fn enqueue_reject(&mut self);
}

/// File type policy
pub trait FileTypePolicy: Send {
    /// Opinion on a classified file type
    fn file_type_verdict(&self, session: &dyn Session, file_type_id: u32) -> Verdict;
}

impl<F> FileTypePolicy for F
where
    F: Fn(&dyn Session, u32) -> Verdict + Send,
{
    fn file_type_verdict(&self, session: &dyn Session, file_type_id: u32) -> Verdict {
        self(session, file_type_id)
    }
}

/// Content signature policy
pub trait SignaturePolicy: Send {
    /// Opinion on a content digest
    fn signature_verdict(&self, session: &dyn Session, digest: &FileDigest) -> Verdict;
}

impl<F> SignaturePolicy for F
where
    F: Fn(&dyn Session, &FileDigest) -> Verdict + Send,
{
    fn signature_verdict(&self, session: &dyn Session, digest: &FileDigest) -> Verdict {
        self(session, digest)
    }
}

/// Fire-and-forget sink for file events
pub trait FileEventSink: Send {
    /// Record that `action` was taken on `session`
    fn log_file_action(&self, session: &dyn Session, action: FileAction);
}

impl<F> FileEventSink for F
where
    F: Fn(&dyn Session, FileAction) + Send,
{
    fn log_file_action(&self, session: &dyn Session, action: FileAction) {
        self(session, action)
    }
}

/// Default sink: structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl FileEventSink for TracingEventSink {
    fn log_file_action(&self, session: &dyn Session, action: FileAction) {
        tracing::info!(
            target: "file_verdict::event",
            event = action.as_str(),
            client = %session.client_addr(),
            server = %session.server_addr(),
            ts = session.packet_time(),
            "File resume action"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_closure_providers() {
        let session = MockSession::new(100);

        let by_type = |_: &dyn Session, id: u32| if id == 3 { Verdict::Block } else { Verdict::Unknown };
        assert_eq!(by_type.file_type_verdict(&session, 3), Verdict::Block);
        assert_eq!(by_type.file_type_verdict(&session, 4), Verdict::Unknown);

        let by_sig = |_: &dyn Session, d: &FileDigest| if d.is_empty() { Verdict::Unknown } else { Verdict::Log };
        assert_eq!(by_sig.signature_verdict(&session, &FileDigest::EMPTY), Verdict::Unknown);
    }

    #[test]
    fn test_tracing_sink_does_not_touch_session() {
        let session = MockSession::new(100);
        TracingEventSink.log_file_action(&session, FileAction::ResumeBlock);
        assert!(!session.enforced());
    }
}
