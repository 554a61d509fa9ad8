//! Enforcement of resolved directives against the live session

use crate::resolver::Directive;
use crate::session::{FileEventSink, Session, TracingEventSink};

/// Applies directives through the session-control collaborator
///
/// Order is fixed: drop packet, drop session, reject, then log. Every
/// action is a flag on the session side, so applying the same directive
/// twice leaves the session in the same state.
pub struct EnforcementExecutor {
    sink: Box<dyn FileEventSink>,
}

impl EnforcementExecutor {
    /// Create executor logging through `sink`
    pub fn new(sink: Box<dyn FileEventSink>) -> Self {
        Self { sink }
    }

    /// Apply directive to session
    pub fn apply(&self, directive: &Directive, session: &mut dyn Session) {
        if directive.is_none() {
            return;
        }

        if directive.force_drop_packet {
            session.force_drop_packet();
        }
        if directive.drop_session {
            session.drop_session();
        }
        if directive.enqueue_reject {
            session.enqueue_reject();
        }
        if let Some(action) = directive.log {
            self.sink.log_file_action(&*session, action);
        }
    }
}

impl Default for EnforcementExecutor {
    fn default() -> Self {
        Self::new(Box::new(TracingEventSink))
    }
}
