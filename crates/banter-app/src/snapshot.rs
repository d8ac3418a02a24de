//! Observable session state.
//!
//! [`Snapshot`] is the "View Model" for a presentation layer: the subset of
//! session state needed to render a chat screen, with no access to the
//! transport or the state machine itself. Consumers either pull one via
//! [`crate::Chat::snapshot`] or watch the runtime's publisher.

use banter_client::{Message, Phase, Session};

/// Read-only view of one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Connection lifecycle phase.
    pub phase: Phase,
    /// Local display name.
    pub local_user: String,
    /// Joined roster. `None` means "not joined any session".
    pub roster: Option<Vec<String>>,
    /// Remote users currently typing, in first-seen order.
    pub typing_users: Vec<String>,
    /// Message log in append order.
    pub messages: Vec<Message>,
    /// Current unsent input buffer.
    pub draft: String,
}

impl Snapshot {
    /// Capture the current state of a session.
    pub(crate) fn capture<E: banter_client::Environment>(session: &Session<E>) -> Self {
        Self {
            phase: session.phase(),
            local_user: session.local_user().to_string(),
            roster: session.roster().map(<[String]>::to_vec),
            typing_users: session.typing_users().to_vec(),
            messages: session.messages().to_vec(),
            draft: session.draft().to_string(),
        }
    }

    /// Snapshot of a session that was never connected.
    pub fn initial() -> Self {
        Self {
            phase: Phase::Disconnected,
            local_user: String::new(),
            roster: None,
            typing_users: Vec::new(),
            messages: Vec::new(),
            draft: String::new(),
        }
    }
}
