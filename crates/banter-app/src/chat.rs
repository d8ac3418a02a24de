//! Session facade.
//!
//! [`Chat`] is the only entry point a presentation layer sees: the five user
//! intents in, a read-only [`Snapshot`] out. It wraps the underlying
//! [`Session`] state machine and converts synchronous validation errors into
//! [`Notice::Rejected`] actions, so no facade operation ever returns an
//! error to its caller (failures surface as notifications or phase
//! transitions).

use banter_client::{
    Environment, Notice, Session, SessionAction, SessionError, SessionEvent, TransportId,
};

use crate::Snapshot;

/// Facade over one chat session.
pub struct Chat<E: Environment> {
    session: Session<E>,
}

impl<E: Environment> Chat<E> {
    /// Create a disconnected chat pointed at the given server endpoint.
    pub fn new(env: E, server_url: impl Into<String>) -> Self {
        Self { session: Session::new(env, server_url) }
    }

    /// Set the local display name (only while disconnected).
    pub fn set_name(&mut self, name: &str) -> Vec<SessionAction> {
        match self.session.set_name(name) {
            Ok(()) => Vec::new(),
            Err(e) => reject(e),
        }
    }

    /// Start a connection attempt, restarting any live one.
    pub fn connect(&mut self) -> Vec<SessionAction> {
        self.session.connect().unwrap_or_else(reject)
    }

    /// Tear down the session. Always safe to call.
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        self.session.disconnect()
    }

    /// Update the input buffer, driving the typing debouncer.
    pub fn set_input(&mut self, text: &str) -> Vec<SessionAction> {
        self.session.set_input(text)
    }

    /// Send the current draft as a chat message.
    pub fn send_message(&mut self) -> Vec<SessionAction> {
        self.session.send_message().unwrap_or_else(reject)
    }

    /// Deliver a transport callback or timer tick to the session.
    pub fn handle_transport(&mut self, event: SessionEvent<E::Instant>) -> Vec<SessionAction> {
        self.session.handle(event)
    }

    /// Drive the typing-debounce deadline.
    pub fn tick(&mut self, now: E::Instant) -> Vec<SessionAction> {
        self.session.handle(SessionEvent::Tick { now })
    }

    /// Live transport instance, if any. Used by the runtime to convert
    /// send failures back into transport-failure events.
    pub fn transport(&self) -> Option<TransportId> {
        self.session.transport()
    }

    /// Capture the current observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.session)
    }
}

/// Convert a rejected intent into a notification action.
fn reject(error: SessionError) -> Vec<SessionAction> {
    vec![SessionAction::Notify(Notice::Rejected { reason: error.to_string() })]
}
