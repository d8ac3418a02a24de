//! Session events and actions.
//!
//! The caller is responsible for:
//! - Delivering transport callbacks as [`SessionEvent`]s
//! - Driving time forward via ticks
//! - Executing the [`SessionAction`]s the session produces

use banter_proto::ClientIntent;

/// Identifies one transport instance across its lifetime.
///
/// Each connection attempt mints a fresh id. Transport callbacks carry the id
/// of the instance that produced them, so callbacks from a torn-down
/// transport are recognized as stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransportId(pub u64);

impl std::fmt::Display for TransportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous inputs fed into the session.
///
/// Generic over `I` (Instant type) to support both production
/// (`std::time::Instant`) and manually clocked test environments.
#[derive(Debug, Clone)]
pub enum SessionEvent<I = std::time::Instant> {
    /// The transport finished opening.
    ///
    /// The session keeps waiting: the server signals readiness with the raw
    /// `"connected"` message, not with the socket open callback.
    Opened {
        /// Transport that opened.
        transport: TransportId,
    },

    /// One textual message arrived from the server.
    TextReceived {
        /// Transport that delivered the message.
        transport: TransportId,
        /// Raw message text.
        text: String,
    },

    /// The transport failed.
    Failed {
        /// Transport that failed.
        transport: TransportId,
        /// Failure description for logs and post-mortem display.
        reason: String,
    },

    /// The transport closed without a local `disconnect()`.
    Closed {
        /// Transport that closed.
        transport: TransportId,
    },

    /// Time tick for typing-debounce processing.
    ///
    /// The caller should send ticks periodically; the session fires the
    /// pending stop-typing signal once the quiet period has elapsed.
    Tick {
        /// Current time from the environment.
        now: I,
    },
}

/// Transient notifications surfaced to the presentation layer.
///
/// These are side-effect hints, not state: the presentation layer may toast
/// them and forget them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The server rejected the requested display name.
    NameUnavailable,

    /// A user joined the session.
    UserJoined(String),

    /// A user left the session.
    UserLeft(String),

    /// The transport closed unexpectedly; the session was reset.
    ConnectionLost,

    /// A user intent was rejected before reaching the network.
    Rejected {
        /// Why the intent was rejected.
        reason: String,
    },
}

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a transport to the server.
    Open {
        /// Id minted for this transport instance.
        transport: TransportId,
        /// Endpoint to connect to.
        url: String,
    },

    /// Send an encoded intent to the server.
    Send(ClientIntent),

    /// Close the transport. Must be idempotent on the caller's side.
    Close {
        /// Transport to close.
        transport: TransportId,
    },

    /// Surface a transient notification.
    Notify(Notice),

    /// Hint the presentation layer to scroll to the newest message.
    ScrollToLatest,

    /// Diagnostic message for the caller's logger.
    Log {
        /// Log message.
        message: String,
    },
}
