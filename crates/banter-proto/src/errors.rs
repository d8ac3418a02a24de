//! Protocol error types.
//!
//! Decoding failures are never fatal to a session: the state machine drops
//! the offending message and keeps going. The error carries enough context to
//! make the dropped frame diagnosable from logs.

use thiserror::Error;

/// Errors produced while decoding an inbound wire message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message is neither a control string nor a well-formed JSON frame.
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// Parser diagnostic.
        reason: String,
    },

    /// Event name was recognized but the payload had the wrong shape.
    #[error("invalid payload for `{event}`: {reason}")]
    InvalidPayload {
        /// Event name from the frame.
        event: String,
        /// Deserializer diagnostic.
        reason: String,
    },
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
