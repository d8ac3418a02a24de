//! Inbound message parsing.
//!
//! A transport message is one of three things, checked in order:
//!
//! 1. A bare control string (`"username_not_available"`, `"connected"`).
//! 2. A JSON frame `{"event": ..., "data": ...}` with a recognized event.
//! 3. A JSON frame with an unrecognized event name, surfaced as
//!    [`Incoming::Unknown`] so callers can skip it.
//!
//! Control strings are matched before JSON parsing is attempted; a server
//! could not smuggle them inside a frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{ProtocolError, Result},
    events::ServerEvent,
};

/// Control string sent when the requested display name is taken.
pub const USERNAME_NOT_AVAILABLE: &str = "username_not_available";

/// Control string sent once the transport is ready for a `join`.
pub const CONNECTED: &str = "connected";

/// Raw, non-framed control messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// The requested display name is already in use.
    UsernameNotAvailable,
    /// The server accepted the transport and awaits a `join`.
    Connected,
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A bare control string.
    Control(ControlMessage),
    /// A structured frame with a recognized event.
    Event(ServerEvent),
    /// A structured frame with an event name this client does not know.
    Unknown {
        /// The unrecognized event name.
        event: String,
    },
}

/// The `{event, data}` envelope shared by every structured frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawFrame {
    /// Event name, dispatched on before the payload is interpreted.
    pub event: String,
    /// Event payload; shape depends on the event name.
    #[serde(default)]
    pub data: Value,
}

/// Parse the JSON envelope of a structured frame.
pub(crate) fn parse_frame(text: &str) -> Result<RawFrame> {
    serde_json::from_str(text)
        .map_err(|e| ProtocolError::MalformedFrame { reason: e.to_string() })
}

/// Decode one inbound transport message.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedFrame`] if the text is neither a control
/// string nor a JSON `{event, data}` object, and
/// [`ProtocolError::InvalidPayload`] if a recognized event carries a payload
/// of the wrong shape. Both are recoverable: drop the message and continue.
pub fn decode(text: &str) -> Result<Incoming> {
    match text {
        USERNAME_NOT_AVAILABLE => {
            return Ok(Incoming::Control(ControlMessage::UsernameNotAvailable));
        },
        CONNECTED => return Ok(Incoming::Control(ControlMessage::Connected)),
        _ => {},
    }

    let frame = parse_frame(text)?;
    match ServerEvent::from_parts(&frame.event, frame.data)? {
        Some(event) => Ok(Incoming::Event(event)),
        None => Ok(Incoming::Unknown { event: frame.event }),
    }
}
