//! Typed protocol events.
//!
//! The protocol is asymmetric: the client identifies itself once via `join`,
//! so its `typing`/`stop_typing`/`new_message` events carry bare string
//! payloads, while the server-side counterparts name the acting user and
//! (for membership changes) the full roster.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::{ProtocolError, Result};

/// Roster payload for `joined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RosterPayload {
    /// All usernames in the session, including the recipient.
    users: Vec<String>,
}

/// Payload for `new_user` and `left`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PresencePayload {
    /// The user who joined or left.
    user: String,
    /// The resulting roster.
    users: Vec<String>,
}

/// Payload for server-side `typing` and `stop_typing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ActorPayload {
    /// The user the indicator refers to.
    user: String,
}

/// Payload for server-side `new_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatPayload {
    /// Message author.
    user: String,
    /// Message body.
    message: String,
}

/// Client-to-server events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIntent {
    /// Join the session under the given display name.
    Join {
        /// Display name, already trimmed by the caller.
        name: String,
    },

    /// The local user started typing.
    Typing,

    /// The local user stopped typing.
    StopTyping,

    /// Send a chat message.
    NewMessage {
        /// Raw message body (not trimmed).
        body: String,
    },
}

impl ClientIntent {
    /// Wire event name for this intent.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Typing => "typing",
            Self::StopTyping => "stop_typing",
            Self::NewMessage { .. } => "new_message",
        }
    }

    /// Encode as a JSON frame.
    ///
    /// Infallible: every intent payload is a plain string.
    pub fn encode(&self) -> String {
        let data = match self {
            Self::Join { name } => json!(name),
            Self::Typing | Self::StopTyping => json!(""),
            Self::NewMessage { body } => json!(body),
        };
        json!({ "event": self.name(), "data": data }).to_string()
    }

    /// Decode a client frame from its wire text.
    ///
    /// This is the server-facing half of the codec, used by test harnesses
    /// and kept symmetric with [`ClientIntent::encode`] for round-trip
    /// verification.
    pub fn decode(text: &str) -> Result<Self> {
        let frame = crate::frame::parse_frame(text)?;
        match frame.event.as_str() {
            "join" => Ok(Self::Join { name: expect_string("join", frame.data)? }),
            "typing" => Ok(Self::Typing),
            "stop_typing" => Ok(Self::StopTyping),
            "new_message" => {
                Ok(Self::NewMessage { body: expect_string("new_message", frame.data)? })
            },
            other => Err(ProtocolError::MalformedFrame {
                reason: format!("unknown client event `{other}`"),
            }),
        }
    }
}

/// Extract a bare string payload, naming the event in the error.
fn expect_string(event: &str, data: Value) -> Result<String> {
    data.as_str().map(str::to_owned).ok_or_else(|| ProtocolError::InvalidPayload {
        event: event.to_string(),
        reason: "expected a string payload".to_string(),
    })
}

/// Server-to-client events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The local user's join was accepted. Roster includes the local user.
    Joined {
        /// All usernames in the session.
        users: Vec<String>,
    },

    /// Another user joined the session.
    NewUser {
        /// The user who joined.
        user: String,
        /// The resulting roster.
        users: Vec<String>,
    },

    /// A user left the session.
    Left {
        /// The user who left.
        user: String,
        /// The resulting roster.
        users: Vec<String>,
    },

    /// A user started typing.
    Typing {
        /// The typing user.
        user: String,
    },

    /// A user stopped typing.
    StopTyping {
        /// The user who stopped.
        user: String,
    },

    /// A chat message was posted.
    NewMessage {
        /// Message author.
        user: String,
        /// Message body.
        message: String,
    },
}

impl ServerEvent {
    /// Wire event name for this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Joined { .. } => "joined",
            Self::NewUser { .. } => "new_user",
            Self::Left { .. } => "left",
            Self::Typing { .. } => "typing",
            Self::StopTyping { .. } => "stop_typing",
            Self::NewMessage { .. } => "new_message",
        }
    }

    /// Encode as a JSON frame.
    ///
    /// Used by test harnesses standing in for the server; a client only ever
    /// decodes these.
    pub fn encode(&self) -> String {
        let data = match self {
            Self::Joined { users } => json!({ "users": users }),
            Self::NewUser { user, users } | Self::Left { user, users } => {
                json!({ "user": user, "users": users })
            },
            Self::Typing { user } | Self::StopTyping { user } => json!({ "user": user }),
            Self::NewMessage { user, message } => json!({ "user": user, "message": message }),
        };
        json!({ "event": self.name(), "data": data }).to_string()
    }

    /// Build a typed event from a frame's name and payload.
    ///
    /// Returns `Ok(None)` for event names this client does not know about,
    /// so unrecognized events can be skipped instead of rejected.
    pub(crate) fn from_parts(event: &str, data: Value) -> Result<Option<Self>> {
        let invalid = |reason: serde_json::Error| ProtocolError::InvalidPayload {
            event: event.to_string(),
            reason: reason.to_string(),
        };
        let parsed = match event {
            "joined" => {
                let RosterPayload { users } = serde_json::from_value(data).map_err(invalid)?;
                Self::Joined { users }
            },
            "new_user" => {
                let PresencePayload { user, users } =
                    serde_json::from_value(data).map_err(invalid)?;
                Self::NewUser { user, users }
            },
            "left" => {
                let PresencePayload { user, users } =
                    serde_json::from_value(data).map_err(invalid)?;
                Self::Left { user, users }
            },
            "typing" => {
                let ActorPayload { user } = serde_json::from_value(data).map_err(invalid)?;
                Self::Typing { user }
            },
            "stop_typing" => {
                let ActorPayload { user } = serde_json::from_value(data).map_err(invalid)?;
                Self::StopTyping { user }
            },
            "new_message" => {
                let ChatPayload { user, message } =
                    serde_json::from_value(data).map_err(invalid)?;
                Self::NewMessage { user, message }
            },
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }
}
