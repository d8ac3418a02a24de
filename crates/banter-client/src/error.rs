//! Session error types.
//!
//! These cover synchronous validation of user intents only. Transport and
//! protocol failures never surface here: they arrive as [`crate::SessionEvent`]s
//! and become phase transitions or dropped-frame log actions instead.

use thiserror::Error;

use crate::session::Phase;

/// Errors returned when a user intent is rejected up front.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Display name is too short to join with (minimum 2 after trimming).
    #[error("display name `{name}` is too short (need at least {min} characters)")]
    NameTooShort {
        /// The rejected name.
        name: String,
        /// Minimum effective length after trimming.
        min: usize,
    },

    /// The display name is fixed once a connection attempt has started.
    #[error("cannot change name while {phase:?}; disconnect first")]
    NameLocked {
        /// Current phase when the change was attempted.
        phase: Phase,
    },

    /// Operation requires an established session.
    #[error("not connected (currently {phase:?})")]
    NotConnected {
        /// Current phase when the operation was attempted.
        phase: Phase,
    },

    /// Refusing to send a message with no visible content.
    #[error("message is blank")]
    BlankMessage,
}
