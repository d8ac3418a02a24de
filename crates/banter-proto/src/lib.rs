//! Wire protocol codec for the Banter chat protocol.
//!
//! Pure, stateless translation between application intents and the textual
//! wire format. One message per logical event:
//!
//! - Two bare control strings, recognized before structured parsing:
//!   `"username_not_available"` and `"connected"`.
//! - Otherwise a JSON frame `{"event": <name>, "data": <payload>}`.
//!
//! # Components
//!
//! - [`ClientIntent`]: client-to-server events (`join`, `typing`,
//!   `stop_typing`, `new_message`)
//! - [`ServerEvent`]: server-to-client events (`joined`, `new_user`, `left`,
//!   `typing`, `stop_typing`, `new_message`)
//! - [`Incoming`]: the result of decoding one inbound message
//! - [`decode`]: the single inbound parsing entry point
//!
//! Unknown event names decode to [`Incoming::Unknown`] so that new server
//! events never break old clients. A known event name with an invalid payload
//! shape is a [`ProtocolError`]; callers are expected to drop the frame and
//! carry on.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod events;
mod frame;

pub use errors::{ProtocolError, Result};
pub use events::{ClientIntent, ServerEvent};
pub use frame::{CONNECTED, ControlMessage, Incoming, USERNAME_NOT_AVAILABLE, decode};
