//! Client-side chat session core.
//!
//! Action-based state machine for one chat session. Follows the sans-IO
//! pattern: the session receives user intents and transport callbacks,
//! mutates its local view of the session synchronously, and returns
//! [`SessionAction`]s for the caller to execute. The session itself never
//! touches a socket, a timer, or a logger.
//!
//! # Components
//!
//! - [`Session`]: the session state machine (phase, roster, typing set,
//!   message log)
//! - [`TypingDebouncer`]: start/stop-typing signals from local input activity
//! - [`SessionEvent`] / [`SessionAction`]: inputs and outputs of the machine
//! - [`Environment`]: injectable clock for deterministic tests
//!
//! # Stale callbacks
//!
//! Every connection attempt mints a [`TransportId`]. Transport callbacks
//! carry the id of the instance that produced them; callbacks from a
//! superseded transport are ignored, so a torn-down connection can never
//! mutate the session that replaced it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod env;
mod error;
mod event;
mod session;
mod typing;

pub use env::Environment;
pub use error::SessionError;
pub use event::{Notice, SessionAction, SessionEvent, TransportId};
pub use session::{MIN_NAME_LEN, Message, Phase, Session};
pub use typing::{TYPING_QUIET_PERIOD, TypingDebouncer};
