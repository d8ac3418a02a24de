//! Application layer for Banter.
//!
//! Wraps the pure [`banter_client`] session machine with everything a
//! frontend needs and nothing it doesn't: a facade taking exactly the five
//! user intents, a snapshot view model, a driver trait for platform I/O,
//! and a generic runtime that runs identically against a real transport and
//! a scripted test double.
//!
//! # Components
//!
//! - [`Chat`]: session facade (user intents in, snapshots out)
//! - [`Snapshot`]: read-only view model for rendering
//! - [`Driver`]: trait for platform-specific transport/presentation I/O
//! - [`Runtime`]: generic orchestration loop using Driver
//! - [`SystemEnv`]: production clock environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chat;
mod driver;
mod env;
mod runtime;
mod snapshot;

pub use banter_client::{
    Environment, Message, Notice, Phase, SessionAction, SessionEvent, TransportId,
};
// Codec types, re-exported for driver implementations and test harnesses
// that speak for the server.
pub use banter_proto::{ClientIntent, Incoming, ProtocolError, ServerEvent, decode};
pub use chat::Chat;
pub use driver::{Driver, DriverEvent, TransportEvent, TransportEventKind, UserIntent};
pub use env::SystemEnv;
pub use runtime::Runtime;
pub use snapshot::Snapshot;
