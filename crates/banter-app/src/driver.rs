//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the chat runtime from specific transport
//! and presentation implementations. A production frontend implements it
//! over a websocket and a widget tree; tests implement it with scripted
//! queues. The generic [`crate::Runtime`] handles all orchestration either
//! way.

use std::future::Future;

use banter_client::{Notice, TransportId};

use crate::Snapshot;

/// One callback from the transport, tagged with the instance it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    /// Transport instance that produced the callback.
    pub transport: TransportId,
    /// What happened.
    pub kind: TransportEventKind,
}

/// Transport callback kinds, mirroring the adapter contract:
/// open / message / error / close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// The connection finished opening.
    Opened,
    /// One textual message arrived.
    Text(String),
    /// The connection failed.
    Failed(String),
    /// The connection closed.
    Closed,
}

/// Inputs the runtime polls from the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// A user intent forwarded by the presentation layer.
    Intent(UserIntent),
    /// A transport callback.
    Transport(TransportEvent),
}

/// The five user intents a presentation layer may forward, plus quit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Set the local display name.
    SetName(String),
    /// Start a connection attempt.
    Connect,
    /// Tear down the session.
    Disconnect,
    /// Update the input buffer.
    SetInput(String),
    /// Send the current draft.
    SendMessage,
    /// Stop the runtime.
    Quit,
}

/// Abstracts I/O operations for the chat runtime.
///
/// Implementations provide platform-specific transport and presentation
/// while the generic [`Runtime`](crate::Runtime) handles orchestration, so
/// the same loop runs in production and in scripted tests.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns `None` if no event is ready; the runtime paces itself with
    /// the environment's sleep between empty polls.
    fn poll_event(&mut self) -> impl Future<Output = Option<DriverEvent>> + Send;

    /// Open a transport to the server.
    ///
    /// Subsequent callbacks for this connection must carry `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be initiated; the runtime
    /// converts it into a transport-failure event.
    fn open(
        &mut self,
        transport: TransportId,
        url: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send one textual message to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the send fails.
    fn send_text(&mut self, text: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the transport. Must be idempotent.
    fn close(&mut self, transport: TransportId) -> impl Future<Output = ()> + Send;

    /// Render the observable state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    /// Surface a transient notification.
    fn notify(&mut self, notice: &Notice);

    /// Hint that the newest message should be scrolled into view.
    fn scroll_to_latest(&mut self);
}
