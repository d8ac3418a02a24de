//! Generic runtime for chat orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Chat`]: the session facade
//! - [`Driver`]: platform-specific transport and presentation I/O
//!
//! State changes are published through a `tokio::sync::watch` channel, so a
//! presentation layer can either pull [`Chat::snapshot`] style snapshots
//! from the channel or await changes.

use std::time::Duration;

use banter_client::{Environment, SessionAction, SessionEvent};
use tokio::sync::watch;

use crate::{
    Chat, Snapshot,
    driver::{Driver, DriverEvent, TransportEvent, TransportEventKind, UserIntent},
};

/// How long to idle when the driver has no event ready.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Generic runtime that orchestrates Chat and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    chat: Chat<E>,
    snapshots: watch::Sender<Snapshot>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime for a fresh session against the given endpoint.
    pub fn new(driver: D, env: E, server_url: impl Into<String>) -> Self {
        let chat = Chat::new(env.clone(), server_url);
        let (snapshots, _) = watch::channel(chat.snapshot());
        Self { driver, env, chat, snapshots }
    }

    /// Subscribe to snapshot updates.
    ///
    /// The receiver always holds the most recent snapshot; awaiting
    /// `changed()` wakes on every observable state transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Run the event loop until a [`UserIntent::Quit`] arrives.
    ///
    /// Transport open/send failures do not end the loop: they are fed back
    /// into the session as transport-failure events.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to render.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let snapshot = self.chat.snapshot();
        self.driver.render(&snapshot)?;

        loop {
            match self.driver.poll_event().await {
                Some(event) => {
                    let Some(actions) = self.dispatch(event) else { break };
                    self.execute(actions).await;
                },
                None => self.env.sleep(IDLE_POLL_INTERVAL).await,
            }

            let actions = self.chat.tick(self.env.now());
            self.execute(actions).await;
            self.publish()?;
        }

        // Quit tears the session down like an explicit disconnect.
        let actions = self.chat.disconnect();
        self.execute(actions).await;
        self.publish()?;
        Ok(())
    }

    /// Translate one driver event into facade calls.
    ///
    /// Returns `None` for [`UserIntent::Quit`], ending the loop; this is the
    /// only place quit is recognized.
    fn dispatch(&mut self, event: DriverEvent) -> Option<Vec<SessionAction>> {
        let actions = match event {
            DriverEvent::Intent(intent) => match intent {
                UserIntent::SetName(name) => self.chat.set_name(&name),
                UserIntent::Connect => self.chat.connect(),
                UserIntent::Disconnect => self.chat.disconnect(),
                UserIntent::SetInput(text) => self.chat.set_input(&text),
                UserIntent::SendMessage => self.chat.send_message(),
                UserIntent::Quit => return None,
            },
            DriverEvent::Transport(TransportEvent { transport, kind }) => {
                let event = match kind {
                    TransportEventKind::Opened => SessionEvent::Opened { transport },
                    TransportEventKind::Text(text) => {
                        SessionEvent::TextReceived { transport, text }
                    },
                    TransportEventKind::Failed(reason) => {
                        SessionEvent::Failed { transport, reason }
                    },
                    TransportEventKind::Closed => SessionEvent::Closed { transport },
                };
                self.chat.handle_transport(event)
            },
        };
        Some(actions)
    }

    /// Execute session actions, feeding I/O failures back into the session.
    async fn execute(&mut self, initial: Vec<SessionAction>) {
        let mut pending = initial;

        while !pending.is_empty() {
            let batch = std::mem::take(&mut pending);
            for action in batch {
                match action {
                    SessionAction::Open { transport, url } => {
                        if let Err(e) = self.driver.open(transport, &url).await {
                            tracing::warn!(%transport, error = %e, "transport open failed");
                            pending.extend(self.chat.handle_transport(SessionEvent::Failed {
                                transport,
                                reason: e.to_string(),
                            }));
                        }
                    },
                    SessionAction::Send(intent) => {
                        if let Err(e) = self.driver.send_text(&intent.encode()).await {
                            tracing::warn!(error = %e, "send failed");
                            if let Some(transport) = self.chat.transport() {
                                pending.extend(self.chat.handle_transport(
                                    SessionEvent::Failed { transport, reason: e.to_string() },
                                ));
                            }
                        }
                    },
                    SessionAction::Close { transport } => self.driver.close(transport).await,
                    SessionAction::Notify(notice) => self.driver.notify(&notice),
                    SessionAction::ScrollToLatest => self.driver.scroll_to_latest(),
                    SessionAction::Log { message } => tracing::debug!("{message}"),
                }
            }
        }
    }

    /// Publish and render the snapshot if anything observable changed.
    fn publish(&mut self) -> Result<(), D::Error> {
        let snapshot = self.chat.snapshot();
        let changed = self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
        if changed {
            self.driver.render(&snapshot)?;
        }
        Ok(())
    }

    /// The session facade, for callers embedding the runtime.
    pub fn chat(&self) -> &Chat<E> {
        &self.chat
    }

    /// Mutable access to the session facade.
    pub fn chat_mut(&mut self) -> &mut Chat<E> {
        &mut self.chat
    }
}
