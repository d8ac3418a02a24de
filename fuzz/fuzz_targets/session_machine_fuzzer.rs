//! Fuzz target for the session state machine.
//!
//! Drives a session with arbitrary interleavings of user intents and
//! transport callbacks, including stale transport ids and garbage frames.
//!
//! # Invariants
//!
//! - The machine never panics
//! - The local user never appears in the typing set
//! - The typing set is duplicate-free
//! - Roster is absent outside Connected/Error phases
//! - Messages and typing users are cleared outside Connected/Error phases

#![no_main]

use std::time::{Duration, Instant};

use arbitrary::Arbitrary;
use banter_client::{Environment, Phase, Session, SessionEvent, TransportId};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone)]
struct FuzzEnv {
    base: Instant,
}

impl Environment for FuzzEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        self.base
    }

    fn unix_millis(&self) -> u64 {
        0
    }

    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        std::future::ready(())
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    SetName(String),
    Connect,
    Disconnect,
    SetInput(String),
    SendMessage,
    Opened { transport: u8 },
    Text { transport: u8, payload: String },
    Failed { transport: u8 },
    Closed { transport: u8 },
    TickMillis(u16),
}

fuzz_target!(|steps: Vec<Step>| {
    let env = FuzzEnv { base: Instant::now() };
    let mut session = Session::new(env.clone(), "wss://fuzz.example");
    let mut clock = env.base;

    for step in steps {
        match step {
            Step::SetName(name) => {
                let _ = session.set_name(name);
            },
            Step::Connect => {
                let _ = session.connect();
            },
            Step::Disconnect => {
                let _ = session.disconnect();
            },
            Step::SetInput(text) => {
                let _ = session.set_input(text);
            },
            Step::SendMessage => {
                let _ = session.send_message();
            },
            Step::Opened { transport } => {
                let _ = session.handle(SessionEvent::Opened {
                    transport: TransportId(u64::from(transport)),
                });
            },
            Step::Text { transport, payload } => {
                let _ = session.handle(SessionEvent::TextReceived {
                    transport: TransportId(u64::from(transport)),
                    text: payload,
                });
            },
            Step::Failed { transport } => {
                let _ = session.handle(SessionEvent::Failed {
                    transport: TransportId(u64::from(transport)),
                    reason: "fuzzed failure".to_string(),
                });
            },
            Step::Closed { transport } => {
                let _ = session.handle(SessionEvent::Closed {
                    transport: TransportId(u64::from(transport)),
                });
            },
            Step::TickMillis(millis) => {
                clock += Duration::from_millis(u64::from(millis));
                let _ = session.handle(SessionEvent::Tick { now: clock });
            },
        }

        let local = session.local_user().to_string();
        assert!(!session.typing_users().contains(&local) || local.is_empty());

        let unique: std::collections::HashSet<&String> = session.typing_users().iter().collect();
        assert_eq!(unique.len(), session.typing_users().len());

        match session.phase() {
            Phase::Disconnected | Phase::Connecting => {
                assert!(session.roster().is_none());
                assert!(session.messages().is_empty());
                assert!(session.typing_users().is_empty());
            },
            Phase::Connected | Phase::Error => {},
        }
    }
});
