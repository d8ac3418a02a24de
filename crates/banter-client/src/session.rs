//! Session state machine.
//!
//! The [`Session`] owns the local view of one chat session: connection
//! phase, roster, typing indicators, and the message log. It is a pure state
//! machine in the sans-IO style: user intents and transport callbacks go in,
//! state mutates synchronously, and [`SessionAction`]s come out for the
//! caller to execute. No networking, no timers, no logging.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected --connect()--> Connecting --"joined"--> Connected
//!      ^                          |                        |
//!      |<--"username_not_available"                        |
//!      |<------------------- disconnect() ----------------/
//!      |<------------------- transport close -------------/
//! any state --transport failure--> Error (terminal until connect/disconnect)
//! ```
//!
//! On transport failure the roster, typing set, and message log are left in
//! place so the user can see what the session looked like when it died; they
//! are cleared on the next `connect()` or `disconnect()`.

use banter_proto::{ClientIntent, ControlMessage, Incoming, ServerEvent};

use crate::{
    env::Environment,
    error::SessionError,
    event::{Notice, SessionAction, SessionEvent, TransportId},
    typing::TypingDebouncer,
};

/// Minimum effective display-name length after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Connection lifecycle phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No transport; the user can still edit their name.
    Disconnected,
    /// Transport opening or join handshake in flight.
    Connecting,
    /// Joined; roster and message log are live.
    Connected,
    /// Transport failed; state frozen for inspection until retry.
    Error,
}

/// One chat message. Immutable once appended; log order is append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Wall-clock timestamp in unix milliseconds, assigned on append.
    pub sent_at: u64,
    /// Author's display name.
    pub author: String,
    /// Raw message body.
    pub body: String,
}

/// Client-side chat session state machine.
///
/// Explicitly constructed and explicitly owned; no ambient state, so tests
/// can run any number of independent sessions.
pub struct Session<E: Environment> {
    /// Environment for timestamps and debounce deadlines.
    env: E,
    /// Fixed server endpoint.
    server_url: String,
    /// Connection lifecycle phase.
    phase: Phase,
    /// Local display name. Mutable only while `Disconnected`.
    local_user: String,
    /// Unsent input buffer.
    draft: String,
    /// Joined roster. `None` means "not joined any session".
    roster: Option<Vec<String>>,
    /// Remote users currently typing. Never contains `local_user`.
    typing_users: Vec<String>,
    /// Message log for the current session.
    messages: Vec<Message>,
    /// Local typing-indicator debounce.
    debouncer: TypingDebouncer<E::Instant>,
    /// Live transport instance, if any.
    transport: Option<TransportId>,
    /// Generation counter backing [`TransportId`] minting.
    next_transport: u64,
}

impl<E: Environment> Session<E> {
    /// Create a disconnected session pointed at the given server.
    pub fn new(env: E, server_url: impl Into<String>) -> Self {
        Self {
            env,
            server_url: server_url.into(),
            phase: Phase::Disconnected,
            local_user: String::new(),
            draft: String::new(),
            roster: None,
            typing_users: Vec::new(),
            messages: Vec::new(),
            debouncer: TypingDebouncer::new(),
            transport: None,
            next_transport: 0,
        }
    }

    // ---- user intents ------------------------------------------------------

    /// Set the local display name.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NameLocked`] unless the session is
    /// `Disconnected`: once a connection attempt starts, the name is fixed
    /// for the session's duration.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != Phase::Disconnected {
            return Err(SessionError::NameLocked { phase: self.phase });
        }
        self.local_user = name.into();
        Ok(())
    }

    /// Start a connection attempt.
    ///
    /// Any live transport is torn down first (connect-while-connected
    /// restarts rather than rejects), and all session-scoped state is reset
    /// before entering `Connecting`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NameTooShort`] if the trimmed name has fewer
    /// than [`MIN_NAME_LEN`] characters.
    pub fn connect(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        if self.local_user.trim().chars().count() < MIN_NAME_LEN {
            return Err(SessionError::NameTooShort {
                name: self.local_user.clone(),
                min: MIN_NAME_LEN,
            });
        }

        let mut actions = self.disconnect();
        let transport = self.mint_transport();
        self.transport = Some(transport);
        self.phase = Phase::Connecting;
        actions.push(SessionAction::Open { transport, url: self.server_url.clone() });
        Ok(actions)
    }

    /// Tear down the session.
    ///
    /// Idempotent: closes the transport if one is live and resets every
    /// session-scoped field. A second call in a row produces no actions.
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        if let Some(transport) = self.transport.take() {
            actions.push(SessionAction::Close { transport });
        }
        self.clear_session_state();
        self.phase = Phase::Disconnected;
        actions
    }

    /// Update the input buffer, driving the typing debouncer.
    ///
    /// While connected and the text is non-blank, the idle-to-typing edge
    /// emits a `typing` intent; every keystroke re-arms the stop deadline.
    pub fn set_input(&mut self, text: impl Into<String>) -> Vec<SessionAction> {
        self.draft = text.into();
        if self.phase == Phase::Connected
            && !self.draft.trim().is_empty()
            && self.debouncer.touch(self.env.now())
        {
            return vec![SessionAction::Send(ClientIntent::Typing)];
        }
        Vec::new()
    }

    /// Send the current draft as a chat message.
    ///
    /// The message is appended locally right away (optimistic append, no
    /// echo matching), the draft is cleared, and any pending typing
    /// indicator is stopped even if its deadline had not fired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] outside the `Connected` phase
    /// and [`SessionError::BlankMessage`] for an all-whitespace draft.
    pub fn send_message(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        if self.phase != Phase::Connected {
            return Err(SessionError::NotConnected { phase: self.phase });
        }
        if self.draft.trim().is_empty() {
            return Err(SessionError::BlankMessage);
        }

        let body = std::mem::take(&mut self.draft);
        let mut actions = vec![SessionAction::Send(ClientIntent::NewMessage {
            body: body.clone(),
        })];
        self.messages.push(Message {
            sent_at: self.env.unix_millis(),
            author: self.local_user.clone(),
            body,
        });
        if self.debouncer.flush() {
            actions.push(SessionAction::Send(ClientIntent::StopTyping));
        }
        actions.push(SessionAction::ScrollToLatest);
        Ok(actions)
    }

    // ---- asynchronous inputs -----------------------------------------------

    /// Process one transport callback or timer tick.
    ///
    /// Never fails: malformed frames, unknown events, and stale callbacks
    /// from superseded transports are dropped with a [`SessionAction::Log`].
    pub fn handle(&mut self, event: SessionEvent<E::Instant>) -> Vec<SessionAction> {
        match event {
            SessionEvent::Opened { transport } => {
                if !self.is_current(transport) {
                    return self.stale(transport, "open");
                }
                // The server signals readiness with the raw "connected"
                // message; nothing to do on the socket open itself.
                Vec::new()
            },
            SessionEvent::TextReceived { transport, text } => {
                if !self.is_current(transport) {
                    return self.stale(transport, "message");
                }
                self.handle_text(&text)
            },
            SessionEvent::Failed { transport, reason } => {
                if !self.is_current(transport) {
                    return self.stale(transport, "error");
                }
                self.handle_failure(transport, &reason)
            },
            SessionEvent::Closed { transport } => {
                if !self.is_current(transport) {
                    return self.stale(transport, "close");
                }
                self.handle_unexpected_close()
            },
            SessionEvent::Tick { now } => {
                if self.phase == Phase::Connected && self.debouncer.poll(now) {
                    return vec![SessionAction::Send(ClientIntent::StopTyping)];
                }
                Vec::new()
            },
        }
    }

    // ---- read-only accessors -----------------------------------------------

    /// Current connection phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Local display name.
    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    /// Current unsent input buffer.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Joined roster. `None` until a `joined` event lands.
    pub fn roster(&self) -> Option<&[String]> {
        self.roster.as_deref()
    }

    /// Remote users currently typing, in first-seen order.
    pub fn typing_users(&self) -> &[String] {
        &self.typing_users
    }

    /// Message log for the current session, in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Live transport instance, if any.
    pub fn transport(&self) -> Option<TransportId> {
        self.transport
    }

    /// Fixed server endpoint this session connects to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    // ---- internals ---------------------------------------------------------

    fn mint_transport(&mut self) -> TransportId {
        self.next_transport += 1;
        TransportId(self.next_transport)
    }

    fn is_current(&self, transport: TransportId) -> bool {
        self.transport == Some(transport)
    }

    fn stale(&self, transport: TransportId, kind: &str) -> Vec<SessionAction> {
        vec![SessionAction::Log {
            message: format!("ignoring {kind} callback from stale transport {transport}"),
        }]
    }

    /// Reset everything scoped to a joined session. Phase is left to the
    /// caller so failure handling can preserve state under `Error`.
    fn clear_session_state(&mut self) {
        self.roster = None;
        self.typing_users.clear();
        self.messages.clear();
        self.draft.clear();
        self.debouncer.reset();
    }

    fn handle_failure(&mut self, transport: TransportId, reason: &str) -> Vec<SessionAction> {
        // Drop the handle so the close callback that usually follows an
        // error is treated as stale and cannot wipe the post-mortem state.
        self.transport = None;
        self.phase = Phase::Error;
        self.debouncer.reset();
        vec![
            SessionAction::Close { transport },
            SessionAction::Log { message: format!("transport {transport} failed: {reason}") },
        ]
    }

    fn handle_unexpected_close(&mut self) -> Vec<SessionAction> {
        self.transport = None;
        self.clear_session_state();
        self.phase = Phase::Disconnected;
        vec![SessionAction::Notify(Notice::ConnectionLost)]
    }

    fn handle_text(&mut self, text: &str) -> Vec<SessionAction> {
        match banter_proto::decode(text) {
            Ok(Incoming::Control(control)) => self.handle_control(control),
            Ok(Incoming::Event(event)) => self.handle_server_event(event),
            Ok(Incoming::Unknown { event }) => {
                vec![SessionAction::Log { message: format!("ignoring unknown event `{event}`") }]
            },
            Err(e) => vec![SessionAction::Log { message: format!("dropping frame: {e}") }],
        }
    }

    fn handle_control(&mut self, control: ControlMessage) -> Vec<SessionAction> {
        match control {
            ControlMessage::UsernameNotAvailable => {
                if self.phase != Phase::Connecting {
                    return self.drop_out_of_phase("username_not_available");
                }
                let mut actions = vec![SessionAction::Notify(Notice::NameUnavailable)];
                if let Some(transport) = self.transport.take() {
                    actions.push(SessionAction::Close { transport });
                }
                self.phase = Phase::Disconnected;
                actions
            },
            ControlMessage::Connected => {
                if self.phase != Phase::Connecting {
                    return self.drop_out_of_phase("connected");
                }
                // The server is ready; the `joined` reply to this is what
                // advances the phase.
                vec![SessionAction::Send(ClientIntent::Join {
                    name: self.local_user.trim().to_owned(),
                })]
            },
        }
    }

    fn handle_server_event(&mut self, event: ServerEvent) -> Vec<SessionAction> {
        match event {
            ServerEvent::Joined { users } => {
                if self.phase != Phase::Connecting && self.phase != Phase::Connected {
                    return self.drop_out_of_phase("joined");
                }
                self.phase = Phase::Connected;
                self.roster = Some(users);
                Vec::new()
            },
            other if self.phase != Phase::Connected => self.drop_out_of_phase(other.name()),
            ServerEvent::NewUser { user, users } => {
                self.replace_roster(users);
                vec![SessionAction::Notify(Notice::UserJoined(user))]
            },
            ServerEvent::Left { user, users } => {
                self.replace_roster(users);
                // Keep typing_users a subset of the roster.
                self.typing_users.retain(|u| u != &user);
                vec![SessionAction::Notify(Notice::UserLeft(user))]
            },
            ServerEvent::Typing { user } => {
                // Applied even for users missing from the roster: the roster
                // is informational, not authoritative.
                if user != self.local_user && !self.typing_users.contains(&user) {
                    self.typing_users.push(user);
                }
                Vec::new()
            },
            ServerEvent::StopTyping { user } => {
                self.typing_users.retain(|u| u != &user);
                Vec::new()
            },
            ServerEvent::NewMessage { user, message } => {
                self.messages.push(Message {
                    sent_at: self.env.unix_millis(),
                    author: user,
                    body: message,
                });
                vec![SessionAction::ScrollToLatest]
            },
        }
    }

    /// Roster replacement for `new_user`/`left`: those variants list every
    /// user including ourselves, but the local roster excludes self.
    fn replace_roster(&mut self, users: Vec<String>) {
        let filtered = users.into_iter().filter(|u| u != &self.local_user).collect();
        self.roster = Some(filtered);
    }

    fn drop_out_of_phase(&self, event: &str) -> Vec<SessionAction> {
        vec![SessionAction::Log {
            message: format!("dropping `{event}` received while {:?}", self.phase),
        }]
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, atomic::{AtomicU64, Ordering}},
        time::{Duration, Instant},
    };

    use banter_proto::ServerEvent;

    use super::*;

    /// Manually advanced clock for deterministic tests.
    #[derive(Clone)]
    struct FakeEnv {
        base: Instant,
        offset_millis: Arc<AtomicU64>,
    }

    impl FakeEnv {
        fn new() -> Self {
            Self { base: Instant::now(), offset_millis: Arc::new(AtomicU64::new(0)) }
        }

        fn advance(&self, millis: u64) {
            self.offset_millis.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Environment for FakeEnv {
        type Instant = Instant;

        fn now(&self) -> Instant {
            self.base + Duration::from_millis(self.offset_millis.load(Ordering::SeqCst))
        }

        fn unix_millis(&self) -> u64 {
            1_700_000_000_000 + self.offset_millis.load(Ordering::SeqCst)
        }

        fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            std::future::ready(())
        }
    }

    fn session() -> (Session<FakeEnv>, FakeEnv) {
        let env = FakeEnv::new();
        (Session::new(env.clone(), "wss://chat.example"), env)
    }

    /// Drive a session through connect + join with the given roster.
    fn connected_session(name: &str, roster: &[&str]) -> (Session<FakeEnv>, FakeEnv, TransportId) {
        let (mut session, env) = session();
        session.set_name(name).unwrap();
        let actions = session.connect().unwrap();
        let transport = open_transport(&actions);
        let _ = session.handle(SessionEvent::Opened { transport });
        let _ = deliver(&mut session, transport, banter_proto::CONNECTED);
        let _ = deliver_event(
            &mut session,
            transport,
            &ServerEvent::Joined { users: roster.iter().map(|s| (*s).to_string()).collect() },
        );
        assert_eq!(session.phase(), Phase::Connected);
        (session, env, transport)
    }

    fn open_transport(actions: &[SessionAction]) -> TransportId {
        actions
            .iter()
            .find_map(|a| match a {
                SessionAction::Open { transport, .. } => Some(*transport),
                _ => None,
            })
            .unwrap()
    }

    fn deliver(
        session: &mut Session<FakeEnv>,
        transport: TransportId,
        text: &str,
    ) -> Vec<SessionAction> {
        session.handle(SessionEvent::TextReceived { transport, text: text.to_string() })
    }

    fn deliver_event(
        session: &mut Session<FakeEnv>,
        transport: TransportId,
        event: &ServerEvent,
    ) -> Vec<SessionAction> {
        deliver(session, transport, &event.encode())
    }

    fn sends(actions: &[SessionAction]) -> Vec<&ClientIntent> {
        actions
            .iter()
            .filter_map(|a| match a {
                SessionAction::Send(intent) => Some(intent),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn connect_requires_a_usable_name() {
        let (mut session, _) = session();
        session.set_name("  a  ").unwrap();
        assert!(matches!(session.connect(), Err(SessionError::NameTooShort { .. })));

        session.set_name("ana").unwrap();
        let actions = session.connect().unwrap();
        assert!(matches!(actions.as_slice(), [SessionAction::Open { .. }]));
        assert_eq!(session.phase(), Phase::Connecting);
        assert_eq!(session.roster(), None);
    }

    #[test]
    fn name_is_locked_once_connecting() {
        let (mut session, _) = session();
        session.set_name("ana").unwrap();
        let _ = session.connect().unwrap();
        assert!(matches!(session.set_name("bea"), Err(SessionError::NameLocked { .. })));
    }

    #[test]
    fn raw_connected_triggers_trimmed_join() {
        let (mut session, _) = session();
        session.set_name("  ana  ").unwrap();
        let actions = session.connect().unwrap();
        let transport = open_transport(&actions);

        let actions = deliver(&mut session, transport, banter_proto::CONNECTED);
        assert_eq!(
            sends(&actions),
            vec![&ClientIntent::Join { name: "ana".to_string() }]
        );
        // Phase does not advance until the server's `joined` reply.
        assert_eq!(session.phase(), Phase::Connecting);
    }

    #[test]
    fn joined_includes_self_in_roster() {
        let (session, _, _) = connected_session("bob", &["ann", "bob", "cal"]);
        let roster: Vec<&str> = session.roster().unwrap().iter().map(String::as_str).collect();
        assert_eq!(roster, ["ann", "bob", "cal"]);
    }

    #[test]
    fn new_user_roster_excludes_self() {
        let (mut session, _, transport) = connected_session("bob", &["ann", "bob", "cal"]);
        let actions = deliver_event(
            &mut session,
            transport,
            &ServerEvent::NewUser {
                user: "dee".to_string(),
                users: ["ann", "bob", "cal", "dee"].map(String::from).to_vec(),
            },
        );
        let roster: Vec<&str> = session.roster().unwrap().iter().map(String::as_str).collect();
        assert_eq!(roster, ["ann", "cal", "dee"]);
        assert!(actions.contains(&SessionAction::Notify(Notice::UserJoined("dee".to_string()))));
    }

    #[test]
    fn left_removes_user_from_typing_set() {
        let (mut session, _, transport) = connected_session("bob", &["ann", "bob", "cal"]);
        let _ = deliver_event(&mut session, transport, &ServerEvent::Typing {
            user: "cal".to_string(),
        });
        assert_eq!(session.typing_users(), ["cal"]);

        let actions = deliver_event(
            &mut session,
            transport,
            &ServerEvent::Left {
                user: "cal".to_string(),
                users: ["ann", "bob"].map(String::from).to_vec(),
            },
        );
        assert!(session.typing_users().is_empty());
        assert!(actions.contains(&SessionAction::Notify(Notice::UserLeft("cal".to_string()))));
    }

    #[test]
    fn typing_is_idempotent_and_skips_self() {
        let (mut session, _, transport) = connected_session("bob", &["ann", "bob"]);
        for _ in 0..3 {
            let _ = deliver_event(&mut session, transport, &ServerEvent::Typing {
                user: "ann".to_string(),
            });
        }
        let _ = deliver_event(&mut session, transport, &ServerEvent::Typing {
            user: "bob".to_string(),
        });
        assert_eq!(session.typing_users(), ["ann"]);

        let _ = deliver_event(&mut session, transport, &ServerEvent::StopTyping {
            user: "ann".to_string(),
        });
        let _ = deliver_event(&mut session, transport, &ServerEvent::StopTyping {
            user: "ann".to_string(),
        });
        assert!(session.typing_users().is_empty());
    }

    #[test]
    fn typing_from_unknown_user_is_still_applied() {
        let (mut session, _, transport) = connected_session("bob", &["ann", "bob"]);
        let _ = deliver_event(&mut session, transport, &ServerEvent::Typing {
            user: "ghost".to_string(),
        });
        assert_eq!(session.typing_users(), ["ghost"]);
    }

    #[test]
    fn new_message_appends_and_scrolls() {
        let (mut session, _, transport) = connected_session("bob", &["ann", "bob"]);
        let actions = deliver_event(
            &mut session,
            transport,
            &ServerEvent::NewMessage { user: "ghost".to_string(), message: "boo".to_string() },
        );
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].author, "ghost");
        assert_eq!(session.messages()[0].body, "boo");
        assert!(actions.contains(&SessionAction::ScrollToLatest));
    }

    #[test]
    fn send_message_appends_optimistically_and_clears_draft() {
        let (mut session, _, _) = connected_session("ana", &["ana", "bob"]);
        let _ = session.set_input("  hello world  ");
        let actions = session.send_message().unwrap();

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].author, "ana");
        assert_eq!(session.messages()[0].body, "  hello world  ");
        assert_eq!(session.draft(), "");
        assert!(actions.contains(&SessionAction::ScrollToLatest));
        assert!(
            sends(&actions)
                .iter()
                .any(|i| matches!(i, ClientIntent::NewMessage { body } if body == "  hello world  "))
        );
    }

    #[test]
    fn send_message_stops_typing_before_the_deadline() {
        let (mut session, _, _) = connected_session("ana", &["ana"]);
        let actions = session.set_input("typing now");
        assert_eq!(sends(&actions), vec![&ClientIntent::Typing]);

        let actions = session.send_message().unwrap();
        assert!(sends(&actions).contains(&&ClientIntent::StopTyping));
    }

    #[test]
    fn send_message_rejects_blank_and_disconnected() {
        let (mut session, _) = session();
        session.set_name("ana").unwrap();
        let _ = session.set_input("hello");
        assert!(matches!(session.send_message(), Err(SessionError::NotConnected { .. })));

        let (mut session, _, _) = connected_session("ana", &["ana"]);
        let _ = session.set_input("   ");
        assert!(matches!(session.send_message(), Err(SessionError::BlankMessage)));
    }

    #[test]
    fn debounce_emits_one_typing_and_one_stop() {
        let (mut session, env, _) = connected_session("ana", &["ana"]);

        let mut send_count = 0;
        for text in ["h", "he", "hey"] {
            send_count += sends(&session.set_input(text)).len();
            env.advance(500);
        }
        assert_eq!(send_count, 1, "one typing intent per burst");

        // 2500ms after the last keystroke: quiet period not yet over.
        env.advance(2000);
        assert!(session.handle(SessionEvent::Tick { now: env.now() }).is_empty());

        env.advance(600);
        let actions = session.handle(SessionEvent::Tick { now: env.now() });
        assert_eq!(sends(&actions), vec![&ClientIntent::StopTyping]);

        // No second stop without new activity.
        env.advance(5000);
        assert!(session.handle(SessionEvent::Tick { now: env.now() }).is_empty());
    }

    #[test]
    fn name_rejection_returns_to_disconnected() {
        let (mut session, _) = session();
        session.set_name("ana").unwrap();
        let actions = session.connect().unwrap();
        let transport = open_transport(&actions);

        let actions = deliver(&mut session, transport, banter_proto::USERNAME_NOT_AVAILABLE);
        assert_eq!(session.phase(), Phase::Disconnected);
        assert_eq!(session.roster(), None);
        assert!(actions.contains(&SessionAction::Notify(Notice::NameUnavailable)));
        assert!(actions.contains(&SessionAction::Close { transport }));

        // The user can fix their name and retry.
        session.set_name("ana2").unwrap();
        assert!(session.connect().is_ok());
    }

    #[test]
    fn disconnect_twice_is_a_no_op() {
        let (mut session, _, transport) = connected_session("ana", &["ana", "bob"]);
        let _ = session.set_input("draft");

        let actions = session.disconnect();
        assert_eq!(actions, vec![SessionAction::Close { transport }]);
        assert_eq!(session.phase(), Phase::Disconnected);
        assert_eq!(session.roster(), None);
        assert!(session.messages().is_empty());
        assert!(session.typing_users().is_empty());
        assert_eq!(session.draft(), "");

        assert!(session.disconnect().is_empty());
    }

    #[test]
    fn transport_failure_preserves_state_for_post_mortem() {
        let (mut session, _, transport) = connected_session("ana", &["ana", "bob"]);
        let _ = deliver_event(
            &mut session,
            transport,
            &ServerEvent::NewMessage { user: "bob".to_string(), message: "hi".to_string() },
        );

        let actions = session.handle(SessionEvent::Failed {
            transport,
            reason: "connection reset".to_string(),
        });
        assert_eq!(session.phase(), Phase::Error);
        assert_eq!(session.messages().len(), 1);
        assert!(session.roster().is_some());
        assert!(actions.contains(&SessionAction::Close { transport }));

        // The close that follows the error is stale and changes nothing.
        let _ = session.handle(SessionEvent::Closed { transport });
        assert_eq!(session.phase(), Phase::Error);
        assert_eq!(session.messages().len(), 1);

        // Retry is user-initiated and starts clean.
        let actions = session.connect().unwrap();
        assert_eq!(session.phase(), Phase::Connecting);
        assert!(session.messages().is_empty());
        assert!(matches!(actions.as_slice(), [SessionAction::Open { .. }]));
    }

    #[test]
    fn unexpected_close_resets_like_disconnect() {
        let (mut session, _, transport) = connected_session("ana", &["ana", "bob"]);
        let actions = session.handle(SessionEvent::Closed { transport });

        assert_eq!(session.phase(), Phase::Disconnected);
        assert_eq!(session.roster(), None);
        assert!(session.messages().is_empty());
        assert!(actions.contains(&SessionAction::Notify(Notice::ConnectionLost)));
    }

    #[test]
    fn stale_transport_callbacks_are_ignored() {
        let (mut session, _, old_transport) = connected_session("ana", &["ana"]);

        // Force-reconnect supersedes the first transport.
        let actions = session.connect().unwrap();
        let new_transport = open_transport(&actions);
        assert_ne!(old_transport, new_transport);
        assert!(actions.contains(&SessionAction::Close { transport: old_transport }));

        let actions = deliver(&mut session, old_transport, banter_proto::CONNECTED);
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));
        assert_eq!(session.phase(), Phase::Connecting);

        let actions = session.handle(SessionEvent::Failed {
            transport: old_transport,
            reason: "late error".to_string(),
        });
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));
        assert_eq!(session.phase(), Phase::Connecting);
    }

    #[test]
    fn frames_before_join_are_dropped() {
        let (mut session, _) = session();
        session.set_name("ana").unwrap();
        let actions = session.connect().unwrap();
        let transport = open_transport(&actions);

        let actions = deliver_event(&mut session, transport, &ServerEvent::NewMessage {
            user: "bob".to_string(),
            message: "too early".to_string(),
        });
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn malformed_and_unknown_frames_are_dropped() {
        let (mut session, _, transport) = connected_session("ana", &["ana"]);

        let actions = deliver(&mut session, transport, "{not json");
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));

        let actions = deliver(&mut session, transport, r#"{"event":"reaction","data":{}}"#);
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));

        // Known event, wrong payload shape.
        let actions = deliver(&mut session, transport, r#"{"event":"typing","data":{}}"#);
        assert!(matches!(actions.as_slice(), [SessionAction::Log { .. }]));
        assert_eq!(session.phase(), Phase::Connected);
    }

    #[test]
    fn typing_while_disconnected_only_updates_draft() {
        let (mut session, _) = session();
        let actions = session.set_input("offline draft");
        assert!(actions.is_empty());
        assert_eq!(session.draft(), "offline draft");
    }

    #[test]
    fn message_timestamps_come_from_the_environment() {
        let (mut session, env, transport) = connected_session("ana", &["ana"]);
        env.advance(1234);
        let _ = deliver_event(&mut session, transport, &ServerEvent::NewMessage {
            user: "bob".to_string(),
            message: "hi".to_string(),
        });
        assert_eq!(session.messages()[0].sent_at, 1_700_000_000_000 + 1234);
    }
}
