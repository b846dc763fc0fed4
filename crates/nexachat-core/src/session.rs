//! Session state machine (sans-IO).
//!
//! A [`Session`] never touches the network. Intents (`open_room`, `set_name`,
//! `send_message`, `leave`) and transport signals ([`TransportEvent`]) run to
//! completion synchronously and queue [`Effect`]s, which the owner drains and
//! executes against the real transport.
//!
//! ```text
//! Disconnected -> Connecting -> Open(Unnamed) -> Open(Named)
//!        \            \              \               \
//!         +------------+--------------+---------------+--> Closed
//! ```

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;

use crate::error::{NexaChatError, Result};
use crate::log::{MessageLog, SYSTEM_SENDER};
use crate::protocol::{decode, Envelope, ANONYMOUS};
use crate::room::RoomId;

/// Committed display name: trimmed, non-empty, not the System sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(NexaChatError::EmptyName);
        }
        if s == SYSTEM_SENDER {
            return Err(NexaChatError::ReservedName(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Unnamed,
    Named(ParticipantName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open(Identity),
    Closed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open(Identity::Unnamed) => "open(unnamed)",
            ConnectionState::Open(Identity::Named(_)) => "open(named)",
            ConnectionState::Closed => "closed",
        }
    }
}

/// Signals delivered by a transport adapter, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Frame(Bytes),
    Error(String),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message for the user (a toast), never part of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Work the owner must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Connect to the relay for [`Session::room_id`].
    OpenTransport,
    /// Write one encoded envelope.
    Send(Bytes),
    /// Release the transport. Safe to execute more than once.
    CloseTransport,
    Notify(Notice),
}

/// One participant's visit to one room.
#[derive(Debug)]
pub struct Session {
    room_id: Option<RoomId>,
    // Kept past Closed; the Open(Named) variant is gone by then.
    name: Option<ParticipantName>,
    state: ConnectionState,
    log: MessageLog,
    draft: String,
    outbox: VecDeque<Effect>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            room_id: None,
            name: None,
            state: ConnectionState::Disconnected,
            log: MessageLog::new(),
            draft: String::new(),
            outbox: VecDeque::new(),
        }
    }

    /// Set once by [`Session::open_room`], never changed afterwards.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Committed name. Set once and still readable after the session closes.
    pub fn name(&self) -> Option<&ParticipantName> {
        self.name.as_ref()
    }

    /// Name shown as "chatting as".
    pub fn display_name(&self) -> &str {
        self.name().map(ParticipantName::as_str).unwrap_or(ANONYMOUS)
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Take every queued effect, oldest first.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.outbox.drain(..).collect()
    }

    pub fn open_room(&mut self, room_id: RoomId) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            return Err(self.invalid("open room"));
        }
        tracing::info!(room = %room_id, "opening room");
        self.room_id = Some(room_id);
        self.state = ConnectionState::Connecting;
        self.outbox.push_back(Effect::OpenTransport);
        Ok(())
    }

    pub fn set_name(&mut self, raw: &str) -> Result<()> {
        match &self.state {
            ConnectionState::Open(Identity::Unnamed) => {}
            ConnectionState::Open(Identity::Named(n)) => {
                return Err(NexaChatError::NameAlreadySet(n.to_string()));
            }
            _ => return Err(self.invalid("set name")),
        }

        let name = ParticipantName::parse(raw)?;
        tracing::debug!(name = %name, "name committed");
        self.outbox
            .push_back(Effect::Notify(Notice::success(format!("Welcome, {name}!"))));
        self.name = Some(name.clone());
        self.state = ConnectionState::Open(Identity::Named(name));
        Ok(())
    }

    /// Send a chat line. On success the draft is cleared; on error nothing is
    /// emitted and the draft is kept.
    pub fn send_message(&mut self, raw: &str) -> Result<()> {
        let name = match &self.state {
            ConnectionState::Open(Identity::Named(n)) => n,
            _ => return Err(self.invalid("send message")),
        };

        let text = raw.trim();
        if text.is_empty() {
            return Err(NexaChatError::EmptyMessage);
        }

        let frame = Envelope::chat(text, Some(name.as_str())).encode();
        self.outbox.push_back(Effect::Send(frame));
        self.draft.clear();
        Ok(())
    }

    pub fn send_draft(&mut self) -> Result<()> {
        let draft = self.draft.clone();
        self.send_message(&draft)
    }

    /// Leave the room. Valid from any state; a second call is a no-op.
    pub fn leave(&mut self) {
        match self.state {
            ConnectionState::Closed => {}
            ConnectionState::Disconnected => {
                self.state = ConnectionState::Closed;
            }
            _ => {
                tracing::info!(room = ?self.room_id.as_ref().map(RoomId::as_str), "leaving room");
                self.state = ConnectionState::Closed;
                self.outbox.push_back(Effect::CloseTransport);
            }
        }
    }

    pub fn on_transport(&mut self, ev: TransportEvent) {
        if self.state == ConnectionState::Closed {
            tracing::trace!(?ev, "transport event after close ignored");
            return;
        }

        match ev {
            TransportEvent::Opened => self.on_opened(),
            TransportEvent::Frame(bytes) => self.on_frame(&bytes),
            TransportEvent::Error(reason) => {
                tracing::warn!(state = self.state.label(), %reason, "transport error");
                self.terminate(Notice::error(format!("Disconnected: {reason}")));
            }
            TransportEvent::Closed => {
                tracing::info!(state = self.state.label(), "transport closed");
                self.terminate(Notice::info("Disconnected"));
            }
        }
    }

    fn on_opened(&mut self) {
        if self.state != ConnectionState::Connecting {
            tracing::warn!(state = self.state.label(), "unexpected transport open");
            return;
        }
        let Some(room) = &self.room_id else {
            return;
        };
        let frame = Envelope::join(room.as_str()).encode();
        self.state = ConnectionState::Open(Identity::Unnamed);
        self.outbox.push_back(Effect::Send(frame));
    }

    fn on_frame(&mut self, bytes: &[u8]) {
        if !matches!(self.state, ConnectionState::Open(_)) {
            tracing::debug!(state = self.state.label(), "frame before open dropped");
            return;
        }

        match decode(bytes) {
            Ok(Envelope::Chat(payload)) => self.log.append(payload.into()),
            Ok(Envelope::Join(_)) => {
                tracing::debug!("inbound join ignored");
            }
            Err(NexaChatError::UnknownKind(kind)) => {
                tracing::debug!(%kind, "unknown envelope type ignored");
            }
            Err(e) => {
                tracing::warn!(bytes_len = bytes.len(), err = %e, "dropping undecodable frame");
            }
        }
    }

    fn terminate(&mut self, notice: Notice) {
        if self.state == ConnectionState::Disconnected {
            return;
        }
        self.state = ConnectionState::Closed;
        self.outbox.push_back(Effect::CloseTransport);
        self.outbox.push_back(Effect::Notify(notice));
    }

    fn invalid(&self, action: &'static str) -> NexaChatError {
        NexaChatError::InvalidState {
            action,
            state: self.state.label(),
        }
    }
}
