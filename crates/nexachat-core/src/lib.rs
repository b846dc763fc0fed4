//! NexaChat core: room session protocol primitives, independent of any runtime.
//!
//! This crate defines the wire envelopes, room identifiers, the message log
//! and the session state machine. It carries no transport or async runtime
//! dependencies: a [`session::Session`] is driven by plain method calls and
//! reports the I/O it needs as [`session::Effect`]s.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `NexaChatError`/`Result`, so a malformed frame from the relay
//! can never crash the client.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod log;
pub mod protocol;
pub mod room;
pub mod session;

pub use error::{ErrorCategory, NexaChatError, Result};
pub use log::{ChatEntry, EntryOrigin, MessageLog};
pub use room::RoomId;
pub use session::{ConnectionState, Effect, Identity, Notice, NoticeLevel, Session, TransportEvent};
