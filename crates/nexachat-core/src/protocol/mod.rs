//! Room wire protocol (JSON envelopes).
//!
//! Every frame exchanged with the relay is a `{type, payload}` envelope. The
//! decoder is panic-free: malformed input is reported as `NexaChatError`
//! instead of panicking, so a hostile or buggy relay can never take down the
//! session that receives its frames.

pub mod envelope;

pub use envelope::{decode, ChatPayload, Envelope, JoinPayload, MessageKind, ANONYMOUS};
