//! Transport layer (WebSocket).
//!
//! A transport carries encoded envelopes to the relay and reports
//! [`TransportEvent`]s back, in delivery order. Connection attempts are never
//! retried here: a lost connection ends the session.

pub mod codec;
pub mod ws;

use async_trait::async_trait;
use bytes::Bytes;

use nexachat_core::error::Result;
use nexachat_core::TransportEvent;

pub use ws::{WsConnector, WsTransport};

/// One connection attempt.
///
/// Guarantees: at most one `Opened`, then exactly one terminal `Error` or
/// `Closed`; after the terminal signal `recv` returns `None`.
#[async_trait]
pub trait Transport: Send {
    /// Write one frame. Only valid once `Opened` was delivered; the session
    /// state machine enforces that, not the transport.
    async fn send(&mut self, frame: Bytes) -> Result<()>;

    async fn recv(&mut self) -> Option<TransportEvent>;

    /// Release the connection. Idempotent.
    fn close(&mut self);
}

/// Opens transports. Returns immediately; the outcome arrives as an event.
pub trait Connector: Send + Sync {
    fn open(&self, endpoint: &str) -> Box<dyn Transport>;
}
