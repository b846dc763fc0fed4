//! WebSocket message <-> frame mapping.
//!
//! - Text and Binary messages => raw frame bytes for the envelope decoder
//! - Close is surfaced for lifecycle management
//! - Ping/Pong are answered by tungstenite itself

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

use nexachat_core::error::{NexaChatError, Result};

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Frame(Bytes),
    Close(Option<String>),
    Control,
}

pub fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Frame(Bytes::copy_from_slice(s.as_bytes())),
        Message::Binary(b) => Inbound::Frame(b),
        Message::Close(frame) => Inbound::Close(frame.map(|f| f.reason.to_string())),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Inbound::Control,
    }
}

/// Wrap an encoded envelope in a Text message.
pub fn text_message(frame: Bytes) -> Result<Message> {
    let s = String::from_utf8(frame.to_vec())
        .map_err(|e| NexaChatError::Internal(format!("outbound frame is not utf-8: {e}")))?;
    Ok(Message::text(s))
}
