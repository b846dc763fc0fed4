//! Envelope codec.
//!
//! Decoding happens in two steps: the outer `{type, payload}` shape is parsed
//! first with `payload` kept as `RawValue`, then the payload is parsed only
//! once the kind is known. Unknown kinds are rejected before their payload is
//! ever touched.
//!
//! Derived struct deserializers also accept JSON arrays (fields by position),
//! so both the envelope and the payload must be objects before typed parsing.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{NexaChatError, Result};

/// Sender name used when a chat is encoded without a committed name.
pub const ANONYMOUS: &str = "Anonymous";

/// Envelope kinds understood by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Join,
    Chat,
}

impl MessageKind {
    /// Wire name (the `type` field).
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Join => "join",
            MessageKind::Chat => "chat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "join" => Some(MessageKind::Join),
            "chat" => Some(MessageKind::Chat),
            _ => None,
        }
    }
}

/// Payload of a `join` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_id: String,
}

/// Payload of a `chat` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub message: String,
    pub name: String,
}

/// Wire unit exchanged with the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Envelope {
    Join(JoinPayload),
    Chat(ChatPayload),
}

impl Envelope {
    pub fn join(room_id: impl Into<String>) -> Self {
        Envelope::Join(JoinPayload {
            room_id: room_id.into(),
        })
    }

    /// Build a chat envelope from raw user input.
    ///
    /// Both fields are trimmed; a missing or blank name falls back to
    /// [`ANONYMOUS`]. Callers are expected to have rejected blank messages.
    pub fn chat(message: &str, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS);
        Envelope::Chat(ChatPayload {
            message: message.trim().to_string(),
            name: name.to_string(),
        })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Envelope::Join(_) => MessageKind::Join,
            Envelope::Chat(_) => MessageKind::Chat,
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Bytes {
        // String-only payloads: serde_json has no failure path for these.
        match serde_json::to_vec(self) {
            Ok(v) => Bytes::from(v),
            Err(e) => {
                tracing::error!(err = %e, kind = self.kind().as_str(), "envelope encode failed");
                Bytes::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Box<RawValue>>,
}

/// Decode one inbound frame.
///
/// Fails with [`NexaChatError::Decode`] for anything that is not a JSON
/// object with a string `type` and a payload matching that type, and with
/// [`NexaChatError::UnknownKind`] for well-formed envelopes of a kind this
/// client does not interpret.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    if !is_json_object(bytes) {
        return Err(NexaChatError::Decode("envelope is not a json object".into()));
    }
    let raw: RawEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| NexaChatError::Decode(format!("invalid envelope json: {e}")))?;

    let kind = MessageKind::parse(&raw.kind).ok_or(NexaChatError::UnknownKind(raw.kind))?;

    let payload = raw
        .payload
        .ok_or_else(|| NexaChatError::Decode(format!("{} requires payload", kind.as_str())))?;
    if !is_json_object(payload.get().as_bytes()) {
        return Err(NexaChatError::Decode(format!(
            "{} payload is not a json object",
            kind.as_str()
        )));
    }

    match kind {
        MessageKind::Join => serde_json::from_str::<JoinPayload>(payload.get())
            .map(Envelope::Join)
            .map_err(|e| NexaChatError::Decode(format!("join invalid payload: {e}"))),
        MessageKind::Chat => serde_json::from_str::<ChatPayload>(payload.get())
            .map(Envelope::Chat)
            .map_err(|e| NexaChatError::Decode(format!("chat invalid payload: {e}"))),
    }
}

/// First significant byte opens an object. Well-formedness is left to serde.
fn is_json_object(text: &[u8]) -> bool {
    text.trim_ascii_start().first() == Some(&b'{')
}
