//! Room identifiers and share links.

use std::fmt;

use rand::Rng;

use crate::error::{NexaChatError, Result};

/// Lowest generated room number.
pub const ROOM_ID_MIN: u32 = 10_000;
/// Highest generated room number (inclusive).
pub const ROOM_ID_MAX: u32 = 99_999;

/// Opaque room token: non-empty and URL-safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Validate a client-supplied room id. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(NexaChatError::EmptyRoomId);
        }
        if !s.chars().all(is_unreserved) {
            return Err(NexaChatError::InvalidRoomId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Join rule of the home screen: use the typed id, or a fresh one if blank.
    pub fn from_input(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(generate());
        }
        Self::parse(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// RFC 3986 unreserved set.
fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Draw a 5-digit room id uniformly from `ROOM_ID_MIN..=ROOM_ID_MAX`.
///
/// No uniqueness check: two unrelated groups drawing the same number end up
/// sharing a room.
pub fn generate() -> RoomId {
    let n = rand::rng().random_range(ROOM_ID_MIN..=ROOM_ID_MAX);
    RoomId(n.to_string())
}

/// Canonical link for inviting others: `<origin>/room/<roomId>`.
pub fn share_url(origin: &str, room: &RoomId) -> String {
    format!("{}/room/{}", origin.trim_end_matches('/'), room)
}
