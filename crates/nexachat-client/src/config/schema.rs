use std::time::Duration;

use nexachat_core::error::{NexaChatError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub client: ClientSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            client: ClientSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NexaChatError::UnsupportedVersion);
        }

        self.client.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Relay address. `http(s)://` is accepted and dialed as `ws(s)://`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Origin used to build share links.
    #[serde(default = "default_share_origin")]
    pub share_origin: String,

    /// Capacity of the transport and UI channels.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            share_origin: default_share_origin(),
            event_buffer: default_event_buffer(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ClientSection {
    pub fn validate(&self) -> Result<()> {
        const SCHEMES: [&str; 4] = ["ws://", "wss://", "http://", "https://"];
        if !SCHEMES.iter().any(|s| self.endpoint.starts_with(s)) {
            return Err(NexaChatError::Config(
                "client.endpoint must start with ws://, wss://, http:// or https://".into(),
            ));
        }
        if self.share_origin.trim().is_empty() {
            return Err(NexaChatError::Config(
                "client.share_origin must not be empty".into(),
            ));
        }
        if !(1..=65536).contains(&self.event_buffer) {
            return Err(NexaChatError::Config(
                "client.event_buffer must be between 1 and 65536".into(),
            ));
        }
        if !(1000..=120000).contains(&self.connect_timeout_ms) {
            return Err(NexaChatError::Config(
                "client.connect_timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint with an http scheme rewritten to its WebSocket counterpart.
    pub fn ws_endpoint(&self) -> String {
        to_ws_url(&self.endpoint)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

pub fn to_ws_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

fn default_endpoint() -> String {
    "ws://localhost:5050".into()
}
fn default_share_origin() -> String {
    "http://localhost:5173".into()
}
fn default_event_buffer() -> usize {
    256
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
