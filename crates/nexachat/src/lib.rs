//! Top-level facade crate for NexaChat.
//!
//! Re-exports the core protocol types and the client library so users can depend on a single crate.

pub mod core {
    pub use nexachat_core::*;
}

pub mod client {
    pub use nexachat_client::*;
}
