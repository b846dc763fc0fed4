//! NexaChat client library entry.
//!
//! Wires the config loader, the WebSocket transport and the room event loop
//! around the core session state machine. Consumed by the `nexachat` binary
//! (`main.rs`) and by integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod runner;
pub mod transport;

pub use app::run;
