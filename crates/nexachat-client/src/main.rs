//! `nexachat`: terminal client for NexaChat rooms.
//!
//! - Joins the room given by `--room` (or a generated one)
//! - Reads intents from stdin, prints the room log to stdout
//! - Logs go to stderr, filtered by `RUST_LOG` (default `info`)

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use nexachat_client::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match nexachat_client::run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(category = e.category().as_str(), "fatal: {e}");
            1
        }
    };
    // The stdin reader may still be parked in a blocking read.
    std::process::exit(code);
}
