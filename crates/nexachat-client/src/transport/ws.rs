//! WebSocket transport on tokio-tungstenite.
//!
//! Each [`WsTransport`] owns one background task holding the socket. The
//! handle talks to it over two bounded channels: commands in (send/close),
//! [`TransportEvent`]s out. Dropping the handle closes the connection.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use nexachat_core::error::{NexaChatError, Result};
use nexachat_core::TransportEvent;

use crate::transport::codec::{self, Inbound};
use crate::transport::{Connector, Transport};

#[derive(Debug)]
enum Command {
    Send(Bytes),
    Close,
}

/// Opens [`WsTransport`]s with a fixed channel capacity.
#[derive(Debug, Clone)]
pub struct WsConnector {
    buffer: usize,
}

impl WsConnector {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
        }
    }
}

impl Connector for WsConnector {
    fn open(&self, endpoint: &str) -> Box<dyn Transport> {
        Box::new(WsTransport::open(endpoint, self.buffer))
    }
}

pub struct WsTransport {
    cmd_tx: Option<mpsc::Sender<Command>>,
    events: mpsc::Receiver<TransportEvent>,
    finished: bool,
}

impl WsTransport {
    /// Start connecting to `endpoint`. Must be called inside a tokio runtime.
    pub fn open(endpoint: &str, buffer: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        let (ev_tx, ev_rx) = mpsc::channel(buffer);

        let url = endpoint.to_string();
        tokio::spawn(async move {
            let terminal = run_connection(&url, cmd_rx, &ev_tx).await;
            let _ = ev_tx.send(terminal).await;
        });

        Self {
            cmd_tx: Some(cmd_tx),
            events: ev_rx,
            finished: false,
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, frame: Bytes) -> Result<()> {
        let tx = self
            .cmd_tx
            .as_ref()
            .ok_or_else(|| NexaChatError::Transport("send after close".into()))?;
        tx.send(Command::Send(frame))
            .await
            .map_err(|_| NexaChatError::Transport("connection task gone".into()))
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        if self.finished {
            return None;
        }
        let ev = self.events.recv().await;
        if !matches!(ev, Some(TransportEvent::Opened) | Some(TransportEvent::Frame(_))) {
            self.finished = true;
        }
        ev
    }

    fn close(&mut self) {
        // Dropping the sender also stops the task once queued sends drain.
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.try_send(Command::Close);
        }
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drive one connection. Returns the terminal event; never retries.
async fn run_connection(
    url: &str,
    mut cmd_rx: mpsc::Receiver<Command>,
    ev_tx: &mpsc::Sender<TransportEvent>,
) -> TransportEvent {
    let ws = match tokio_tungstenite::connect_async(url).await {
        Ok((ws, _)) => ws,
        Err(e) => {
            tracing::warn!(%url, err = %e, "connect failed");
            return TransportEvent::Error(e.to_string());
        }
    };
    tracing::debug!(%url, "connected");

    if ev_tx.send(TransportEvent::Opened).await.is_err() {
        return TransportEvent::Closed;
    }

    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            // outbound writer
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Send(frame)) => {
                        let msg = match codec::text_message(frame) {
                            Ok(m) => m,
                            Err(e) => {
                                tracing::warn!(err = %e, "outbound frame dropped");
                                continue;
                            }
                        };
                        if let Err(e) = ws_tx.send(msg).await {
                            return TransportEvent::Error(e.to_string());
                        }
                    }
                    Some(Command::Close) | None => {
                        // best effort: in-flight data is not acknowledged
                        let _ = ws_tx.send(Message::Close(None)).await;
                        tracing::debug!(%url, "closed by owner");
                        return TransportEvent::Closed;
                    }
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(msg)) => match codec::classify(msg) {
                        Inbound::Frame(bytes) => {
                            if ev_tx.send(TransportEvent::Frame(bytes)).await.is_err() {
                                return TransportEvent::Closed;
                            }
                        }
                        Inbound::Close(reason) => {
                            tracing::debug!(%url, ?reason, "closed by relay");
                            return TransportEvent::Closed;
                        }
                        Inbound::Control => {}
                    },
                    Some(Err(e)) => return TransportEvent::Error(e.to_string()),
                    None => return TransportEvent::Closed,
                }
            }
        }
    }
}
