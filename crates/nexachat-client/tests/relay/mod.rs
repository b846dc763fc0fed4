//! In-process relay shared by the WebSocket tests.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;

type Rooms = Arc<DashMap<String, broadcast::Sender<String>>>;

async fn ws_upgrade(State(rooms): State<Rooms>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| relay(socket, rooms))
}

/// Minimal relay: the first `join` picks the room, every later text frame is
/// fanned out to the room, sender included.
async fn relay(socket: WebSocket, rooms: Rooms) {
    let (mut tx, mut rx) = socket.split();

    let room = loop {
        match rx.next().await {
            Some(Ok(Message::Text(t))) => {
                let Ok(v) = serde_json::from_str::<serde_json::Value>(&t) else { continue };
                if v["type"] == "join" {
                    if let Some(r) = v["payload"]["roomId"].as_str() {
                        break r.to_string();
                    }
                }
            }
            Some(Ok(_)) => continue,
            _ => return,
        }
    };

    let bus = rooms
        .entry(room.clone())
        .or_insert_with(|| broadcast::channel(64).0)
        .clone();
    let mut sub = bus.subscribe();

    let joined = json!({
        "type": "chat",
        "payload": { "message": format!("joined {room}"), "name": "System" }
    })
    .to_string();
    if tx.send(Message::Text(joined)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            out = sub.recv() => match out {
                Ok(s) => {
                    if tx.send(Message::Text(s)).await.is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            incoming = rx.next() => match incoming {
                Some(Ok(Message::Text(t))) => {
                    let _ = bus.send(t);
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

pub async fn spawn_relay() -> SocketAddr {
    let rooms: Rooms = Arc::new(DashMap::new());
    let app = Router::new().route("/", get(ws_upgrade)).with_state(rooms);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Address with nothing listening on it.
pub async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
