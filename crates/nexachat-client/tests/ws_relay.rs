//! End-to-end: two clients talking through an in-process relay.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use tokio::sync::mpsc;

use nexachat_client::config::ClientSection;
use nexachat_client::runner::{run_room, Intent, UiEvent};
use nexachat_client::transport::WsConnector;
use nexachat_core::error::Result;
use nexachat_core::{ChatEntry, EntryOrigin, NoticeLevel, RoomId, Session};

mod relay;
use relay::{dead_addr, spawn_relay};

struct Client {
    intents: mpsc::Sender<Intent>,
    ui: mpsc::Receiver<UiEvent>,
    task: tokio::task::JoinHandle<Result<Session>>,
}

fn join(endpoint: String, room: &str) -> Client {
    let (intent_tx, intent_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(64);
    let cfg = ClientSection {
        endpoint,
        ..ClientSection::default()
    };
    let room = RoomId::parse(room).unwrap();
    let task = tokio::spawn(async move {
        let connector = WsConnector::new(cfg.event_buffer);
        run_room(&connector, &cfg, room, intent_rx, ui_tx).await
    });
    Client {
        intents: intent_tx,
        ui: ui_rx,
        task,
    }
}

impl Client {
    async fn wait_for_entry(&mut self, message: &str) -> (ChatEntry, EntryOrigin) {
        loop {
            let ev = tokio::time::timeout(Duration::from_secs(5), self.ui.recv())
                .await
                .expect("ui event timed out")
                .expect("ui channel closed");
            if let UiEvent::Entry { entry, origin } = ev {
                if entry.message == message {
                    return (entry, origin);
                }
            }
        }
    }

    async fn leave(self) -> Session {
        self.intents.send(Intent::Leave).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("runner did not stop")
            .unwrap()
            .unwrap()
    }
}

#[tokio::test]
async fn two_participants_exchange_messages() {
    let addr = spawn_relay().await;
    let endpoint = format!("http://{addr}");

    let mut ann = join(endpoint.clone(), "42000");
    let mut bob = join(endpoint, "42000");
    ann.wait_for_entry("joined 42000").await;
    bob.wait_for_entry("joined 42000").await;

    ann.intents.send(Intent::SetName("Ann".into())).await.unwrap();
    ann.intents.send(Intent::Send("  hello ".into())).await.unwrap();

    let (entry, origin) = ann.wait_for_entry("hello").await;
    assert_eq!(entry.name, "Ann");
    assert_eq!(origin, EntryOrigin::Own);
    let (entry, origin) = bob.wait_for_entry("hello").await;
    assert_eq!(entry.name, "Ann");
    assert_eq!(origin, EntryOrigin::Peer);

    bob.intents.send(Intent::SetName("Bob".into())).await.unwrap();
    bob.intents.send(Intent::Send("hi".into())).await.unwrap();
    ann.wait_for_entry("hi").await;
    bob.wait_for_entry("hi").await;

    let ann_session = ann.leave().await;
    let bob_session = bob.leave().await;

    let ann_log: Vec<(&str, &str)> = ann_session
        .log()
        .all()
        .map(|e| (e.name.as_str(), e.message.as_str()))
        .collect();
    assert_eq!(
        ann_log,
        [
            ("System", "Welcome to the chat room!"),
            ("System", "joined 42000"),
            ("Ann", "hello"),
            ("Bob", "hi"),
        ]
    );
    assert_eq!(bob_session.log().len(), 4);
    assert_eq!(bob_session.room_id().unwrap().as_str(), "42000");
}

#[tokio::test]
async fn rooms_are_isolated() {
    let addr = spawn_relay().await;
    let endpoint = format!("ws://{addr}");

    let mut ann = join(endpoint.clone(), "11111");
    let mut cy = join(endpoint, "22222");
    ann.wait_for_entry("joined 11111").await;
    cy.wait_for_entry("joined 22222").await;

    cy.intents.send(Intent::SetName("Cy".into())).await.unwrap();
    cy.intents.send(Intent::Send("only here".into())).await.unwrap();
    cy.wait_for_entry("only here").await;

    let ann_session = ann.leave().await;
    assert_eq!(ann_session.log().len(), 2);
    cy.leave().await;
}

#[tokio::test]
async fn unreachable_relay_reports_disconnect() {
    let addr = dead_addr().await;
    let mut client = join(format!("ws://{addr}"), "1");
    let notice = loop {
        let ev = tokio::time::timeout(Duration::from_secs(5), client.ui.recv())
            .await
            .expect("ui event timed out")
            .expect("ui channel closed");
        if let UiEvent::Notice(n) = ev {
            break n;
        }
    };
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.starts_with("Disconnected"));

    let session = tokio::time::timeout(Duration::from_secs(5), client.task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(session.is_closed());
    assert_eq!(session.log().len(), 1);
}
