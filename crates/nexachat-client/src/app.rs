//! Terminal front end: stdin lines in, rendered room out.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use nexachat_core::error::Result;
use nexachat_core::room::share_url;
use nexachat_core::{ConnectionState, EntryOrigin, Identity, NoticeLevel, RoomId};

use crate::cli::{parse_line, Cli, InputLine, HELP};
use crate::config::{self, ClientConfig};
use crate::runner::{run_room, Intent, UiEvent};
use crate::transport::WsConnector;

pub async fn run(cli: Cli) -> Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        cfg.client.endpoint = endpoint;
        cfg.validate()?;
    }

    let room = RoomId::from_input(cli.room.as_deref().unwrap_or_default())?;
    let share = share_url(&cfg.client.share_origin, &room);
    println!("Room: {room}  ({share})");

    let (intent_tx, intent_rx) = mpsc::channel(cfg.client.event_buffer);
    let (ui_tx, ui_rx) = mpsc::channel(cfg.client.event_buffer);

    tokio::spawn(read_input(intent_tx.clone(), share));
    let printer = tokio::spawn(render(ui_rx, intent_tx, cli.name));

    let connector = WsConnector::new(cfg.client.event_buffer);
    let session = run_room(&connector, &cfg.client, room, intent_rx, ui_tx).await?;

    let _ = printer.await;
    tracing::info!(entries = session.log().len(), "session ended");
    Ok(())
}

async fn read_input(intents: mpsc::Sender<Intent>, share: String) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => None,
            line = lines.next_line() => line.unwrap_or_else(|e| {
                tracing::warn!(err = %e, "stdin read failed");
                None
            }),
        };

        let intent = match line.as_deref().map(parse_line) {
            None | Some(InputLine::Leave) => Intent::Leave,
            Some(InputLine::Name(name)) => Intent::SetName(name),
            Some(InputLine::Say(text)) => Intent::Send(text),
            Some(InputLine::Share) => {
                println!("{share}");
                continue;
            }
            Some(InputLine::Help) => {
                println!("{HELP}");
                continue;
            }
            Some(InputLine::Unknown(cmd)) => {
                println!("unknown command /{cmd}\n{HELP}");
                continue;
            }
        };

        let leaving = intent == Intent::Leave;
        if intents.send(intent).await.is_err() || leaving {
            break;
        }
    }
}

async fn render(
    mut ui: mpsc::Receiver<UiEvent>,
    intents: mpsc::Sender<Intent>,
    mut auto_name: Option<String>,
) {
    while let Some(ev) = ui.recv().await {
        match ev {
            UiEvent::State(state) => {
                tracing::debug!(state = state.label(), "session state");
                if state == ConnectionState::Open(Identity::Unnamed) {
                    match auto_name.take() {
                        Some(name) => {
                            let _ = intents.send(Intent::SetName(name)).await;
                        }
                        None => println!("-- connected; set your name with /name <name>"),
                    }
                }
            }
            UiEvent::Entry { entry, origin } => match origin {
                EntryOrigin::System => println!("   * {}", entry.message),
                EntryOrigin::Own => println!("{:>12} > {}", "you", entry.message),
                EntryOrigin::Peer => println!("{:>12} | {}", entry.name, entry.message),
            },
            UiEvent::Notice(notice) => match notice.level {
                NoticeLevel::Success | NoticeLevel::Info => println!("-- {}", notice.text),
                NoticeLevel::Error => println!("!! {}", notice.text),
            },
        }
    }
}
