//! Room event loop.
//!
//! Serializes user intents and transport events into a single [`Session`],
//! executes the effects it queues, and forwards what changed to the UI. The
//! transport lives only inside [`run_room`]: acquired when the session asks
//! for it, released when the session closes.

use tokio::sync::mpsc;
use tokio::time::Instant;

use nexachat_core::error::{ErrorCategory, Result};
use nexachat_core::{
    ChatEntry, ConnectionState, Effect, EntryOrigin, Notice, RoomId, Session, TransportEvent,
};

use crate::config::ClientSection;
use crate::transport::{Connector, Transport};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetName(String),
    Send(String),
    Leave,
}

/// What the UI should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    State(ConnectionState),
    Entry { entry: ChatEntry, origin: EntryOrigin },
    Notice(Notice),
}

struct View {
    state: ConnectionState,
    rendered: usize,
}

/// Join `room` and run until the session closes.
///
/// Closing the intent channel counts as leaving. The returned session is
/// closed and still holds the full message log.
pub async fn run_room<C: Connector + ?Sized>(
    connector: &C,
    cfg: &ClientSection,
    room: RoomId,
    mut intents: mpsc::Receiver<Intent>,
    ui: mpsc::Sender<UiEvent>,
) -> Result<Session> {
    let endpoint = cfg.ws_endpoint();
    let mut session = Session::new();
    let mut transport: Option<Box<dyn Transport>> = None;
    let mut view = View {
        state: session.state().clone(),
        rendered: 0,
    };

    session.open_room(room)?;
    let deadline = Instant::now() + cfg.connect_timeout();
    flush(&mut session, &mut transport, connector, &endpoint, &ui, &mut view).await;

    while !session.is_closed() {
        let connecting = session.state() == &ConnectionState::Connecting;

        tokio::select! {
            intent = intents.recv() => {
                match intent {
                    Some(intent) => {
                        if let Some(notice) = apply_intent(&mut session, intent) {
                            let _ = ui.send(UiEvent::Notice(notice)).await;
                        }
                    }
                    None => session.leave(),
                }
            }

            ev = next_event(&mut transport) => session.on_transport(ev),

            _ = tokio::time::sleep_until(deadline), if connecting => {
                session.on_transport(TransportEvent::Error("connect timeout".into()));
            }
        }

        flush(&mut session, &mut transport, connector, &endpoint, &ui, &mut view).await;
    }

    Ok(session)
}

fn apply_intent(session: &mut Session, intent: Intent) -> Option<Notice> {
    let res = match intent {
        Intent::SetName(name) => session.set_name(&name),
        Intent::Send(text) => {
            session.set_draft(text);
            session.send_draft()
        }
        Intent::Leave => {
            session.leave();
            Ok(())
        }
    };

    let err = res.err()?;
    match err.category() {
        ErrorCategory::Validation | ErrorCategory::State => Some(Notice::error(err.to_string())),
        category => {
            tracing::warn!(category = category.as_str(), err = %err, "intent failed");
            None
        }
    }
}

async fn next_event(transport: &mut Option<Box<dyn Transport>>) -> TransportEvent {
    match transport {
        Some(t) => t.recv().await.unwrap_or(TransportEvent::Closed),
        None => std::future::pending().await,
    }
}

async fn flush<C: Connector + ?Sized>(
    session: &mut Session,
    transport: &mut Option<Box<dyn Transport>>,
    connector: &C,
    endpoint: &str,
    ui: &mpsc::Sender<UiEvent>,
    view: &mut View,
) {
    // Executing an effect can feed the session a new event (failed send).
    loop {
        let effects = session.drain_effects();
        if effects.is_empty() {
            break;
        }
        for effect in effects {
            match effect {
                Effect::OpenTransport => {
                    tracing::debug!(%endpoint, "opening transport");
                    *transport = Some(connector.open(endpoint));
                }
                Effect::Send(frame) => {
                    let Some(t) = transport.as_mut() else { continue };
                    if let Err(e) = t.send(frame).await {
                        session.on_transport(TransportEvent::Error(e.to_string()));
                    }
                }
                Effect::CloseTransport => {
                    if let Some(mut t) = transport.take() {
                        t.close();
                    }
                }
                Effect::Notify(notice) => {
                    let _ = ui.send(UiEvent::Notice(notice)).await;
                }
            }
        }
    }

    if session.state() != &view.state {
        view.state = session.state().clone();
        let _ = ui.send(UiEvent::State(view.state.clone())).await;
    }

    let own = session.name().map(|n| n.as_str().to_owned());
    for entry in session.log().since(view.rendered) {
        let origin = entry.origin(own.as_deref());
        let _ = ui
            .send(UiEvent::Entry {
                entry: entry.clone(),
                origin,
            })
            .await;
    }
    view.rendered = session.log().len();
}
