// Application state and orchestration logic.
//
// The central event loop: consumes push-connection events and user commands,
// owns the game store, and pushes UI updates to the TUI render loop. The
// game store is only ever written from this task.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use livescores_core::config::Config;
use livescores_core::connection::{ConnectionEvent, ConnectionEventKind, ConnectionManager};
use livescores_core::presentation::feed_line;
use livescores_core::protocol::ConnectionStatus;
use livescores_core::reconcile::GameStore;
use livescores_core::submit::{EventClient, MatchEvent, SubmitError};

use crate::messages::{Notification, UiUpdate, UserCommand};

/// Outcome of a spawned event submission.
type SubmitOutcome = Result<MatchEvent, SubmitError>;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: GameStore,
    pub connection: ConnectionManager,
    /// Last status reported by the current connection session.
    pub connection_status: ConnectionStatus,
    pub event_client: EventClient,
}

impl AppState {
    pub fn new(config: Config, connection: ConnectionManager, event_client: EventClient) -> Self {
        AppState {
            config,
            store: GameStore::new(),
            connection,
            connection_status: ConnectionStatus::Idle,
            event_client,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Starts the push connection, then listens with `tokio::select!` on:
/// 1. Connection events (status transitions and decoded envelopes)
/// 2. User commands from the TUI
/// 3. Results of spawned event submissions
///
/// Stops the connection before returning.
pub async fn run(
    mut conn_rx: mpsc::Receiver<ConnectionEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let (submit_tx, mut submit_rx) = mpsc::channel::<SubmitOutcome>(16);

    state.connection.start();

    loop {
        tokio::select! {
            event = conn_rx.recv() => {
                match event {
                    Some(event) => handle_connection_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("Connection event channel closed, shutting down");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx, &submit_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(outcome) = submit_rx.recv() => {
                handle_submit_outcome(outcome, &ui_tx).await;
            }
        }
    }

    state.connection.stop();
    info!("Application event loop exiting");
    Ok(())
}

/// Apply one connection event. Events from a stopped or replaced session are
/// discarded.
pub async fn handle_connection_event(
    state: &mut AppState,
    event: ConnectionEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if !state.connection.is_current(event.generation) {
        debug!("Discarding event from stale session {}", event.generation);
        return;
    }

    match event.kind {
        ConnectionEventKind::Status(status) => {
            if status == ConnectionStatus::Connected && !state.store.is_empty() {
                // A new session starts from empty until the server resends
                // its snapshot.
                state.store.clear();
                let _ = ui_tx.send(UiUpdate::Games(Vec::new())).await;
            }
            if status != state.connection_status {
                info!("Connection status: {:?} -> {:?}", state.connection_status, status);
            }
            state.connection_status = status;
            let _ = ui_tx.send(UiUpdate::ConnectionStatus(status)).await;
        }
        ConnectionEventKind::Envelope(envelope) => {
            debug!("Applying {} envelope", envelope.kind());
            let line = feed_line(&envelope);
            state.store.apply(envelope);
            let _ = ui_tx.send(UiUpdate::Games(state.store.snapshot())).await;
            let _ = ui_tx.send(UiUpdate::Feed(line)).await;
        }
    }
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
    submit_tx: &mpsc::Sender<SubmitOutcome>,
) {
    match cmd {
        UserCommand::Connect => {
            info!("Connect requested");
            state.connection.start();
        }
        UserCommand::Disconnect => {
            info!("Disconnect requested");
            state.connection.stop();
            state.connection_status = ConnectionStatus::Idle;
            let _ = ui_tx
                .send(UiUpdate::ConnectionStatus(ConnectionStatus::Idle))
                .await;
        }
        UserCommand::Reconnect => {
            info!("Reconnect requested");
            state.connection.stop();
            state.connection.start();
        }
        UserCommand::SubmitEvent(event) => {
            let client = state.event_client.clone();
            let tx = submit_tx.clone();
            tokio::spawn(async move {
                let outcome = client.submit(&event).await.map(|_| event);
                let _ = tx.send(outcome).await;
            });
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn handle_submit_outcome(outcome: SubmitOutcome, ui_tx: &mpsc::Sender<UiUpdate>) {
    let notification = match outcome {
        Ok(_) => Notification::info("Event sent successfully!"),
        Err(e) => {
            warn!("Error sending event: {}", e);
            Notification::error("Failed to send event.")
        }
    };
    let _ = ui_tx.send(UiUpdate::Notification(notification)).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
