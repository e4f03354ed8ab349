// Messages exchanged between the app event loop and the TUI.

use livescores_core::protocol::{ConnectionStatus, Game};
use livescores_core::submit::MatchEvent;

/// Pushed from the app loop to the TUI render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full game list, already in display order.
    Games(Vec<Game>),
    ConnectionStatus(ConnectionStatus),
    Notification(Notification),
    /// One line for the updates feed, sent per applied envelope.
    Feed(String),
}

/// One-shot message shown in the footer (e.g. event submission outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub is_error: bool,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Notification {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notification {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Sent from the TUI to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Quit,
    /// Start the push connection if it is stopped.
    Connect,
    /// Stop the push connection and cancel any pending reconnect.
    Disconnect,
    /// Drop the current connection and open a fresh one.
    Reconnect,
    SubmitEvent(MatchEvent),
}
