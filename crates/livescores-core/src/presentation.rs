// Display summaries for game records and the connection status line.
//
// Pure functions: nothing here owns state or reorders games. The caller
// passes games already sorted by `GameStore::snapshot`.

use std::time::Duration;

use chrono::DateTime;

use crate::protocol::{ConnectionStatus, Envelope, Game, GameStatus};

/// Renderable view of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub id: String,
    /// e.g. `"Nyasa Big Bullets 2 - 0 Mighty Wanderers"`.
    pub scoreline: String,
    /// Uppercased status, e.g. `"ACTIVE"`.
    pub status_label: String,
    pub is_live: bool,
    /// One `"Name (Team) - 42'"` line per goal, in goal order.
    pub scorer_lines: Vec<String>,
    /// `HH:MM:SS` when the timestamp parses as RFC 3339, otherwise verbatim.
    pub updated: String,
    pub status: GameStatus,
}

/// Build the display summary for a single game.
pub fn summarize(game: &Game) -> GameSummary {
    GameSummary {
        id: game.id.clone(),
        scoreline: format!(
            "{} {} - {} {}",
            game.home_team, game.home_score, game.away_score, game.away_team
        ),
        status_label: game.status.as_str().to_uppercase(),
        is_live: game.status == GameStatus::Active,
        scorer_lines: game
            .scorers
            .iter()
            .map(|s| format!("{} ({}) - {}'", s.player_name, s.team, s.minute))
            .collect(),
        updated: format_last_update(&game.last_update),
        status: game.status,
    }
}

/// Summarize every game, preserving the input order exactly.
pub fn render_list(games: &[Game]) -> Vec<GameSummary> {
    games.iter().map(summarize).collect()
}

/// Format the advisory `lastUpdate` timestamp for display.
pub fn format_last_update(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One line for the running updates feed describing an applied envelope.
///
/// A snapshot reports how many games it carried; an update reports the game's
/// new scoreline and status, prefixed with its formatted `lastUpdate`.
pub fn feed_line(envelope: &Envelope) -> String {
    match envelope {
        Envelope::InitialGames(games) => match games.len() {
            1 => "Snapshot: 1 game".to_string(),
            n => format!("Snapshot: {n} games"),
        },
        Envelope::GameUpdate(game) => {
            let summary = summarize(game);
            let line = format!(
                "{}: {} [{}]",
                summary.id, summary.scoreline, summary.status_label
            );
            if summary.updated.is_empty() {
                line
            } else {
                format!("{} {}", summary.updated, line)
            }
        }
    }
}

/// Status line text for the connection.
pub fn status_label(status: ConnectionStatus, retry_delay: Duration) -> String {
    match status {
        ConnectionStatus::Idle => "Idle".to_string(),
        ConnectionStatus::Connecting => "Connecting...".to_string(),
        ConnectionStatus::Connected => "Connected".to_string(),
        ConnectionStatus::Disconnected => format!(
            "Disconnected. Retrying in {} seconds...",
            retry_delay.as_secs()
        ),
        ConnectionStatus::Error => "Error. Check server connection.".to_string(),
        ConnectionStatus::GaveUp => {
            "Error. Gave up reconnecting; press r to retry.".to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
