// Push-stream wire protocol: game records and the envelopes that carry them.
//
// Every text frame from the score server is one JSON envelope:
//
//   { "type": "initialGames", "data": [Game, ...] }
//   { "type": "gameUpdate",   "data": Game }
//
// Decoding is strict: anything that does not match these shapes is rejected
// with a `DecodeError` and dropped by the connection manager.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Game records
// ---------------------------------------------------------------------------

/// A single goal attached to a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorer {
    pub player_name: String,
    pub team: String,
    /// Match minute of the goal. Stoppage time can push this past 90.
    pub minute: u32,
}

/// Lifecycle status of a game as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Pending,
    Active,
    Finished,
}

impl GameStatus {
    /// Wire name of the status (`"pending"`, `"active"`, `"finished"`).
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Pending => "pending",
            GameStatus::Active => "active",
            GameStatus::Finished => "finished",
        }
    }

    /// Display rank: live games first, then upcoming, then completed.
    pub fn sort_rank(self) -> u8 {
        match self {
            GameStatus::Active => 1,
            GameStatus::Pending => 2,
            GameStatus::Finished => 3,
        }
    }
}

/// A game record. Scores and status are taken from the server verbatim and
/// are never recomputed from `scorers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    /// Goals in the order they were scored.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scorers: Vec<Scorer>,
    pub status: GameStatus,
    /// Server timestamp of the last change. Display only.
    pub last_update: String,
}

/// Accept `"scorers": null` as an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Scorer>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Scorer>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A classified push-stream message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Envelope {
    /// Full snapshot of every game the server knows about.
    InitialGames(Vec<Game>),
    /// A single new or changed game.
    GameUpdate(Game),
}

impl Envelope {
    /// Wire name of the envelope kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::InitialGames(_) => "initialGames",
            Envelope::GameUpdate(_) => "gameUpdate",
        }
    }

    fn games(&self) -> &[Game] {
        match self {
            Envelope::InitialGames(games) => games,
            Envelope::GameUpdate(game) => std::slice::from_ref(game),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection status
// ---------------------------------------------------------------------------

/// Observable state of the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Not started, or stopped explicitly.
    #[default]
    Idle,
    Connecting,
    Connected,
    /// Connection lost; a reconnect is scheduled.
    Disconnected,
    /// Transport reported an error. Followed by `Disconnected` unless the
    /// retry budget is exhausted.
    Error,
    /// The retry budget is exhausted and no further attempt is scheduled.
    /// Only an explicit start leaves this state.
    GaveUp,
}

impl ConnectionStatus {
    /// No supervisor is running: nothing will happen until the next start.
    pub fn is_stopped(self) -> bool {
        matches!(self, ConnectionStatus::Idle | ConnectionStatus::GaveUp)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("game has an empty id")]
    EmptyGameId,

    #[error("game `{game_id}` has a scorer with an empty player name")]
    EmptyScorerName { game_id: String },
}

/// Decode one text frame into an [`Envelope`].
///
/// Unknown `type` values, missing fields, negative numbers and empty
/// identifiers or scorer names are all rejected; a record only reaches the
/// game store in fully valid form.
pub fn decode_frame(text: &str) -> Result<Envelope, DecodeError> {
    let envelope: Envelope = serde_json::from_str(text)?;

    for game in envelope.games() {
        if game.id.is_empty() {
            return Err(DecodeError::EmptyGameId);
        }
        if game.scorers.iter().any(|s| s.player_name.is_empty()) {
            return Err(DecodeError::EmptyScorerName {
                game_id: game.id.clone(),
            });
        }
    }

    Ok(envelope)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_JSON: &str = r#"{
        "id": "game3",
        "homeTeam": "Blue Eagles",
        "awayTeam": "Ekwendeni Hammers",
        "homeScore": 1,
        "awayScore": 0,
        "scorers": [{"playerName": "Chikondi Banda", "team": "Blue Eagles", "minute": 25}],
        "status": "active",
        "lastUpdate": "2024-06-01T15:04:05Z"
    }"#;

    #[test]
    fn decodes_game_update() {
        let frame = format!(r#"{{"type":"gameUpdate","data":{GAME_JSON}}}"#);
        let envelope = decode_frame(&frame).unwrap();
        match envelope {
            Envelope::GameUpdate(game) => {
                assert_eq!(game.id, "game3");
                assert_eq!(game.home_team, "Blue Eagles");
                assert_eq!(game.home_score, 1);
                assert_eq!(game.status, GameStatus::Active);
                assert_eq!(game.scorers.len(), 1);
                assert_eq!(game.scorers[0].player_name, "Chikondi Banda");
                assert_eq!(game.scorers[0].minute, 25);
                assert_eq!(game.last_update, "2024-06-01T15:04:05Z");
            }
            other => panic!("expected GameUpdate, got {other:?}"),
        }
    }

    #[test]
    fn decodes_initial_games() {
        let frame = format!(r#"{{"type":"initialGames","data":[{GAME_JSON},{GAME_JSON}]}}"#);
        let envelope = decode_frame(&frame).unwrap();
        assert_eq!(envelope.kind(), "initialGames");
        match envelope {
            Envelope::InitialGames(games) => assert_eq!(games.len(), 2),
            other => panic!("expected InitialGames, got {other:?}"),
        }
    }

    #[test]
    fn decodes_empty_initial_games() {
        let envelope = decode_frame(r#"{"type":"initialGames","data":[]}"#).unwrap();
        assert_eq!(envelope, Envelope::InitialGames(vec![]));
    }

    #[test]
    fn null_scorers_decode_as_empty() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A","awayTeam":"B",
            "homeScore":0,"awayScore":0,"scorers":null,"status":"pending","lastUpdate":""}}"#;
        match decode_frame(frame).unwrap() {
            Envelope::GameUpdate(game) => assert!(game.scorers.is_empty()),
            other => panic!("expected GameUpdate, got {other:?}"),
        }
    }

    #[test]
    fn stoppage_time_minute_is_accepted() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A","awayTeam":"B",
            "homeScore":1,"awayScore":0,"scorers":[{"playerName":"X","team":"A","minute":94}],
            "status":"active","lastUpdate":""}}"#;
        match decode_frame(frame).unwrap() {
            Envelope::GameUpdate(game) => assert_eq!(game.scorers[0].minute, 94),
            other => panic!("expected GameUpdate, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = decode_frame(r#"{"type":"unknown","data":{}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(decode_frame("not json").is_err());
        assert!(decode_frame("").is_err());
    }

    #[test]
    fn mismatched_payload_shape_is_rejected() {
        // gameUpdate must carry a single object, not an array.
        let frame = format!(r#"{{"type":"gameUpdate","data":[{GAME_JSON}]}}"#);
        assert!(decode_frame(&frame).is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A","awayTeam":"B",
            "homeScore":0,"awayScore":0,"scorers":[],"status":"halftime","lastUpdate":""}}"#;
        assert!(decode_frame(frame).is_err());
    }

    #[test]
    fn negative_score_is_rejected() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A","awayTeam":"B",
            "homeScore":-1,"awayScore":0,"scorers":[],"status":"active","lastUpdate":""}}"#;
        assert!(decode_frame(frame).is_err());
    }

    #[test]
    fn missing_field_is_rejected() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A",
            "homeScore":0,"awayScore":0,"scorers":[],"status":"active","lastUpdate":""}}"#;
        assert!(decode_frame(frame).is_err());
    }

    #[test]
    fn empty_scorer_name_is_rejected() {
        let frame = r#"{"type":"gameUpdate","data":{"id":"g1","homeTeam":"A","awayTeam":"B",
            "homeScore":1,"awayScore":0,"scorers":[{"playerName":"","team":"A","minute":3}],
            "status":"active","lastUpdate":""}}"#;
        match decode_frame(frame).unwrap_err() {
            DecodeError::EmptyScorerName { game_id } => assert_eq!(game_id, "g1"),
            other => panic!("expected EmptyScorerName, got {other}"),
        }
    }

    #[test]
    fn empty_game_id_is_rejected() {
        let frame = r#"{"type":"initialGames","data":[{"id":"","homeTeam":"A","awayTeam":"B",
            "homeScore":0,"awayScore":0,"scorers":[],"status":"pending","lastUpdate":""}]}"#;
        assert!(matches!(
            decode_frame(frame).unwrap_err(),
            DecodeError::EmptyGameId
        ));
    }

    #[test]
    fn encoded_envelope_uses_wire_names() {
        let game = Game {
            id: "g1".into(),
            home_team: "A".into(),
            away_team: "B".into(),
            home_score: 0,
            away_score: 0,
            scorers: vec![],
            status: GameStatus::Pending,
            last_update: String::new(),
        };
        let json = serde_json::to_value(Envelope::GameUpdate(game)).unwrap();
        assert_eq!(json["type"], "gameUpdate");
        assert_eq!(json["data"]["homeTeam"], "A");
        assert_eq!(json["data"]["status"], "pending");
    }

    #[test]
    fn status_rank_orders_active_pending_finished() {
        assert!(GameStatus::Active.sort_rank() < GameStatus::Pending.sort_rank());
        assert!(GameStatus::Pending.sort_rank() < GameStatus::Finished.sort_rank());
    }

    #[test]
    fn only_idle_and_gave_up_are_stopped() {
        assert!(ConnectionStatus::Idle.is_stopped());
        assert!(ConnectionStatus::GaveUp.is_stopped());
        for status in [
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Disconnected,
            ConnectionStatus::Error,
        ] {
            assert!(!status.is_stopped(), "{status:?}");
        }
    }
}
