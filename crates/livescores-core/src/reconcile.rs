// Game store: the authoritative in-memory collection of games.
//
// Envelopes are applied as either a full replace (`initialGames`) or an
// upsert keyed by game id (`gameUpdate`). Storage order is first-seen order;
// display order is derived on demand by `snapshot`.

use tracing::debug;

use crate::protocol::{Envelope, Game};

/// The reconciled set of games, at most one per id.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    games: Vec<Game>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an envelope, dispatching on its kind.
    pub fn apply(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::InitialGames(games) => self.apply_initial(games),
            Envelope::GameUpdate(game) => self.apply_update(game),
        }
    }

    /// Replace the whole collection with `games`.
    ///
    /// Duplicate ids in the input collapse to one record: the last
    /// occurrence's value, kept at the position of the first occurrence.
    pub fn apply_initial(&mut self, games: Vec<Game>) {
        let received = games.len();
        self.games.clear();
        for game in games {
            self.apply_update(game);
        }
        if self.games.len() != received {
            debug!(
                "Initial snapshot had {} duplicate game id(s)",
                received - self.games.len()
            );
        }
    }

    /// Insert `game`, or replace the stored game with the same id in place.
    ///
    /// An id that has never been seen is a valid insert: the server decides
    /// which games exist.
    pub fn apply_update(&mut self, game: Game) {
        match self.games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game,
            None => self.games.push(game),
        }
    }

    /// All games ordered active, pending, finished. Games with equal status
    /// keep first-seen order, so repeated calls return the same order.
    pub fn snapshot(&self) -> Vec<Game> {
        let mut games = self.games.clone();
        games.sort_by_key(|g| g.status.sort_rank());
        games
    }

    pub fn get(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Drop every game (a new session starts from empty).
    pub fn clear(&mut self) {
        self.games.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
