//! Game session: state transitions, undo history and the stateful
//! [`Session`] wrapper front ends drive.
//!
//! The free functions ([`start_new_game`], [`apply_move`], [`undo`]) are pure:
//! they take the current state and history and hand back new values.
//! [`Session`] owns one of each plus the RNG and, optionally, a
//! [`Persistence`] that is written after every accepted transition.

use crate::board::{add_random_tile, are_boards_equal, Board};
use crate::direction::Direction;
use crate::persistence::{MemoryStore, Persistence, Store};
use crate::terminal::{can_move, has_winning_tile};
use crate::transform::move_board;
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of undo steps kept.
pub const HISTORY_LIMIT: usize = 10;

/// A full snapshot of the game as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub score: u32,
    pub is_game_over: bool,
    pub is_win: bool,
}

/// Where a session stands with respect to directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Won,
    Over,
}

impl GameState {
    /// A fresh game: two random tiles on an empty board, zero score.
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let board = add_random_tile(&add_random_tile(&Board::empty(), rng), rng);
        GameState {
            board,
            score: 0,
            is_game_over: false,
            is_win: false,
        }
    }

    /// `Won` wins over `Over` when both flags are set.
    pub fn status(&self) -> Status {
        if self.is_win {
            Status::Won
        } else if self.is_game_over {
            Status::Over
        } else {
            Status::Playing
        }
    }

    /// Directional input is not accepted in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status() != Status::Playing
    }
}

/// Board and score from before an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub board: Board,
    pub score: u32,
}

/// Undo history, oldest first, never longer than [`HISTORY_LIMIT`].
///
/// Serializes as a plain JSON array. Deserializing a longer array keeps
/// the newest entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History(VecDeque<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        History(VecDeque::with_capacity(HISTORY_LIMIT))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.0.back()
    }

    /// A copy with `entry` appended, evicting the oldest entry on overflow.
    pub fn pushed(&self, entry: HistoryEntry) -> History {
        let mut next = self.clone();
        next.0.push_back(entry);
        while next.0.len() > HISTORY_LIMIT {
            next.0.pop_front();
        }
        next
    }

    /// The newest entry and the history without it.
    pub fn popped(&self) -> Option<(HistoryEntry, History)> {
        let mut rest = self.clone();
        let entry = rest.0.pop_back()?;
        Some((entry, rest))
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        let skip = entries.len().saturating_sub(HISTORY_LIMIT);
        History(entries.into_iter().skip(skip).collect())
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.0.into_iter().collect()
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub state: GameState,
    pub history: History,
    /// Points earned from merges in this move.
    pub gained: u32,
}

/// Start a session: a fresh state and an empty history.
pub fn start_new_game<R: Rng + ?Sized>(rng: &mut R) -> (GameState, History) {
    (GameState::initial(rng), History::new())
}

/// Apply a move to `state`.
///
/// Returns `None` when the move leaves the board unchanged; nothing is
/// recorded in that case. Otherwise the pre-move board and score are pushed
/// to history, a random tile is spawned and both terminal flags are
/// evaluated on the resulting board.
///
/// Terminal states are not checked here; see [`Session::step`].
pub fn apply_move<R: Rng + ?Sized>(
    state: &GameState,
    history: &History,
    direction: Direction,
    rng: &mut R,
) -> Option<MoveOutcome> {
    let (moved, gained) = move_board(&state.board, direction);
    if are_boards_equal(&moved, &state.board) {
        return None;
    }

    let history = history.pushed(HistoryEntry {
        board: state.board,
        score: state.score,
    });
    let board = add_random_tile(&moved, rng);

    Some(MoveOutcome {
        state: GameState {
            board,
            score: state.score.saturating_add(gained),
            is_game_over: !can_move(&board),
            is_win: has_winning_tile(&board),
        },
        history,
        gained,
    })
}

/// Step back to the newest history entry.
///
/// The restored state is always playable: both terminal flags are cleared.
/// Returns `None` when there is nothing to undo.
pub fn undo(_state: &GameState, history: &History) -> Option<(GameState, History)> {
    let (entry, rest) = history.popped()?;
    let state = GameState {
        board: entry.board,
        score: entry.score,
        is_game_over: false,
        is_win: false,
    };
    Some((state, rest))
}

/// Result of executing a step (move) in a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the board changed (and a new tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub reward: u32,
    /// Whether no legal move remains.
    pub done: bool,
    /// Whether the winning tile is on the board.
    pub won: bool,
}

/// A running game: current state, undo history, RNG and optional storage.
pub struct Session<S: Store = MemoryStore> {
    state: GameState,
    history: History,
    rng: SmallRng,
    persistence: Option<Persistence<S>>,
}

impl Session<MemoryStore> {
    /// Create an unsaved session with the given seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (state, history) = start_new_game(&mut rng);
        Session {
            state,
            history,
            rng,
            persistence: None,
        }
    }
}

impl<S: Store> Session<S> {
    /// Create a session backed by `store`.
    ///
    /// A saved game is resumed when one loads; otherwise a fresh game is
    /// started with `seed`.
    pub fn with_persistence(seed: u64, store: S) -> Self {
        let persistence = Persistence::new(store);
        let saved = persistence.load();
        let mut rng = SmallRng::seed_from_u64(seed);
        let (state, history) = match saved.game_state {
            Some(state) => {
                debug!(
                    "Resumed saved game: score {}, {} undo step(s)",
                    state.score,
                    saved.history.len()
                );
                (state, saved.history)
            }
            None => start_new_game(&mut rng),
        };

        let mut session = Session {
            state,
            history,
            rng,
            persistence: Some(persistence),
        };
        session.save();
        session
    }

    /// Execute a move in the given direction.
    ///
    /// Input is ignored once the game is won or over, and a move that
    /// does not change the board is not committed.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        if self.state.is_terminal() {
            return self.result(false, 0);
        }

        match apply_move(&self.state, &self.history, direction, &mut self.rng) {
            Some(outcome) => {
                debug!(
                    "{} accepted: +{} points, status {:?}",
                    direction,
                    outcome.gained,
                    outcome.state.status()
                );
                self.state = outcome.state;
                self.history = outcome.history;
                self.save();
                self.result(true, outcome.gained)
            }
            None => self.result(false, 0),
        }
    }

    /// Undo the last accepted move. Returns false when history is empty.
    pub fn undo(&mut self) -> bool {
        match undo(&self.state, &self.history) {
            Some((state, history)) => {
                debug!("Undo: score back to {}", state.score);
                self.state = state;
                self.history = history;
                self.save();
                true
            }
            None => false,
        }
    }

    /// Abandon the current game and start over with an empty history.
    pub fn new_game(&mut self) {
        let (state, history) = start_new_game(&mut self.rng);
        self.state = state;
        self.history = history;
        if let Some(persistence) = self.persistence.as_mut() {
            if let Err(err) = persistence.clear() {
                warn!("Failed to clear saved game: {}", err);
            }
        }
        self.save();
        debug!("Started new game");
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn persistence(&self) -> Option<&Persistence<S>> {
        self.persistence.as_ref()
    }

    fn result(&self, changed: bool, reward: u32) -> StepResult {
        StepResult {
            changed,
            reward,
            done: self.state.is_game_over,
            won: self.state.is_win,
        }
    }

    fn save(&mut self) {
        if let Some(persistence) = self.persistence.as_mut() {
            if let Err(err) = persistence.save(&self.state, &self.history) {
                warn!("Failed to save game state: {}", err);
            }
        }
    }
}
