//! Saving and restoring a session through a string key-value store.
//!
//! The game state and the undo history live under two fixed keys as JSON,
//! in the same shape the browser build writes to `localStorage`. Loading
//! never fails: anything missing or unreadable means "no saved game".

use crate::session::{GameState, History};
use log::warn;
use std::collections::HashMap;
use std::io;

/// Key holding the serialized [`GameState`].
pub const STATE_KEY: &str = "2048-game-state";
/// Key holding the serialized [`History`].
pub const HISTORY_KEY: &str = "2048-history";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable string key-value store (a browser's `localStorage`, a save
/// directory, a map in memory).
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory [`Store`]; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved board holds a value that is not a tile")]
    InvalidBoard,
}

/// What [`Persistence::load`] found. `game_state` is `None` when there was
/// no usable save, in which case `history` is empty too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Saved {
    pub game_state: Option<GameState>,
    pub history: History,
}

/// Save/load/clear for one session over a [`Store`].
#[derive(Debug)]
pub struct Persistence<S: Store> {
    store: S,
}

impl<S: Store> Persistence<S> {
    pub fn new(store: S) -> Self {
        Persistence { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write both the state and the history.
    pub fn save(&mut self, state: &GameState, history: &History) -> Result<(), PersistError> {
        let state_json = serde_json::to_string(state)?;
        let history_json = serde_json::to_string(history)?;
        self.store.set(STATE_KEY, &state_json)?;
        self.store.set(HISTORY_KEY, &history_json)?;
        Ok(())
    }

    /// Read the saved session, treating any failure as "nothing saved".
    pub fn load(&self) -> Saved {
        match self.try_load() {
            Ok(saved) => saved,
            Err(err) => {
                warn!("Failed to load game state: {}", err);
                Saved::default()
            }
        }
    }

    /// Remove both keys.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.store.remove(STATE_KEY)?;
        self.store.remove(HISTORY_KEY)?;
        Ok(())
    }

    fn try_load(&self) -> Result<Saved, PersistError> {
        let game_state: GameState = match self.store.get(STATE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => return Ok(Saved::default()),
        };
        let history: History = match self.store.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => History::new(),
        };

        if !game_state.board.is_valid() || !history.iter().all(|e| e.board.is_valid()) {
            return Err(PersistError::InvalidBoard);
        }

        Ok(Saved {
            game_state: Some(game_state),
            history,
        })
    }
}
