//! # 2048 (until 128) WebAssembly Bindings
//!
//! This crate provides JavaScript-friendly bindings to the game engine
//! using wasm-bindgen. The session is saved to `window.localStorage` after
//! every change and resumed when the page is reloaded.

use game_128_core::{Direction, MemoryStore, Session, Status, Store, StoreError};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

/// Forwards `log` records at `warn` and above to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            _ => console::warn_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Storage behind the browser session: `localStorage` when the page may use
/// it, otherwise an in-memory map so the game stays playable.
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    /// Open `window.localStorage`, falling back to memory.
    pub fn open() -> Self {
        match local_storage() {
            Ok(storage) => BrowserStore::Local(storage),
            Err(err) => {
                log::warn!("localStorage unavailable, progress will not be saved: {}", err);
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Unavailable(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl Store for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).map_err(js_error),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(storage) => storage.set_item(key, value).map_err(js_error),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(storage) => storage.remove_item(key).map_err(js_error),
            BrowserStore::Memory(store) => store.remove(key),
        }
    }
}

/// Everything the page needs to render, serialized for JavaScript.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsSnapshot {
    /// The board as 4 rows of 4 tile values, 0 for empty.
    pub board: [[u32; 4]; 4],
    /// Current total score.
    pub score: u32,
    /// Points earned from the last move.
    pub reward: u32,
    /// Whether the last input changed the game.
    pub changed: bool,
    pub is_game_over: bool,
    pub is_win: bool,
    pub can_undo: bool,
    /// "Playing", "Won" or "Over".
    pub status: Status,
}

fn snapshot_of<S: Store>(session: &Session<S>, changed: bool, reward: u32) -> JsSnapshot {
    let state = session.state();
    JsSnapshot {
        board: *state.board.rows(),
        score: state.score,
        reward,
        changed,
        is_game_over: state.is_game_over,
        is_win: state.is_win,
        can_undo: session.can_undo(),
        status: state.status(),
    }
}

/// WebAssembly wrapper for a saved game session.
#[wasm_bindgen]
pub struct WasmGame {
    session: Session<BrowserStore>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Resume the saved game, or start a new one seeded with `seed`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmGame {
        WasmGame {
            session: Session::with_persistence(seed, BrowserStore::open()),
        }
    }

    /// Execute a move in the given direction.
    ///
    /// Action values:
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    ///
    /// Unknown values are ignored and return the current snapshot.
    pub fn step(&mut self, action: u8) -> JsValue {
        match Direction::from_u8(action) {
            Some(direction) => self.apply(direction),
            None => self.to_js(false, 0),
        }
    }

    /// Execute the move bound to a `KeyboardEvent.key` (the arrow keys).
    ///
    /// Other keys are ignored and return the current snapshot.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> JsValue {
        match Direction::from_key(key) {
            Some(direction) => self.apply(direction),
            None => self.to_js(false, 0),
        }
    }

    /// Undo the last move; a no-op when there is nothing to undo.
    pub fn undo(&mut self) -> JsValue {
        let changed = self.session.undo();
        self.to_js(changed, 0)
    }

    /// Throw away the current game and start a new one.
    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> JsValue {
        self.session.new_game();
        self.to_js(true, 0)
    }

    /// The current state without changing anything.
    pub fn snapshot(&self) -> JsValue {
        self.to_js(false, 0)
    }

    /// Get the current board as 16 values in row-major order.
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.session.board().to_vec()
    }

    /// Get the current score.
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.session.score()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.session.state().is_game_over
    }

    #[wasm_bindgen(js_name = isWin)]
    pub fn is_win(&self) -> bool {
        self.session.state().is_win
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    fn apply(&mut self, direction: Direction) -> JsValue {
        let result = self.session.step(direction);
        self.to_js(result.changed, result.reward)
    }

    fn to_js(&self, changed: bool, reward: u32) -> JsValue {
        serde_wasm_bindgen::to_value(&snapshot_of(&self.session, changed, reward))
            .unwrap_or(JsValue::NULL)
    }
}

/// Install the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already set when the module is started twice.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}
