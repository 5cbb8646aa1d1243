//! # 2048 (until 128) Core Engine
//!
//! A pure Rust implementation of the board logic for a 2048 variant that is
//! won by building a single 128 tile. Moves are pure functions from a board
//! and a direction to a new board and a score gain; sessions add undo
//! history, seedable tile spawning and optional persistence through a
//! pluggable key-value [`Store`].
//!
//! ## Example
//!
//! ```rust
//! use game_128_core::{Direction, Session};
//!
//! let mut session = Session::new(42);  // Create game with seed 42
//! let result = session.step(Direction::Left);
//! println!("Score: {}, Changed: {}", session.score(), result.changed);
//! ```

pub mod board;
pub mod direction;
pub mod persistence;
pub mod row;
pub mod session;
pub mod terminal;
pub mod transform;

pub use board::{add_random_tile, are_boards_equal, Board, BOARD_SIZE, MAX_TILE};
pub use direction::{Direction, ParseDirectionError};
pub use persistence::{
    MemoryStore, PersistError, Persistence, Saved, Store, StoreError, HISTORY_KEY, STATE_KEY,
};
pub use row::slide_and_merge_row;
pub use session::{
    apply_move, start_new_game, undo, GameState, History, HistoryEntry, MoveOutcome, Session,
    Status, StepResult, HISTORY_LIMIT,
};
pub use terminal::{can_move, has_winning_tile, WIN_TILE};
pub use transform::{move_board, rotate_clockwise, rotate_counter_clockwise};
