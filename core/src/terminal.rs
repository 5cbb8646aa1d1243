//! Win and game-over detection.

use crate::board::{Board, BOARD_SIZE};

/// The tile that wins this variant of the game.
pub const WIN_TILE: u32 = 128;

/// Check if any move can still change the board.
///
/// True when a cell is empty or some cell equals its right or lower
/// neighbour. Adjacency is symmetric, so left/up never need checking.
pub fn can_move(board: &Board) -> bool {
    if board.empty_count() > 0 {
        return true;
    }

    for i in 0..BOARD_SIZE {
        for j in 0..BOARD_SIZE {
            let current = board.get(i, j);
            if j + 1 < BOARD_SIZE && board.get(i, j + 1) == current {
                return true;
            }
            if i + 1 < BOARD_SIZE && board.get(i + 1, j) == current {
                return true;
            }
        }
    }

    false
}

/// True iff some cell is exactly [`WIN_TILE`]. Larger tiles do not count.
pub fn has_winning_tile(board: &Board) -> bool {
    board.cells().any(|(_, _, value)| value == WIN_TILE)
}
