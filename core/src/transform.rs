//! Directional moves.
//!
//! Every direction is reduced to a left move: the board is rotated so the
//! target edge sits at column 0, each row goes through
//! [`slide_and_merge_row`], and the board is rotated back.

use crate::board::{Board, BOARD_SIZE};
use crate::direction::Direction;
use crate::row::slide_and_merge_row;

const LAST: usize = BOARD_SIZE - 1;

/// Rotate 90 degrees clockwise: `(i, j) -> (j, 3 - i)`.
pub fn rotate_clockwise(board: &Board) -> Board {
    let mut rotated = Board::empty();
    for (i, j, value) in board.cells() {
        rotated = rotated.with_tile(j, LAST - i, value);
    }
    rotated
}

/// Rotate 90 degrees counter-clockwise: `(i, j) -> (3 - j, i)`.
pub fn rotate_counter_clockwise(board: &Board) -> Board {
    let mut rotated = Board::empty();
    for (i, j, value) in board.cells() {
        rotated = rotated.with_tile(LAST - j, i, value);
    }
    rotated
}

fn unrotated(board: &Board) -> Board {
    *board
}

fn rotate_half_turn(board: &Board) -> Board {
    rotate_clockwise(&rotate_clockwise(board))
}

/// Slide every row toward column 0.
fn reduce_rows(board: &Board) -> (Board, u32) {
    let mut reduced = *board;
    let mut total = 0;
    for i in 0..BOARD_SIZE {
        let (line, gained) = slide_and_merge_row(board.row(i));
        reduced = reduced.with_row(i, line);
        total += gained;
    }
    (reduced, total)
}

/// Apply a move to a board, returning the new board and the merge points.
///
/// No tile is spawned; the input is left untouched.
pub fn move_board(board: &Board, direction: Direction) -> (Board, u32) {
    let (normalize, restore): (fn(&Board) -> Board, fn(&Board) -> Board) = match direction {
        Direction::Left => (unrotated, unrotated),
        Direction::Right => (rotate_half_turn, rotate_half_turn),
        Direction::Up => (rotate_counter_clockwise, rotate_clockwise),
        Direction::Down => (rotate_clockwise, rotate_counter_clockwise),
    };

    let (reduced, gained) = reduce_rows(&normalize(board));
    (restore(&reduced), gained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{add_random_tile, are_boards_equal};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn numbered() -> Board {
        Board::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]])
    }

    // -------------------------------------------------------------------------
    // Rotation
    // -------------------------------------------------------------------------

    #[test]
    fn test_rotate_clockwise() {
        let rotated = rotate_clockwise(&numbered());
        assert_eq!(
            rotated,
            Board::from_rows([[13, 9, 5, 1], [14, 10, 6, 2], [15, 11, 7, 3], [16, 12, 8, 4]])
        );
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let rotated = rotate_counter_clockwise(&numbered());
        assert_eq!(
            rotated,
            Board::from_rows([[4, 8, 12, 16], [3, 7, 11, 15], [2, 6, 10, 14], [1, 5, 9, 13]])
        );
    }

    #[test]
    fn test_rotations_are_inverse() {
        let board = numbered();
        assert_eq!(rotate_counter_clockwise(&rotate_clockwise(&board)), board);
        assert_eq!(rotate_clockwise(&rotate_counter_clockwise(&board)), board);
        let mut full_turn = board;
        for _ in 0..4 {
            full_turn = rotate_clockwise(&full_turn);
        }
        assert_eq!(full_turn, board);
    }

    // -------------------------------------------------------------------------
    // Move correctness
    // -------------------------------------------------------------------------

    fn horizontal_case() -> Board {
        Board::from_rows([[2, 2, 0, 0], [0, 4, 4, 0], [2, 0, 2, 0], [8, 8, 8, 8]])
    }

    fn vertical_case() -> Board {
        Board::from_rows([[2, 0, 2, 8], [2, 4, 0, 8], [0, 4, 2, 8], [0, 0, 0, 8]])
    }

    #[test]
    fn test_move_left() {
        let (board, gained) = move_board(&horizontal_case(), Direction::Left);
        assert_eq!(
            board,
            Board::from_rows([[4, 0, 0, 0], [8, 0, 0, 0], [4, 0, 0, 0], [16, 16, 0, 0]])
        );
        assert_eq!(gained, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_move_right() {
        let (board, gained) = move_board(&horizontal_case(), Direction::Right);
        assert_eq!(
            board,
            Board::from_rows([[0, 0, 0, 4], [0, 0, 0, 8], [0, 0, 0, 4], [0, 0, 16, 16]])
        );
        assert_eq!(gained, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_move_up() {
        let (board, gained) = move_board(&vertical_case(), Direction::Up);
        assert_eq!(
            board,
            Board::from_rows([[4, 8, 4, 16], [0, 0, 0, 16], [0, 0, 0, 0], [0, 0, 0, 0]])
        );
        assert_eq!(gained, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_move_down() {
        let (board, gained) = move_board(&vertical_case(), Direction::Down);
        assert_eq!(
            board,
            Board::from_rows([[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 16], [4, 8, 4, 16]])
        );
        assert_eq!(gained, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_right_merges_from_the_far_edge() {
        let board = Board::empty().with_row(0, [2, 2, 2, 0]);
        let (moved, gained) = move_board(&board, Direction::Right);
        assert_eq!(moved.row(0), [0, 0, 2, 4]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn test_move_does_not_mutate_input() {
        let board = horizontal_case();
        let _ = move_board(&board, Direction::Left);
        assert_eq!(board, horizontal_case());
    }

    #[test]
    fn test_blocked_move_is_noop() {
        let board = Board::from_rows([[2, 0, 0, 0], [4, 0, 0, 0], [8, 0, 0, 0], [16, 0, 0, 0]]);
        let (moved, gained) = move_board(&board, Direction::Left);
        assert!(are_boards_equal(&moved, &board));
        assert_eq!(gained, 0);
    }

    // -------------------------------------------------------------------------
    // Repetition reaches a fixed point
    // -------------------------------------------------------------------------

    #[test]
    fn test_repeated_moves_reach_fixed_point() {
        let mut rng = SmallRng::seed_from_u64(31337);
        for _ in 0..200 {
            let mut board = Board::empty();
            for _ in 0..10 {
                board = add_random_tile(&board, &mut rng);
            }
            for direction in Direction::all() {
                let mut current = board;
                let mut settled = false;
                // Each changing pass either slides or merges; a row can merge
                // at most three times, so a handful of passes always suffices.
                for _ in 0..8 {
                    let (next, _) = move_board(&current, direction);
                    if next == current {
                        settled = true;
                        break;
                    }
                    current = next;
                }
                assert!(settled, "no fixed point for {:?} on {:?}", direction, board);
                let (again, gained) = move_board(&current, direction);
                assert_eq!(again, current);
                assert_eq!(gained, 0);
            }
        }
    }
}
