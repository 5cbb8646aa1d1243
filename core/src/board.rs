//! Board primitives: construction, equality and random tile placement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the (always square) board.
pub const BOARD_SIZE: usize = 4;

/// Largest tile a 4x4 board can ever hold (2^17).
pub const MAX_TILE: u32 = 1 << 17;

/// Probability that a spawned tile is a 2 rather than a 4.
const SPAWN_TWO_PROBABILITY: f32 = 0.9;

/// A 4x4 grid of tile values stored row-major.
///
/// Empty cells are 0, tiles contain their value (2, 4, 8, ...). Serializes
/// as a JSON array of four rows, e.g. `[[2,0,0,0],[0,0,0,0],...]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([[u32; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    /// A board with every cell empty.
    pub fn empty() -> Self {
        Board([[0; BOARD_SIZE]; BOARD_SIZE])
    }

    pub fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Board(rows)
    }

    pub fn rows(&self) -> &[[u32; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    pub fn row(&self, row: usize) -> [u32; BOARD_SIZE] {
        self.0[row]
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    /// Return a copy of this board with `(row, col)` set to `value`.
    pub fn with_tile(mut self, row: usize, col: usize, value: u32) -> Self {
        self.0[row][col] = value;
        self
    }

    pub(crate) fn with_row(mut self, row: usize, values: [u32; BOARD_SIZE]) -> Self {
        self.0[row] = values;
        self
    }

    /// Iterate over `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.0.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| (i, j, value))
        })
    }

    /// Flatten into 16 values, row-major (what the browser renderer consumes).
    pub fn to_vec(&self) -> Vec<u32> {
        self.cells().map(|(_, _, value)| value).collect()
    }

    /// Get the number of empty cells on the board.
    pub fn empty_count(&self) -> usize {
        self.cells().filter(|&(_, _, value)| value == 0).count()
    }

    /// Get the maximum tile value on the board.
    pub fn max_tile(&self) -> u32 {
        self.cells().map(|(_, _, value)| value).max().unwrap_or(0)
    }

    /// True when every cell is 0 or a power of two between 2 and
    /// [`MAX_TILE`].
    ///
    /// Boards coming from outside the engine (saved games) are checked with
    /// this before being trusted.
    pub fn is_valid(&self) -> bool {
        self.cells().all(|(_, _, value)| {
            value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
        })
    }
}

/// Return a new board with one extra tile in a uniformly chosen empty cell.
///
/// The tile is a 2 with probability 0.9 and a 4 otherwise. A full board is
/// returned unchanged.
pub fn add_random_tile<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Board {
    let empty_cells: Vec<(usize, usize)> = board
        .cells()
        .filter(|&(_, _, value)| value == 0)
        .map(|(i, j, _)| (i, j))
        .collect();

    if empty_cells.is_empty() {
        return *board;
    }

    let (row, col) = empty_cells[rng.gen_range(0..empty_cells.len())];
    let value = if rng.gen::<f32>() < SPAWN_TWO_PROBABILITY { 2 } else { 4 };
    board.with_tile(row, col, value)
}

/// True iff every corresponding cell matches.
pub fn are_boards_equal(a: &Board, b: &Board) -> bool {
    a.cells().zip(b.cells()).all(|(x, y)| x.2 == y.2)
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in &self.0 {
            for &val in row {
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in &self.0 {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}
