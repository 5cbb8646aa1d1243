//! Slide-and-merge for a single line of four tiles.

use crate::board::BOARD_SIZE;

/// A single row or column, oriented so tiles compact toward index 0.
pub type Line = [u32; BOARD_SIZE];

/// Slide a line toward index 0 and merge adjacent equal tiles once.
///
/// Returns the new line and the points earned from merges.
///
/// Algorithm:
/// 1. Compress: move all non-zero values to the front
/// 2. Merge: combine adjacent equal values, left to right; a merged tile is
///    not compared again in the same pass
/// 3. Compress again
pub fn slide_and_merge_row(line: Line) -> (Line, u32) {
    let mut line = line;
    compress(&mut line);

    let mut gained = 0;
    for i in 0..BOARD_SIZE - 1 {
        if line[i] != 0 && line[i] == line[i + 1] {
            line[i] *= 2;
            gained += line[i];
            line[i + 1] = 0;
        }
    }

    compress(&mut line);
    (line, gained)
}

/// Compress a line by moving all non-zero values to the front.
fn compress(line: &mut Line) {
    let mut write_idx = 0;
    for read_idx in 0..BOARD_SIZE {
        if line[read_idx] != 0 {
            if write_idx != read_idx {
                line[write_idx] = line[read_idx];
                line[read_idx] = 0;
            }
            write_idx += 1;
        }
    }
}
