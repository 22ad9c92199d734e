//! Backtracking solver.
//!
//! Produces the canonical solution for a given size: depth-first over rows,
//! trying columns in ascending order, stopping at the first complete
//! assignment. The output is therefore deterministic per size.

use crate::{Board, BoardError, Position, MAX_SIZE, MIN_SIZE};
use serde::{Deserialize, Serialize};

/// A complete non-attacking placement, one queen per row in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution(Vec<Position>);

impl Solution {
    /// The placements, ordered by row.
    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replay this solution onto a board of matching size. Clears the board
    /// first so the occupancy invariant cannot trip.
    pub fn apply_to(&self, board: &mut Board) -> Result<(), BoardError> {
        if board.size() != self.len() {
            return Err(BoardError::InvalidSize { size: board.size() });
        }
        board.clear();
        for pos in &self.0 {
            board.place(pos.row, pos.col)?;
        }
        Ok(())
    }
}

/// Unit struct solver. Stateless; `solve` is a pure function of `size`.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Find the canonical solution for an `size` x `size` board.
    ///
    /// Returns `Unsolvable` only for sizes 2 and 3; every other size in
    /// range has a solution. `InvalidSize` for sizes outside
    /// `[MIN_SIZE, MAX_SIZE]`.
    pub fn solve(&self, size: usize) -> Result<Solution, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize { size });
        }
        // col_of_row[r] holds the column assigned to row r; the vec length
        // is the number of assigned rows.
        let mut col_of_row: Vec<usize> = Vec::with_capacity(size);
        if place_row(&mut col_of_row, size) {
            let positions = col_of_row
                .iter()
                .enumerate()
                .map(|(row, &col)| Position::new(row, col))
                .collect();
            Ok(Solution(positions))
        } else {
            Err(BoardError::Unsolvable { size })
        }
    }
}

/// Try to complete the assignment from the current row down. Columns are
/// tried strictly left to right; the first full assignment wins.
fn place_row(col_of_row: &mut Vec<usize>, size: usize) -> bool {
    let row = col_of_row.len();
    if row == size {
        return true;
    }
    for col in 0..size {
        if column_ok(col_of_row, row, col) {
            col_of_row.push(col);
            if place_row(col_of_row, size) {
                return true;
            }
            col_of_row.pop();
        }
    }
    false
}

/// A column is acceptable for `row` if it shares no column or diagonal with
/// any already-assigned row.
fn column_ok(col_of_row: &[usize], row: usize, col: usize) -> bool {
    col_of_row
        .iter()
        .enumerate()
        .all(|(r, &c)| c != col && r.abs_diff(row) != c.abs_diff(col))
}
