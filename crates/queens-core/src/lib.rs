//! Core N-Queens engine.
//!
//! Everything here works purely in board coordinates (row, column). Pixel
//! geometry, input handling, and timers belong to the front-end; it drives
//! the board through the mutating operations and reads conflict state back
//! through [`all_conflicts`] and friends.

mod advisor;
mod conflict;
mod solver;

pub use advisor::{Hint, HintAdvisor, HintCategory};
pub use conflict::{
    all_conflicts, attacks, conflict_count, conflicts_for_queen, find_safe_square_for, is_solved,
    is_square_safe,
};
pub use solver::{Solution, Solver};

use serde::{Deserialize, Serialize};

/// Smallest playable board.
pub const MIN_SIZE: usize = 1;
/// Largest board the engine accepts. The solver's backtracking and the
/// advisor's whole-board probes stay interactive up to this size.
pub const MAX_SIZE: usize = 25;
/// Classic 8x8 board.
pub const DEFAULT_SIZE: usize = 8;

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A queen on the board. Queens carry no state beyond their square; identity
/// is their slot in the board's placement-ordered list, which survives moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queen {
    pub pos: Position,
}

impl Queen {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            pos: Position::new(row, col),
        }
    }

    pub fn row(&self) -> usize {
        self.pos.row
    }

    pub fn col(&self) -> usize {
        self.pos.col
    }
}

/// Errors from board operations and the solver.
///
/// Every mutating operation is all-or-nothing: on `Err` the board is exactly
/// as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardError {
    /// Requested size outside `[MIN_SIZE, MAX_SIZE]`.
    InvalidSize { size: usize },
    /// Coordinate outside `[0, size)`.
    OutOfBounds { row: usize, col: usize },
    /// Destination square already holds a different queen.
    SquareOccupied { row: usize, col: usize },
    /// Move requested from an empty square.
    NoQueenAtSource { row: usize, col: usize },
    /// The solver exhausted the search space. Only sizes 2 and 3.
    Unsolvable { size: usize },
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::InvalidSize { size } => {
                write!(f, "invalid board size {} (allowed {}..={})", size, MIN_SIZE, MAX_SIZE)
            }
            BoardError::OutOfBounds { row, col } => {
                write!(f, "square ({}, {}) is off the board", row, col)
            }
            BoardError::SquareOccupied { row, col } => {
                write!(f, "square ({}, {}) already holds a queen", row, col)
            }
            BoardError::NoQueenAtSource { row, col } => {
                write!(f, "no queen at ({}, {})", row, col)
            }
            BoardError::Unsolvable { size } => {
                write!(f, "no solution exists for a {0}x{0} board", size)
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// The board: a fixed size and the queens placed on it, in placement order.
///
/// Invariants, enforced by every mutating operation:
/// - every queen's row and column lie in `[0, size)`;
/// - no two queens occupy the same square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    queens: Vec<Queen>,
}

impl Board {
    /// Create an empty board. Fails with `InvalidSize` outside
    /// `[MIN_SIZE, MAX_SIZE]`.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize { size });
        }
        Ok(Self {
            size,
            queens: Vec::with_capacity(size),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of queens currently placed.
    pub fn count(&self) -> usize {
        self.queens.len()
    }

    /// Read-only view of the queens in placement order.
    pub fn queens(&self) -> &[Queen] {
        &self.queens
    }

    /// Start a new session at a different size. Clears all queens.
    pub fn resize(&mut self, new_size: usize) -> Result<(), BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&new_size) {
            return Err(BoardError::InvalidSize { size: new_size });
        }
        self.size = new_size;
        self.queens.clear();
        Ok(())
    }

    /// Remove every queen, keeping the size.
    pub fn clear(&mut self) {
        self.queens.clear();
    }

    /// Place a new queen at (row, col).
    pub fn place(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        self.check_bounds(row, col)?;
        if self.index_at(row, col).is_some() {
            return Err(BoardError::SquareOccupied { row, col });
        }
        self.queens.push(Queen::new(row, col));
        Ok(())
    }

    /// Relocate the queen at the source square to the destination square.
    /// The queen keeps its identity (same slot in placement order).
    /// Moving a queen onto its own square is a no-op.
    pub fn move_queen(
        &mut self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Result<(), BoardError> {
        self.check_bounds(to_row, to_col)?;
        let idx = self.index_at(from_row, from_col).ok_or(BoardError::NoQueenAtSource {
            row: from_row,
            col: from_col,
        })?;
        if let Some(other) = self.index_at(to_row, to_col) {
            if other == idx {
                return Ok(());
            }
            return Err(BoardError::SquareOccupied {
                row: to_row,
                col: to_col,
            });
        }
        self.queens[idx].pos = Position::new(to_row, to_col);
        Ok(())
    }

    /// Delete the queen at (row, col) if one is there. Returns whether a
    /// queen was removed.
    pub fn remove(&mut self, row: usize, col: usize) -> bool {
        match self.index_at(row, col) {
            Some(idx) => {
                self.queens.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Look up the queen at (row, col).
    pub fn occupied_by(&self, row: usize, col: usize) -> Option<&Queen> {
        self.index_at(row, col).map(|i| &self.queens[i])
    }

    /// Whether (row, col) lies on this board.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    pub(crate) fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        self.queens
            .iter()
            .position(|q| q.row() == row && q.col() == col)
    }

    /// Reposition a queen without occupancy checks. Probe-only: callers must
    /// have verified the destination is free.
    pub(crate) fn set_queen_pos(&mut self, idx: usize, pos: Position) {
        self.queens[idx].pos = pos;
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), BoardError> {
        if self.in_bounds(row, col) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds { row, col })
        }
    }
}
