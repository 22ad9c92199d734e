//! Conflict detection.
//!
//! Pure functions over a [`Board`] snapshot. Nothing here is cached; with at
//! most `MAX_SIZE` queens the all-pairs scan is cheap enough to recompute on
//! every call.

use crate::{Board, Position, Queen};

/// Whether two queens attack each other: same row, same column, or same
/// diagonal. Queens on the same square never coexist (board invariant), so
/// position equality doubles as the identity check.
pub fn attacks(a: &Queen, b: &Queen) -> bool {
    if a.pos == b.pos {
        return false;
    }
    a.row() == b.row()
        || a.col() == b.col()
        || a.row().abs_diff(b.row()) == a.col().abs_diff(b.col())
}

/// Every attacking pair, as `(i, j)` indices into `board.queens()` with
/// `i < j`. Unordered pairs appear once.
pub fn all_conflicts(board: &Board) -> Vec<(usize, usize)> {
    let queens = board.queens();
    let mut pairs = Vec::new();
    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if attacks(&queens[i], &queens[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Total number of attacking pairs on the board.
pub fn conflict_count(board: &Board) -> usize {
    all_conflicts(board).len()
}

/// How many other queens attack the queen at index `idx`.
pub fn conflicts_for_queen(board: &Board, idx: usize) -> usize {
    let queens = board.queens();
    queens
        .iter()
        .enumerate()
        .filter(|&(i, q)| i != idx && attacks(q, &queens[idx]))
        .count()
}

/// The single win condition: all `size` queens placed and none attacking.
pub fn is_solved(board: &Board) -> bool {
    board.count() == board.size() && conflict_count(board) == 0
}

/// Whether the hypothetical square (row, col) is attacked by no queen other
/// than the one at `ignore` (if any). The square need not hold a queen.
pub fn is_square_safe(board: &Board, ignore: Option<usize>, row: usize, col: usize) -> bool {
    let probe = Queen::new(row, col);
    board
        .queens()
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != ignore)
        .all(|(_, q)| !attacks(q, &probe))
}

/// First square, scanning rows top to bottom and columns left to right, that
/// is safe for the queen at `idx` and is not its current square. The fixed
/// scan order keeps hint output deterministic for a given board state.
pub fn find_safe_square_for(board: &Board, idx: usize) -> Option<Position> {
    let current = board.queens()[idx].pos;
    for row in 0..board.size() {
        for col in 0..board.size() {
            let pos = Position::new(row, col);
            if pos != current && is_square_safe(board, Some(idx), row, col) {
                return Some(pos);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    fn board_with(size: usize, squares: &[(usize, usize)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(r, c) in squares {
            board.place(r, c).unwrap();
        }
        board
    }

    #[test]
    fn test_attacks_pairs() {
        // Diagonal
        assert!(attacks(&Queen::new(0, 0), &Queen::new(1, 1)));
        // Same row
        assert!(attacks(&Queen::new(2, 3), &Queen::new(2, 7)));
        // Same column
        assert!(attacks(&Queen::new(0, 0), &Queen::new(5, 0)));
        // Knight's move apart: no attack
        assert!(!attacks(&Queen::new(0, 0), &Queen::new(1, 2)));
        // A queen does not attack itself
        assert!(!attacks(&Queen::new(4, 4), &Queen::new(4, 4)));
    }

    #[test]
    fn test_all_conflicts_unordered_once() {
        let board = board_with(8, &[(0, 0), (1, 1), (7, 0)]);
        // (0,0)-(1,1) diagonal, (0,0)-(7,0) column
        let pairs = all_conflicts(&board);
        assert_eq!(pairs, vec![(0, 1), (0, 2)]);
        assert_eq!(conflict_count(&board), 2);
    }

    #[test]
    fn test_conflicts_for_queen() {
        let board = board_with(8, &[(0, 0), (1, 1), (7, 0)]);
        assert_eq!(conflicts_for_queen(&board, 0), 2);
        assert_eq!(conflicts_for_queen(&board, 1), 1);
        assert_eq!(conflicts_for_queen(&board, 2), 1);
    }

    #[test]
    fn test_is_solved() {
        // Complete non-attacking 4x4 arrangement
        let board = board_with(4, &[(0, 1), (1, 3), (2, 0), (3, 2)]);
        assert!(is_solved(&board));

        // Right count, one conflict
        let board = board_with(4, &[(0, 0), (1, 3), (2, 0), (3, 2)]);
        assert!(!is_solved(&board));

        // No conflicts but incomplete
        let board = board_with(4, &[(0, 1), (1, 3)]);
        assert!(!is_solved(&board));
    }

    #[test]
    fn test_is_square_safe_ignores_queen() {
        let board = board_with(8, &[(0, 0)]);
        // (0, 5) shares a row with the queen
        assert!(!is_square_safe(&board, None, 0, 5));
        // unless that queen is ignored
        assert!(is_square_safe(&board, Some(0), 0, 5));
        // (1, 2) is attacked by nothing
        assert!(is_square_safe(&board, None, 1, 2));
    }

    #[test]
    fn test_find_safe_square_row_major_order() {
        // Queens at (2, 0) and (2, 1) conflict on row 2. For queen 0 the
        // scan must return the lowest-row, then lowest-col safe square.
        let board = board_with(6, &[(2, 0), (2, 1)]);
        let safe = find_safe_square_for(&board, 0).unwrap();
        // Row 0: (0,0) col-attacked by neither? queen 1 at (2,1) attacks
        // (0,1) by column and (0,3) by diagonal; queen 0 is ignored.
        // (0,0) is attacked by nothing else, so it wins.
        assert_eq!(safe, Position::new(0, 0));

        // Lower row wins over lower column. For queen 0 at (2, 2), both
        // (0, 5) and (1, 2) are safe, but (0, 0)..(0, 4) are each covered:
        // (2, 0) takes (0, 0) by column and (0, 2) by diagonal, (5, 1)
        // takes (0, 1), (4, 3) takes (0, 3), (4, 4) takes (0, 4).
        let board = board_with(6, &[(2, 2), (2, 0), (5, 1), (4, 3), (4, 4)]);
        assert!(is_square_safe(&board, Some(0), 1, 2));
        assert_eq!(find_safe_square_for(&board, 0), Some(Position::new(0, 5)));
    }

    #[test]
    fn test_find_safe_square_exhausted() {
        // 1x1 board: the only square is the queen's own
        let board = board_with(1, &[(0, 0)]);
        assert_eq!(find_safe_square_for(&board, 0), None);
    }
}
