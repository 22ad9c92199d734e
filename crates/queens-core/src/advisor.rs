//! Heuristic move advisor.
//!
//! An ordered chain of tiers, tried cheapest first until one produces a
//! suggestion. Tie-breaking inside a tier is randomized on purpose: two
//! calls against the same board may return different, individually valid
//! hints. Seed the advisor for reproducible output.
//!
//! The advisor never mutates the caller's board. Tiers that need to ask
//! "what if this queen moved there" work on a private clone.

use crate::{conflict, Board, Position};
use serde::{Deserialize, Serialize};

/// Which tier produced a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintCategory {
    /// A conflicted queen has a fully safe square to move to.
    DirectSafe,
    /// No safe square exists; this move leaves the fewest total conflicts.
    LeastConflict,
    /// Moves the most-attacked queen somewhere that reduces its conflicts.
    ConflictBreaker,
    /// A speculative move that opens a safe square for another queen.
    FutureSafe,
    /// Unconditional last resort.
    Random,
}

impl std::fmt::Display for HintCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HintCategory::DirectSafe => write!(f, "Safe Move"),
            HintCategory::LeastConflict => write!(f, "Least Conflict"),
            HintCategory::ConflictBreaker => write!(f, "Conflict Breaker"),
            HintCategory::FutureSafe => write!(f, "Future Safe"),
            HintCategory::Random => write!(f, "Random"),
        }
    }
}

/// A suggested move for the player. Consumed immediately; never stored by
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub from: Position,
    pub to: Position,
    pub category: HintCategory,
    /// Display text for the notifier, shown verbatim.
    pub description: String,
}

/// The tier chain. Holds only the random source; all board state is
/// per-call.
pub struct HintAdvisor {
    rng: SimpleRng,
}

impl Default for HintAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl HintAdvisor {
    /// Create an advisor seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SimpleRng::new(),
        }
    }

    /// Create an advisor with a fixed seed for reproducible suggestions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Propose a single move, or `None` if no suggestion is possible
    /// (no queens on the board, or nowhere for any queen to go).
    pub fn suggest(&mut self, board: &Board) -> Option<Hint> {
        if board.count() == 0 {
            return None;
        }
        if conflict::conflict_count(board) > 0 {
            if let Some(hint) = self
                .direct_safe(board)
                .or_else(|| self.least_conflict(board))
                .or_else(|| self.conflict_breaker(board))
                .or_else(|| self.future_safe(board))
            {
                return Some(hint);
            }
        }
        self.random_fallback(board)
    }

    /// Tier 1: for each conflicted queen in placement order, take the first
    /// row-major safe square.
    fn direct_safe(&mut self, board: &Board) -> Option<Hint> {
        for idx in 0..board.count() {
            if conflict::conflicts_for_queen(board, idx) == 0 {
                continue;
            }
            if let Some(to) = conflict::find_safe_square_for(board, idx) {
                let from = board.queens()[idx].pos;
                return Some(Hint {
                    from,
                    to,
                    category: HintCategory::DirectSafe,
                    description: format!(
                        "Move the queen at {} to {}. Nothing attacks that square.",
                        from, to
                    ),
                });
            }
        }
        None
    }

    /// Tier 2: over all (queen, free square) pairs, find the move with the
    /// lowest resulting total conflict count. Queens are visited in one
    /// shuffled order, squares row-major; ties go to the first found.
    fn least_conflict(&mut self, board: &Board) -> Option<Hint> {
        let order = self.shuffled_indices(board.count());
        let mut probe = board.clone();
        let mut best: Option<(Position, Position, usize)> = None;

        for &idx in &order {
            let from = board.queens()[idx].pos;
            for to in free_squares(board, from) {
                probe.set_queen_pos(idx, to);
                let total = conflict::conflict_count(&probe);
                if best.map_or(true, |(_, _, b)| total < b) {
                    best = Some((from, to, total));
                }
            }
            probe.set_queen_pos(idx, from);
        }

        best.map(|(from, to, total)| Hint {
            from,
            to,
            category: HintCategory::LeastConflict,
            description: format!(
                "No fully safe square exists. Moving the queen at {} to {} leaves the fewest conflicts ({}).",
                from, to, total
            ),
        })
    }

    /// Tier 3: take the queen with the strictly highest conflict count
    /// (shuffle breaks ties) and find the first row-major square that drops
    /// the board total below that queen's own conflict count.
    fn conflict_breaker(&mut self, board: &Board) -> Option<Hint> {
        let order = self.shuffled_indices(board.count());
        let worst = *order
            .iter()
            .max_by_key(|&&idx| conflict::conflicts_for_queen(board, idx))?;
        let own_conflicts = conflict::conflicts_for_queen(board, worst);
        if own_conflicts == 0 {
            return None;
        }

        let from = board.queens()[worst].pos;
        let mut probe = board.clone();
        for to in free_squares(board, from) {
            probe.set_queen_pos(worst, to);
            let total = conflict::conflict_count(&probe);
            probe.set_queen_pos(worst, from);
            if total < own_conflicts {
                return Some(Hint {
                    from,
                    to,
                    category: HintCategory::ConflictBreaker,
                    description: format!(
                        "The queen at {} is attacked {} times. Moving it to {} eases the pressure.",
                        from, own_conflicts, to
                    ),
                });
            }
        }
        None
    }

    /// Tier 4: look for a speculative move that gives some *other* queen a
    /// safe square it did not have before. The probe runs on a clone; the
    /// caller's board is never touched.
    fn future_safe(&mut self, board: &Board) -> Option<Hint> {
        let had_safe: Vec<bool> = (0..board.count())
            .map(|i| conflict::find_safe_square_for(board, i).is_some())
            .collect();

        let order = self.shuffled_indices(board.count());
        let mut probe = board.clone();
        for &idx in &order {
            if conflict::conflicts_for_queen(board, idx) == 0 {
                continue;
            }
            let from = board.queens()[idx].pos;
            for to in free_squares(board, from) {
                probe.set_queen_pos(idx, to);
                let opens_one = (0..probe.count()).any(|other| {
                    other != idx
                        && !had_safe[other]
                        && conflict::find_safe_square_for(&probe, other).is_some()
                });
                probe.set_queen_pos(idx, from);
                if opens_one {
                    return Some(Hint {
                        from,
                        to,
                        category: HintCategory::FutureSafe,
                        description: format!(
                            "Moving the queen at {} to {} opens a safe square for another queen.",
                            from, to
                        ),
                    });
                }
            }
        }
        None
    }

    /// Tier 5: a uniformly random queen and a uniformly random free square.
    /// Fails only when no queen has anywhere to go.
    fn random_fallback(&mut self, board: &Board) -> Option<Hint> {
        let order = self.shuffled_indices(board.count());
        for &idx in &order {
            let from = board.queens()[idx].pos;
            let candidates: Vec<Position> = free_squares(board, from).collect();
            if candidates.is_empty() {
                continue;
            }
            let to = candidates[self.rng.next_usize(candidates.len())];
            return Some(Hint {
                from,
                to,
                category: HintCategory::Random,
                description: format!(
                    "No obviously good move. Try the queen at {} on {} and see what changes.",
                    from, to
                ),
            });
        }
        None
    }

    /// One Fisher-Yates shuffle of `0..count`, used for a whole tier
    /// execution (never re-shuffled mid-scan).
    fn shuffled_indices(&mut self, count: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..count).collect();
        for i in (1..indices.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            indices.swap(i, j);
        }
        indices
    }
}

/// Row-major iterator over squares that hold no queen and are not `skip`.
fn free_squares<'a>(board: &'a Board, skip: Position) -> impl Iterator<Item = Position> + 'a {
    let size = board.size();
    (0..size).flat_map(move |row| {
        (0..size).filter_map(move |col| {
            let pos = Position::new(row, col);
            if pos != skip && board.occupied_by(row, col).is_none() {
                Some(pos)
            } else {
                None
            }
        })
    })
}

/// Simple PCG-like PRNG, seeded via getrandom so the crate stays portable.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: a static counter if the entropy source fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{conflict, Board, Solver};

    fn board_with(size: usize, squares: &[(usize, usize)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(r, c) in squares {
            board.place(r, c).unwrap();
        }
        board
    }

    fn snapshot(board: &Board) -> Vec<Position> {
        board.queens().iter().map(|q| q.pos).collect()
    }

    #[test]
    fn test_empty_board_has_no_hint() {
        let board = Board::new(8).unwrap();
        assert!(HintAdvisor::with_seed(42).suggest(&board).is_none());
    }

    #[test]
    fn test_direct_safe_fires_first() {
        // Two queens sharing row 2 on an otherwise empty 6x6 board: tier 1
        // must fire, moving the first conflicted queen to the first
        // row-major safe square.
        let board = board_with(6, &[(2, 0), (2, 1)]);
        let hint = HintAdvisor::with_seed(42).suggest(&board).unwrap();
        assert_eq!(hint.category, HintCategory::DirectSafe);
        assert_eq!(hint.from, Position::new(2, 0));
        assert_eq!(hint.to, Position::new(0, 0));
    }

    #[test]
    fn test_no_conflicts_means_random_fallback_only() {
        // Zero conflicts and count < size: tiers 1-4 must not fire.
        let board = board_with(6, &[(0, 0), (1, 2)]);
        assert_eq!(conflict::conflict_count(&board), 0);
        for seed in 0..20 {
            let hint = HintAdvisor::with_seed(seed).suggest(&board).unwrap();
            assert_eq!(hint.category, HintCategory::Random);
            // Destination must be a real square the move could go to
            assert!(board.occupied_by(hint.to.row, hint.to.col).is_none());
            assert_ne!(hint.from, hint.to);
        }
    }

    #[test]
    fn test_suggest_never_mutates_board() {
        // A crowded, heavily conflicted board pushes the advisor through
        // the probing tiers; the authoritative board must come back
        // untouched every time.
        let board = board_with(5, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        let before = snapshot(&board);
        let mut advisor = HintAdvisor::with_seed(7);
        for _ in 0..10 {
            let _ = advisor.suggest(&board);
            assert_eq!(snapshot(&board), before);
        }
    }

    #[test]
    fn test_least_conflict_when_no_safe_square() {
        // 3x3 with queens on the center and both main-diagonal corners:
        // for every queen, the other two cover all six free squares, so
        // tier 1 fails and tier 2 must pick the move minimizing total
        // conflicts.
        let board = board_with(3, &[(1, 1), (0, 0), (2, 2)]);
        assert!(conflict::conflict_count(&board) > 0);
        for idx in 0..3 {
            assert!(conflict::find_safe_square_for(&board, idx).is_none());
        }
        let hint = HintAdvisor::with_seed(42).suggest(&board).unwrap();
        assert_eq!(hint.category, HintCategory::LeastConflict);

        // The suggested move really is optimal: no other single move of
        // that queen produces a lower total.
        let mut probe = board.clone();
        let idx = probe
            .queens()
            .iter()
            .position(|q| q.pos == hint.from)
            .unwrap();
        probe.move_queen(hint.from.row, hint.from.col, hint.to.row, hint.to.col).unwrap();
        let achieved = conflict::conflict_count(&probe);
        probe.move_queen(hint.to.row, hint.to.col, hint.from.row, hint.from.col).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                if probe.occupied_by(row, col).is_some() {
                    continue;
                }
                let from = probe.queens()[idx].pos;
                probe.move_queen(from.row, from.col, row, col).unwrap();
                assert!(conflict::conflict_count(&probe) >= achieved);
                probe.move_queen(row, col, from.row, from.col).unwrap();
            }
        }
    }

    #[test]
    fn test_hint_is_applyable() {
        // Whatever tier fires, replaying the hint through move_queen must
        // succeed: in-bounds, source occupied, destination free.
        for seed in 0..30 {
            let mut board = board_with(6, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
            let hint = HintAdvisor::with_seed(seed).suggest(&board).unwrap();
            board
                .move_queen(hint.from.row, hint.from.col, hint.to.row, hint.to.col)
                .unwrap();
        }
    }

    #[test]
    fn test_solved_board_gets_random_hint() {
        // A solved board has no conflicts; only the fallback can speak.
        let mut board = Board::new(4).unwrap();
        Solver::new().solve(4).unwrap().apply_to(&mut board).unwrap();
        let hint = HintAdvisor::with_seed(1).suggest(&board).unwrap();
        assert_eq!(hint.category, HintCategory::Random);
    }

    #[test]
    fn test_single_square_board_has_no_hint() {
        // One queen on a 1x1 board: nowhere to go, even for the fallback.
        let board = board_with(1, &[(0, 0)]);
        assert!(HintAdvisor::with_seed(3).suggest(&board).is_none());
    }

    #[test]
    fn test_seeded_advisor_is_reproducible() {
        let board = board_with(8, &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        let a = HintAdvisor::with_seed(99).suggest(&board);
        let b = HintAdvisor::with_seed(99).suggest(&board);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hint_serde_roundtrip() {
        let hint = Hint {
            from: Position::new(1, 2),
            to: Position::new(3, 4),
            category: HintCategory::DirectSafe,
            description: "Move the queen at (1, 2) to (3, 4).".to_string(),
        };
        let json = serde_json::to_string(&hint).unwrap();
        let back: Hint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hint);
    }
}
