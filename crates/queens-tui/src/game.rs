use queens_core::{
    conflict_count, is_solved, Board, BoardError, Hint, HintAdvisor, Position, Solution, Solver,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A single puzzle session: the board plus front-end bookkeeping the engine
/// deliberately does not own (chronometer, hint/move counters, auto-solve
/// animation state).
pub struct Game {
    /// The authoritative board
    board: Board,
    /// Hint source for this session
    advisor: HintAdvisor,
    /// Chronometer start (re-based when loading a save)
    start_time: Instant,
    /// Accumulated time, frozen once the puzzle is solved
    elapsed: Duration,
    /// Whether the puzzle has been solved
    completed: bool,
    /// Placements still to replay while the auto-solver animates
    pending_solution: VecDeque<Position>,
    /// Whether this session was finished by the auto-solver
    auto_solved: bool,
    /// Number of hints requested
    hints_used: usize,
    /// Number of successful board mutations by the player
    moves: usize,
}

impl Game {
    /// Start a new session. Queens go on the main diagonal, the classic
    /// starting arrangement of this puzzle.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        let mut board = Board::new(size).expect("menu and CLI validate the size range");
        for i in 0..size {
            board
                .place(i, i)
                .expect("diagonal placement on an empty board cannot collide");
        }
        let advisor = match seed {
            Some(seed) => HintAdvisor::with_seed(seed),
            None => HintAdvisor::new(),
        };
        Self {
            board,
            advisor,
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            completed: false,
            pending_solution: VecDeque::new(),
            auto_solved: false,
            hints_used: 0,
            moves: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether the auto-solver is mid-animation.
    pub fn is_solving(&self) -> bool {
        !self.pending_solution.is_empty()
    }

    /// While solving or after completion, player input is ignored.
    pub fn input_locked(&self) -> bool {
        self.completed || self.is_solving()
    }

    pub fn was_auto_solved(&self) -> bool {
        self.auto_solved
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn moves_count(&self) -> usize {
        self.moves
    }

    /// Current total conflicts, for the info panel.
    pub fn conflicts(&self) -> usize {
        conflict_count(&self.board)
    }

    /// Elapsed session time; frozen at the moment of completion.
    pub fn elapsed(&self) -> Duration {
        if self.completed {
            self.elapsed
        } else {
            self.elapsed + self.start_time.elapsed()
        }
    }

    /// Format the elapsed time as MM:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Move a queen. Callers check `input_locked` first; a locked game
    /// rejects the move outright by reporting no queen at the source.
    pub fn move_queen(&mut self, from: Position, to: Position) -> Result<(), BoardError> {
        if self.input_locked() {
            return Err(BoardError::NoQueenAtSource {
                row: from.row,
                col: from.col,
            });
        }
        self.board.move_queen(from.row, from.col, to.row, to.col)?;
        self.after_mutation();
        Ok(())
    }

    /// Place an extra queen at the cursor.
    pub fn place(&mut self, pos: Position) -> Result<(), BoardError> {
        if self.input_locked() {
            return Err(BoardError::SquareOccupied {
                row: pos.row,
                col: pos.col,
            });
        }
        self.board.place(pos.row, pos.col)?;
        self.after_mutation();
        Ok(())
    }

    /// Remove the queen at the cursor, if any.
    pub fn remove(&mut self, pos: Position) -> bool {
        if self.input_locked() {
            return false;
        }
        let removed = self.board.remove(pos.row, pos.col);
        if removed {
            self.after_mutation();
        }
        removed
    }

    /// Ask the advisor for a move suggestion.
    pub fn request_hint(&mut self) -> Option<Hint> {
        if self.input_locked() {
            return None;
        }
        let hint = self.advisor.suggest(&self.board);
        if hint.is_some() {
            self.hints_used += 1;
        }
        hint
    }

    /// Replay a hint through the regular move path.
    pub fn apply_hint(&mut self, hint: &Hint) -> Result<(), BoardError> {
        self.move_queen(hint.from, hint.to)
    }

    /// Rearrange the queens to a random column permutation (one queen per
    /// row, no two sharing a column).
    pub fn scramble(&mut self) {
        use rand::seq::SliceRandom;

        if self.input_locked() {
            return;
        }
        let size = self.board.size();
        let mut cols: Vec<usize> = (0..size).collect();
        cols.shuffle(&mut rand::thread_rng());
        self.board.clear();
        for (row, &col) in cols.iter().enumerate() {
            self.board
                .place(row, col)
                .expect("a permutation never doubles up a square");
        }
        self.after_mutation();
    }

    /// Kick off the auto-solver. The board is cleared and the canonical
    /// solution is replayed one queen per tick so the player can watch it
    /// build up; until it finishes, all input is locked.
    pub fn start_solve(&mut self) -> Result<(), BoardError> {
        if self.input_locked() {
            return Ok(());
        }
        let solution: Solution = Solver::new().solve(self.board.size())?;
        self.board.clear();
        self.pending_solution = solution.positions().iter().copied().collect();
        self.auto_solved = true;
        Ok(())
    }

    /// Advance the auto-solve animation by one placement. Called from the
    /// app's tick handler.
    pub fn step_solve(&mut self) {
        if let Some(pos) = self.pending_solution.pop_front() {
            self.board
                .place(pos.row, pos.col)
                .expect("solver output never collides on a cleared board");
            if self.pending_solution.is_empty() && is_solved(&self.board) {
                self.complete();
            }
        }
    }

    fn after_mutation(&mut self) {
        self.moves += 1;
        if is_solved(&self.board) {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.completed = true;
        self.elapsed += self.start_time.elapsed();
    }

    /// Serialize the session for saving.
    pub fn serialize(&self) -> String {
        let state = SaveState {
            size: self.board.size(),
            queens: self.board.queens().iter().map(|q| q.pos).collect(),
            elapsed_secs: self.elapsed().as_secs(),
            hints_used: self.hints_used,
            moves: self.moves,
        };
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Restore a saved session. Rejects saves whose coordinates no longer
    /// fit the recorded size.
    pub fn deserialize(json: &str) -> Option<Self> {
        let state: SaveState = serde_json::from_str(json).ok()?;
        let mut board = Board::new(state.size).ok()?;
        for pos in &state.queens {
            board.place(pos.row, pos.col).ok()?;
        }
        // A save taken after the win comes back solved; the chronometer
        // must stay frozen at the recorded time.
        let completed = is_solved(&board);
        Some(Self {
            board,
            advisor: HintAdvisor::new(),
            start_time: Instant::now(),
            elapsed: Duration::from_secs(state.elapsed_secs),
            completed,
            pending_solution: VecDeque::new(),
            auto_solved: false,
            hints_used: state.hints_used,
            moves: state.moves,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct SaveState {
    size: usize,
    queens: Vec<Position>,
    elapsed_secs: u64,
    hints_used: usize,
    moves: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_places_diagonal() {
        let game = Game::new(8, Some(1));
        assert_eq!(game.board().count(), 8);
        for (i, q) in game.board().queens().iter().enumerate() {
            assert_eq!(q.pos, Position::new(i, i));
        }
        assert!(!game.is_completed());
        // The full diagonal is one big mutual conflict: C(8, 2) pairs
        assert_eq!(game.conflicts(), 28);
    }

    #[test]
    fn test_move_and_completion() {
        // Size 4: walk the diagonal start into the canonical solution
        let mut game = Game::new(4, Some(1));
        game.move_queen(Position::new(0, 0), Position::new(0, 1)).unwrap();
        game.move_queen(Position::new(1, 1), Position::new(1, 3)).unwrap();
        game.move_queen(Position::new(2, 2), Position::new(2, 0)).unwrap();
        assert!(!game.is_completed());
        game.move_queen(Position::new(3, 3), Position::new(3, 2)).unwrap();
        assert!(game.is_completed());
        assert_eq!(game.moves_count(), 4);
        // Completed games ignore further input
        assert!(game.move_queen(Position::new(0, 1), Position::new(0, 0)).is_err());
        assert!(!game.was_auto_solved());
    }

    #[test]
    fn test_auto_solve_locks_input_and_completes() {
        let mut game = Game::new(6, Some(1));
        game.start_solve().unwrap();
        assert!(game.is_solving());
        assert!(game.input_locked());
        // Player moves are rejected while the animation runs
        assert!(game.request_hint().is_none());
        assert!(!game.remove(Position::new(0, 0)));

        for _ in 0..6 {
            game.step_solve();
        }
        assert!(!game.is_solving());
        assert!(game.is_completed());
        assert!(game.was_auto_solved());
    }

    #[test]
    fn test_auto_solve_unsolvable_size() {
        let mut game = Game::new(3, Some(1));
        let err = game.start_solve().unwrap_err();
        assert_eq!(err, BoardError::Unsolvable { size: 3 });
        // Session untouched: still playable, queens still placed
        assert!(!game.input_locked());
        assert_eq!(game.board().count(), 3);
    }

    #[test]
    fn test_hint_counts_and_applies() {
        let mut game = Game::new(6, Some(42));
        let hint = game.request_hint().unwrap();
        assert_eq!(game.hints_used(), 1);
        game.apply_hint(&hint).unwrap();
        assert_eq!(game.moves_count(), 1);
    }

    #[test]
    fn test_scramble_is_column_permutation() {
        let mut game = Game::new(10, Some(1));
        game.scramble();
        assert_eq!(game.board().count(), 10);
        let mut seen_cols = vec![false; 10];
        for (row, q) in game.board().queens().iter().enumerate() {
            assert_eq!(q.row(), row);
            assert!(!seen_cols[q.col()]);
            seen_cols[q.col()] = true;
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut game = Game::new(8, Some(1));
        game.move_queen(Position::new(0, 0), Position::new(0, 4)).unwrap();
        let json = game.serialize();

        let loaded = Game::deserialize(&json).unwrap();
        assert_eq!(loaded.size(), 8);
        assert_eq!(loaded.board().queens(), game.board().queens());
        assert_eq!(loaded.moves_count(), 1);
        assert_eq!(loaded.hints_used(), 0);
    }

    #[test]
    fn test_load_solved_save_stays_completed() {
        // Saving after the win and loading must come back completed, with
        // the chronometer frozen at the recorded time.
        let mut game = Game::new(4, Some(1));
        game.start_solve().unwrap();
        for _ in 0..4 {
            game.step_solve();
        }
        assert!(game.is_completed());
        let json = game.serialize();

        let loaded = Game::deserialize(&json).unwrap();
        assert!(loaded.is_completed());
        assert!(loaded.input_locked());
        let frozen = loaded.elapsed();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(loaded.elapsed(), frozen);
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        assert!(Game::deserialize("not json").is_none());
        assert!(Game::deserialize("{\"size\":0,\"queens\":[],\"elapsed_secs\":0,\"hints_used\":0,\"moves\":0}").is_none());
    }
}
