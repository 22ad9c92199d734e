use crate::animations::WinScreen;
use crate::game::Game;
use crate::stats::StatsManager;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use queens_core::{BoardError, Hint, Position};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Board sizes offered by the new-game menu (the engine itself goes to 25,
/// but boards past 20 stop fitting a normal terminal).
pub const MENU_MIN_SIZE: usize = 4;
pub const MENU_MAX_SIZE: usize = 20;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Win celebration screen
    Win,
    /// Statistics screen
    Stats,
}

/// Menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    /// Picking a size for a new game
    NewGame,
}

/// The main application state
pub struct App {
    /// Current game session
    pub game: Game,
    /// Cursor square
    pub cursor: Position,
    /// Square of the picked-up queen, if any
    pub selected: Option<Position>,
    /// Current menu state
    pub menu: MenuState,
    /// Size shown in the new-game menu
    pub menu_size: usize,
    /// Color theme
    pub theme: Theme,
    /// Current hint to display
    pub current_hint: Option<Hint>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer (ticks)
    message_timer: u32,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Win screen animation
    pub win_screen: WinScreen,
    /// Statistics manager
    pub stats: StatsManager,
    /// Whether the current session was already recorded
    game_recorded: bool,
    /// Seed forwarded to each new session's advisor
    seed: Option<u64>,
}

impl App {
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        Self {
            game: Game::new(size, seed),
            cursor: Position::new(size / 2, size / 2),
            selected: None,
            menu: MenuState::None,
            menu_size: size,
            theme: Theme::dark(),
            current_hint: None,
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            win_screen: WinScreen::new(),
            stats: StatsManager::load(),
            game_recorded: false,
            seed,
        }
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Win => Duration::from_millis(33), // 30 FPS for confetti
            ScreenState::Playing if self.game.is_solving() => {
                Duration::from_millis(150) // pacing between solver steps
            }
            ScreenState::Playing | ScreenState::Stats => Duration::from_millis(100),
        }
    }

    /// Update animations and timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        match self.screen_state {
            ScreenState::Win => {
                self.win_screen.update();
            }
            ScreenState::Playing => {
                if self.game.is_solving() {
                    self.game.step_solve();
                }
                if self.game.is_completed() && !self.game_recorded {
                    self.record_game();
                    self.screen_state = ScreenState::Win;
                    self.win_screen.reset();
                }
            }
            ScreenState::Stats => {}
        }
    }

    fn record_game(&mut self) {
        self.game_recorded = true;
        self.stats.record_solve(
            self.game.size(),
            self.game.elapsed().as_secs(),
            self.game.hints_used(),
            self.game.moves_count(),
            self.game.was_auto_solved(),
        );
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30;
    }

    fn new_game(&mut self, size: usize) {
        self.game = Game::new(size, self.seed);
        self.cursor = Position::new(size / 2, size / 2);
        self.selected = None;
        self.current_hint = None;
        self.game_recorded = false;
        self.screen_state = ScreenState::Playing;
        self.menu = MenuState::None;
        self.show_message(&format!("New {0}x{0} game", size));
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Win => self.handle_win_key(key),
            ScreenState::Stats => self.handle_stats_key(key),
            ScreenState::Playing => {
                // Any key dismisses an open hint popup
                if self.current_hint.is_some() && key.code != KeyCode::Char('!') {
                    self.current_hint = None;
                }
                match self.menu {
                    MenuState::None => self.handle_game_key(key),
                    MenuState::NewGame => self.handle_menu_key(key),
                }
            }
        }
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') => {
                self.screen_state = ScreenState::Playing;
                self.menu = MenuState::NewGame;
                self.menu_size = self.game.size();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.new_game(self.game.size());
            }
            KeyCode::Esc => {
                // Back to the finished board
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        // While the auto-solver animates, the board is hands-off
        if self.game.is_solving() {
            if key.code == KeyCode::Char('q') {
                return AppAction::Quit;
            }
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Pick up / put down the queen under the cursor
            KeyCode::Enter | KeyCode::Char(' ') => self.grab_or_drop(),

            // Place a fresh queen
            KeyCode::Char('p') => match self.game.place(self.cursor) {
                Ok(()) => {}
                Err(e) => self.show_error(e),
            },

            // Remove the queen under the cursor
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => {
                if self.selected == Some(self.cursor) {
                    self.selected = None;
                }
                if !self.game.remove(self.cursor) {
                    self.show_message("No queen there");
                }
            }

            // Hint
            KeyCode::Char('?') => {
                if let Some(hint) = self.game.request_hint() {
                    self.current_hint = Some(hint);
                } else {
                    self.show_message("No hint available");
                }
            }

            // Apply hint (request one first if none is showing)
            KeyCode::Char('!') => {
                let hint = self.current_hint.take().or_else(|| self.game.request_hint());
                match hint {
                    Some(hint) => match self.game.apply_hint(&hint) {
                        Ok(()) => {
                            self.cursor = hint.to;
                            self.selected = None;
                            self.show_message("Hint applied");
                        }
                        Err(e) => self.show_error(e),
                    },
                    None => self.show_message("No hint available"),
                }
            }

            // Auto-solve
            KeyCode::Char('s') => match self.game.start_solve() {
                Ok(()) => {
                    self.selected = None;
                    self.show_message("Solving...");
                }
                Err(e) => self.show_error(e),
            },

            // Scramble
            KeyCode::Char('r') => {
                self.game.scramble();
                self.selected = None;
                self.show_message("Scrambled");
            }

            // New game menu
            KeyCode::Char('n') => {
                self.menu = MenuState::NewGame;
                self.menu_size = self.game.size();
            }

            // Theme toggle
            KeyCode::Char('t') => {
                self.theme = if matches!(self.theme.bg, crossterm::style::Color::Rgb { r: 20, .. }) {
                    Theme::light()
                } else {
                    Theme::dark()
                };
            }

            // Stats screen
            KeyCode::Char('i') => {
                self.screen_state = ScreenState::Stats;
            }

            // Save / load
            KeyCode::Char('S') => self.save_game(),
            KeyCode::Char('L') => self.load_game(),

            _ => {}
        }

        AppAction::Continue
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = MenuState::None;
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Right | KeyCode::Char('l') => {
                if self.menu_size < MENU_MAX_SIZE {
                    self.menu_size += 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Left | KeyCode::Char('h') => {
                if self.menu_size > MENU_MIN_SIZE {
                    self.menu_size -= 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.new_game(self.menu_size);
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('i') => {
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn grab_or_drop(&mut self) {
        match self.selected {
            Some(from) => {
                if from == self.cursor {
                    self.selected = None;
                    return;
                }
                match self.game.move_queen(from, self.cursor) {
                    Ok(()) => {
                        self.selected = None;
                        if !self.game.is_completed() {
                            let conflicts = self.game.conflicts();
                            if conflicts > 0 {
                                self.show_message(&format!(
                                    "{} conflict{}",
                                    conflicts,
                                    if conflicts == 1 { "" } else { "s" }
                                ));
                            }
                        }
                    }
                    Err(e) => self.show_error(e),
                }
            }
            None => {
                if self.game.board().occupied_by(self.cursor.row, self.cursor.col).is_some() {
                    self.selected = Some(self.cursor);
                } else {
                    self.show_message("No queen there");
                }
            }
        }
    }

    fn show_error(&mut self, err: BoardError) {
        self.show_message(&err.to_string());
    }

    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let max = (self.game.size() - 1) as i32;
        let new_row = (self.cursor.row as i32 + row_delta).clamp(0, max) as usize;
        let new_col = (self.cursor.col as i32 + col_delta).clamp(0, max) as usize;
        self.cursor = Position::new(new_row, new_col);
    }

    /// Get the save file path
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("queens_save.json")
    }

    /// Save the current game
    fn save_game(&mut self) {
        let json = self.game.serialize();
        match fs::write(Self::save_path(), json) {
            Ok(_) => self.show_message("Game saved"),
            Err(_) => self.show_message("Failed to save"),
        }
    }

    /// Load a saved game
    fn load_game(&mut self) {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => {
                if let Some(game) = Game::deserialize(&json) {
                    let size = game.size();
                    self.game = game;
                    self.cursor = Position::new(size / 2, size / 2);
                    self.selected = None;
                    self.game_recorded = false;
                    self.screen_state = ScreenState::Playing;
                    self.show_message("Game loaded");
                } else {
                    self.show_message("Invalid save file");
                }
            }
            Err(_) => self.show_message("No save file found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_cursor_clamps_to_board() {
        let mut app = App::new(8, Some(1));
        for _ in 0..20 {
            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.cursor, Position::new(0, 0));
        for _ in 0..20 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.cursor, Position::new(7, 7));
    }

    #[test]
    fn test_grab_and_drop_moves_queen() {
        let mut app = App::new(8, Some(1));
        // Cursor starts at (4, 4), which holds a diagonal queen
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected, Some(Position::new(4, 4)));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected, None);
        assert!(app.game.board().occupied_by(4, 5).is_some());
        assert!(app.game.board().occupied_by(4, 4).is_none());
    }

    #[test]
    fn test_grab_empty_square_complains() {
        let mut app = App::new(8, Some(1));
        press(&mut app, KeyCode::Right); // (4, 5) is empty
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected, None);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_drop_on_occupied_square_keeps_selection_error() {
        let mut app = App::new(8, Some(1));
        press(&mut app, KeyCode::Enter); // grab (4, 4)
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right); // (5, 5) holds a queen
        press(&mut app, KeyCode::Enter);
        // Move rejected; original queen untouched
        assert!(app.game.board().occupied_by(4, 4).is_some());
        assert!(app.message.is_some());
    }

    #[test]
    fn test_menu_size_bounds() {
        let mut app = App::new(8, Some(1));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.menu, MenuState::NewGame);
        for _ in 0..40 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.menu_size, MENU_MIN_SIZE);
        for _ in 0..40 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.menu_size, MENU_MAX_SIZE);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.game.size(), MENU_MAX_SIZE);
        assert_eq!(app.menu, MenuState::None);
    }

    #[test]
    fn test_auto_solve_completes_via_ticks() {
        let mut app = App::new(6, Some(1));
        // Keep the recorded result out of the real stats file
        app.stats = crate::stats::StatsManager::load_from(
            std::env::temp_dir().join("queens_app_test_stats.json"),
        );
        press(&mut app, KeyCode::Char('s'));
        assert!(app.game.is_solving());
        // Board keys are ignored while solving
        press(&mut app, KeyCode::Char('r'));
        assert!(app.game.is_solving());

        for _ in 0..10 {
            app.tick();
        }
        assert!(app.game.is_completed());
        assert_eq!(app.screen_state, ScreenState::Win);
    }

    #[test]
    fn test_menu_escape_keeps_current_game() {
        let mut app = App::new(8, Some(1));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(app.game.size(), 8);
    }

    #[test]
    fn test_hint_popup_and_apply() {
        let mut app = App::new(8, Some(42));
        press(&mut app, KeyCode::Char('?'));
        assert!(app.current_hint.is_some());
        assert_eq!(app.game.hints_used(), 1);
        let hint = app.current_hint.clone().unwrap();
        press(&mut app, KeyCode::Char('!'));
        assert!(app.current_hint.is_none());
        assert_eq!(app.cursor, hint.to);
        assert!(app.game.board().occupied_by(hint.to.row, hint.to.col).is_some());
    }
}
