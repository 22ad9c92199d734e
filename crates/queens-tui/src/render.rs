use crate::app::{App, MenuState, ScreenState, MENU_MAX_SIZE, MENU_MIN_SIZE};
use crate::stats::format_time;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use queens_core::{conflicts_for_queen, Position};
use std::collections::HashSet;
use std::io;

/// Width of one board square in characters.
const CELL_W: u16 = 3;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;

    match app.screen_state {
        ScreenState::Win => render_win_screen(stdout, app, term_width, term_height)?,
        ScreenState::Stats => {
            execute!(stdout, Clear(ClearType::All))?;
            render_stats_screen(stdout, app, term_width, term_height)?;
        }
        ScreenState::Playing => {
            execute!(stdout, Clear(ClearType::All))?;
            render_game_screen(stdout, app, term_width, term_height)?;
        }
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let size = app.game.size() as u16;
    let board_width = size * CELL_W;
    let board_height = size;

    // Board on the left, info panel on the right
    let total_width = board_width + 26;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > board_height + 8 { 2 } else { 1 };

    render_board(stdout, app, start_x, start_y)?;

    let info_x = start_x + board_width + 4;
    render_info_panel(stdout, app, info_x, start_y)?;

    let controls_y = start_y + board_height + 1;
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width, term_height)?;
    }

    if app.menu == MenuState::NewGame {
        render_menu(stdout, app, term_width, term_height)?;
    }

    if let Some(ref hint) = app.current_hint {
        render_hint(stdout, app, hint, term_width, term_height)?;
    }

    Ok(())
}

fn render_board(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let board = app.game.board();
    let size = board.size();

    // Conflicted queens get the error tint, the original's red highlight
    let conflicted: HashSet<Position> = board
        .queens()
        .iter()
        .enumerate()
        .filter(|&(i, _)| conflicts_for_queen(board, i) > 0)
        .map(|(_, q)| q.pos)
        .collect();

    for row in 0..size {
        execute!(stdout, MoveTo(x, y + row as u16))?;
        for col in 0..size {
            let pos = Position::new(row, col);
            let bg = if pos == app.cursor {
                theme.cursor_bg
            } else if app.selected == Some(pos) {
                theme.selected_bg
            } else if (row + col) % 2 == 0 {
                theme.square_light
            } else {
                theme.square_dark
            };

            let (glyph, fg) = match board.occupied_by(row, col) {
                Some(_) if conflicted.contains(&pos) => (" ♛ ", theme.error),
                Some(_) => (" ♛ ", theme.queen),
                None => ("   ", theme.fg),
            };

            execute!(
                stdout,
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(glyph)
            )?;
        }
    }

    execute!(stdout, SetBackgroundColor(app.theme.bg))?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print(format!("N-QUEENS {0}x{0}", game.size()))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Time    {}", game.elapsed_string()))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 3),
        Print(format!("Queens  {}/{}", game.board().count(), game.size()))
    )?;

    let conflicts = game.conflicts();
    let conflict_color = if conflicts == 0 { theme.success } else { theme.error };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(conflict_color),
        Print(format!("Conflicts  {}", conflicts))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print(format!("Hints   {}", game.hints_used()))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 6),
        Print(format!("Moves   {}", game.moves_count()))
    )?;

    if game.is_solving() {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.key),
            Print("Solving...")
        )?;
    } else if game.is_completed() {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.success),
            Print("Solved!")
        )?;
    } else if let Some(best) = app.stats.for_size(game.size()).and_then(|s| s.best_time_secs) {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.info),
            Print(format!("Best    {}", format_time(best)))
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("[←↑↓→] move  [enter] grab/drop  [p]lace  [x] remove  [?] hint  [!] apply")
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 1),
        Print("[s]olve  [r] scramble  [n]ew game  [t]heme  [i] stats  [S]ave  [L]oad  [q]uit")
    )?;
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let x = center_x(term_width, msg.len() as u16);
    execute!(
        stdout,
        MoveTo(x, term_height.saturating_sub(2)),
        SetForegroundColor(app.theme.key),
        Print(msg)
    )?;
    Ok(())
}

fn render_hint(
    stdout: &mut io::Stdout,
    app: &App,
    hint: &queens_core::Hint,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let title = format!(" Hint: {} ", hint.category);
    let body = &hint.description;
    let width = (body.chars().count().max(title.len()) as u16 + 4).min(term_width.saturating_sub(2));
    let x = center_x(term_width, width);
    let y = term_height / 2;

    draw_box(stdout, app, x, y, width, 5)?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.key),
        Print(&title)
    )?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 2),
        SetForegroundColor(theme.fg),
        Print(truncate(body, width.saturating_sub(4) as usize))
    )?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 3),
        SetForegroundColor(theme.info),
        Print("[!] apply   [any key] dismiss")
    )?;
    Ok(())
}

fn render_menu(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let width = 30;
    let x = center_x(term_width, width);
    let y = term_height / 2 - 3;

    draw_box(stdout, app, x, y, width, 6)?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.fg),
        Print("New Game")
    )?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 2),
        SetForegroundColor(theme.key),
        Print(format!(
            "Board size:  < {:2} >   ({}-{})",
            app.menu_size, MENU_MIN_SIZE, MENU_MAX_SIZE
        ))
    )?;
    execute!(
        stdout,
        MoveTo(x + 2, y + 4),
        SetForegroundColor(theme.info),
        Print("[enter] start  [esc] cancel")
    )?;
    Ok(())
}

fn render_stats_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    _term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let x = center_x(term_width, 44);
    let mut y = 2;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print("STATISTICS")
    )?;
    y += 2;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(format!(
            "{:>5}  {:>7} {:>6} {:>6} {:>6}",
            "size", "solved", "auto", "best", "avg"
        ))
    )?;
    y += 1;

    for size in MENU_MIN_SIZE..=MENU_MAX_SIZE {
        if let Some(s) = app.stats.for_size(size) {
            execute!(
                stdout,
                MoveTo(x, y),
                SetForegroundColor(theme.fg),
                Print(format!(
                    "{:>5}  {:>7} {:>6} {:>6} {:>6}",
                    size,
                    s.solved,
                    s.auto_solved,
                    s.best_time_secs.map_or("-".to_string(), format_time),
                    s.avg_time_secs().map_or("-".to_string(), format_time),
                ))
            )?;
            y += 1;
        }
    }

    y += 1;
    let totals = app.stats.stats();
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(format!(
            "Total solved: {}   auto-solved: {}",
            totals.total_solved, totals.total_auto_solved
        ))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.key),
        Print("[esc] back")
    )?;
    Ok(())
}

fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, Clear(ClearType::All))?;

    // Confetti behind the banner
    for p in &app.win_screen.particles {
        let px = (p.x * term_width as f32) as u16;
        let py = (p.y * term_height as f32) as u16;
        if px < term_width && py < term_height {
            execute!(
                stdout,
                MoveTo(px, py),
                SetForegroundColor(p.color),
                Print(p.ch)
            )?;
        }
    }

    let lines = [
        format!("{0}x{0} SOLVED!", app.game.size()),
        if app.game.was_auto_solved() {
            "(by the computer this time)".to_string()
        } else {
            format!("Your time: {}", app.game.elapsed_string())
        },
        String::new(),
        "[enter] play again   [n]ew size   [esc] view board   [q]uit".to_string(),
    ];

    let mid_y = term_height / 2 - 2;
    for (i, line) in lines.iter().enumerate() {
        let x = center_x(term_width, line.chars().count() as u16);
        let color = match i {
            0 => theme.success,
            3 => theme.key,
            _ => theme.fg,
        };
        execute!(
            stdout,
            MoveTo(x, mid_y + i as u16),
            SetForegroundColor(color),
            Print(line)
        )?;
    }

    Ok(())
}

fn draw_box(
    stdout: &mut io::Stdout,
    app: &App,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    execute!(stdout, SetBackgroundColor(theme.bg), SetForegroundColor(theme.info))?;

    let horizontal = "─".repeat(width.saturating_sub(2) as usize);
    execute!(stdout, MoveTo(x, y), Print(format!("┌{}┐", horizontal)))?;
    for row in 1..height.saturating_sub(1) {
        execute!(
            stdout,
            MoveTo(x, y + row),
            Print(format!("│{}│", " ".repeat(width.saturating_sub(2) as usize)))
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + height.saturating_sub(1)),
        Print(format!("└{}┘", horizontal))
    )?;
    Ok(())
}

fn center_x(term_width: u16, content_width: u16) -> u16 {
    if term_width > content_width {
        (term_width - content_width) / 2
    } else {
        0
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
