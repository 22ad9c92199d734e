use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Light board squares
    pub square_light: Color,
    /// Dark board squares
    pub square_dark: Color,
    /// Queen glyph color
    pub queen: Color,
    /// Conflicted queen color
    pub error: Color,
    /// Cursor square background
    pub cursor_bg: Color,
    /// Picked-up queen's source square background
    pub selected_bg: Color,
    /// Success/solved color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            square_light: Color::Rgb { r: 110, g: 95, b: 70 },
            square_dark: Color::Rgb { r: 60, g: 50, b: 38 },
            queen: Color::Rgb { r: 250, g: 250, b: 255 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            cursor_bg: Color::Rgb { r: 70, g: 110, b: 170 },
            selected_bg: Color::Rgb { r: 150, g: 120, b: 40 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            square_light: Color::Rgb { r: 235, g: 220, b: 190 },
            square_dark: Color::Rgb { r: 170, g: 140, b: 100 },
            queen: Color::Rgb { r: 20, g: 20, b: 25 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            cursor_bg: Color::Rgb { r: 140, g: 180, b: 250 },
            selected_bg: Color::Rgb { r: 240, g: 200, b: 90 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }
}
