//! Color themes for the dashboard, built from ratatui colors directly.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for dashboard elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Title bar and summary line
    pub header: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Border of the panel that has focus
    pub focus_border: Style,

    /// Cursor row in lists and tables
    pub selection: Style,

    pub year_bars: Color,
    pub source_bars: Color,

    /// Term cloud styles, heaviest first
    pub cloud_strong: Style,
    pub cloud_medium: Style,
    pub cloud_weak: Style,

    /// Placeholder messages for empty panels
    pub info_text: Style,

    /// Error/warning text
    pub error_text: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            status_bg: Color::Blue,
            status_fg: Color::White,
            focus_border: Style::default().fg(Color::Yellow),
            selection: Style::default().fg(Color::White).bg(Color::Blue),
            year_bars: Color::Green,
            source_bars: Color::Magenta,
            cloud_strong: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            cloud_medium: Style::default().fg(Color::Cyan),
            cloud_weak: Style::default().fg(Color::DarkGray),
            info_text: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            error_text: Color::Red,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            status_bg: Color::Black,
            status_fg: Color::White,
            focus_border: Style::default().add_modifier(Modifier::BOLD),
            selection: Style::default().add_modifier(Modifier::REVERSED),
            year_bars: Color::White,
            source_bars: Color::White,
            cloud_strong: Style::default().add_modifier(Modifier::BOLD),
            cloud_medium: Style::default(),
            cloud_weak: Style::default().add_modifier(Modifier::DIM),
            info_text: Style::default().add_modifier(Modifier::ITALIC),
            error_text: Color::White,
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            header: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            status_bg: Color::White,
            status_fg: Color::Black,
            focus_border: Style::default().fg(Color::LightYellow),
            selection: Style::default().fg(Color::Black).bg(Color::LightYellow),
            year_bars: Color::LightGreen,
            source_bars: Color::LightCyan,
            cloud_strong: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            cloud_medium: Style::default().fg(Color::White),
            cloud_weak: Style::default().fg(Color::Gray),
            info_text: Style::default().fg(Color::White),
            error_text: Color::LightRed,
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Cloud style for a term with `count` occurrences when the heaviest has `max`.
    pub fn cloud_style(&self, count: usize, max: usize) -> Style {
        if max == 0 {
            return self.cloud_weak;
        }
        match count * 3 / max {
            0 => self.cloud_weak,
            1 => self.cloud_medium,
            _ => self.cloud_strong,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.status_fg, Color::White);
        assert_eq!(theme.status_bg, Color::Blue);
        assert_eq!(theme.selection.bg, Some(Color::Blue));
    }

    #[test]
    fn test_monochrome_theme() {
        let theme = ColorTheme::monochrome();
        assert_eq!(theme.status_bg, Color::Black);
        assert_eq!(theme.year_bars, theme.source_bars);
        assert_eq!(theme.selection.fg, None);
    }

    #[test]
    fn test_high_contrast_theme() {
        let theme = ColorTheme::high_contrast();
        assert_eq!(theme.error_text, Color::LightRed);
        assert_eq!(theme.status_bg, Color::White);
        assert_eq!(theme.status_fg, Color::Black);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            ColorTheme::from_name(ThemeName::Monochrome).status_bg,
            Color::Black
        );
        assert_eq!(
            ColorTheme::from_name(ThemeName::HighContrast).status_bg,
            Color::White
        );
    }

    #[test]
    fn test_cloud_style_buckets() {
        let theme = ColorTheme::default();
        assert_eq!(theme.cloud_style(9, 9), theme.cloud_strong);
        assert_eq!(theme.cloud_style(4, 9), theme.cloud_medium);
        assert_eq!(theme.cloud_style(1, 9), theme.cloud_weak);
        assert_eq!(theme.cloud_style(0, 0), theme.cloud_weak);
    }
}
