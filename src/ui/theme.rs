//! Theme definitions for basket
//!
//! Four built-in themes: Slate (default), Gruvbox, Nord and Transparent.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    pub accent: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Internal flag for transparent mode
    is_transparent: bool,
}

impl Theme {
    /// Create a theme from a theme name
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Slate => Self::slate(),
            ThemeName::Gruvbox => Self::gruvbox(),
            ThemeName::Nord => Self::nord(),
            ThemeName::Transparent => Self::transparent(),
        }
    }

    /// Dark slate with a blue accent (default)
    pub fn slate() -> Self {
        Self {
            bg: Color::Rgb(17, 24, 39),
            fg: Color::Rgb(243, 244, 246),
            fg_dim: Color::Rgb(107, 114, 128),
            accent: Color::Rgb(59, 130, 246),
            success: Color::Rgb(52, 211, 153),
            warning: Color::Rgb(251, 191, 36),
            error: Color::Rgb(248, 113, 113),
            border: Color::Rgb(55, 65, 81),
            border_focused: Color::Rgb(59, 130, 246),
            selection_bg: Color::Rgb(31, 41, 55),
            selection_fg: Color::Rgb(255, 255, 255),
            is_transparent: false,
        }
    }

    /// Gruvbox dark theme
    pub fn gruvbox() -> Self {
        Self {
            bg: Color::Rgb(40, 40, 40),
            fg: Color::Rgb(235, 219, 178),
            fg_dim: Color::Rgb(146, 131, 116),
            accent: Color::Rgb(254, 128, 25),
            success: Color::Rgb(184, 187, 38),
            warning: Color::Rgb(250, 189, 47),
            error: Color::Rgb(251, 73, 52),
            border: Color::Rgb(80, 73, 69),
            border_focused: Color::Rgb(168, 153, 132),
            selection_bg: Color::Rgb(80, 73, 69),
            selection_fg: Color::Rgb(235, 219, 178),
            is_transparent: false,
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(236, 239, 244),
            fg_dim: Color::Rgb(76, 86, 106),
            accent: Color::Rgb(136, 192, 208),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
            border: Color::Rgb(59, 66, 82),
            border_focused: Color::Rgb(136, 192, 208),
            selection_bg: Color::Rgb(76, 86, 106),
            selection_fg: Color::Rgb(236, 239, 244),
            is_transparent: false,
        }
    }

    /// Transparent theme (uses terminal colors)
    pub fn transparent() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            fg_dim: Color::Gray,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            selection_bg: Color::Reset,
            selection_fg: Color::White,
            is_transparent: true,
        }
    }

    // === STYLE HELPERS ===

    fn on_bg(&self, style: Style) -> Style {
        if self.is_transparent {
            style
        } else {
            style.bg(self.bg)
        }
    }

    pub fn text(&self) -> Style {
        self.on_bg(Style::default().fg(self.fg))
    }

    pub fn text_dim(&self) -> Style {
        self.on_bg(Style::default().fg(self.fg_dim))
    }

    pub fn title(&self) -> Style {
        self.on_bg(Style::default().fg(self.accent).add_modifier(Modifier::BOLD))
    }

    /// Highlight for the row under the cursor
    pub fn selected(&self) -> Style {
        let style = Style::default()
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD);
        if self.is_transparent {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style.bg(self.selection_bg)
        }
    }

    /// Struck-through dim text for completed items
    pub fn completed(&self) -> Style {
        self.text_dim().add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn border(&self) -> Style {
        self.on_bg(Style::default().fg(self.border))
    }

    pub fn border_focused(&self) -> Style {
        self.on_bg(Style::default().fg(self.border_focused))
    }

    pub fn success(&self) -> Style {
        self.on_bg(Style::default().fg(self.success))
    }

    pub fn warning(&self) -> Style {
        self.on_bg(Style::default().fg(self.warning))
    }

    pub fn error(&self) -> Style {
        self.on_bg(Style::default().fg(self.error))
    }

    pub fn block_style(&self) -> Style {
        self.on_bg(Style::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        let slate = Theme::from_name(ThemeName::Slate);
        assert_eq!(slate.bg, Color::Rgb(17, 24, 39));
        assert!(!slate.is_transparent);

        let nord = Theme::from_name(ThemeName::Nord);
        assert_eq!(nord.bg, Color::Rgb(46, 52, 64));

        let transparent = Theme::from_name(ThemeName::Transparent);
        assert!(transparent.is_transparent);
        assert_eq!(transparent.text().bg, None);
    }

    #[test]
    fn test_completed_is_crossed_out() {
        let theme = Theme::slate();
        assert!(theme
            .completed()
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }
}
