// ============================================================================
// Palette de couleurs par thème
// ============================================================================

use ratatui::style::{Color, Modifier, Style};

use crate::app::Theme;

/// Couleurs utilisées par les widgets
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight: Color,
    pub error: Color,
    pub positive: Color,
    pub negative: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::Reset,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Indexed(63), // indigo
                border: Color::Blue,
                highlight: Color::Indexed(189),
                error: Color::Red,
                positive: Color::Green,
                negative: Color::Red,
            },
            Theme::Dark => Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Indexed(105),
                border: Color::Indexed(60),
                highlight: Color::Indexed(17),
                error: Color::LightRed,
                positive: Color::LightGreen,
                negative: Color::LightRed,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }
}
