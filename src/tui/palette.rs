use crate::model::SimStatus;
use crate::theme::Theme;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub key: Color,
    pub selected_bg: Color,
    pub error: Color,
    pending: Color,
    running: Color,
    completed: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Yellow,
                key: Color::Magenta,
                selected_bg: Color::DarkGray,
                error: Color::LightRed,
                pending: Color::Cyan,
                running: Color::Yellow,
                completed: Color::Green,
            },
            Theme::Light => Self {
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                key: Color::Magenta,
                selected_bg: Color::Gray,
                error: Color::Red,
                pending: Color::Blue,
                running: Color::Rgb(176, 112, 0),
                completed: Color::Rgb(0, 128, 0),
            },
        }
    }

    pub fn status(&self, status: SimStatus) -> Style {
        let fg = match status {
            SimStatus::Pending => self.pending,
            SimStatus::Running => self.running,
            SimStatus::Completed => self.completed,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.key)
    }
}
