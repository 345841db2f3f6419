use crossterm::style::Color;

use crate::color::ColorDepth;
use crate::config::types::ThemeConfig;
use crate::types::IssueState;

/// Terminal colors resolved once at startup from `[theme]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub open: Color,
    pub closed: Color,
    pub accent: Color,
    pub text: Color,
    pub faint: Color,
    pub error: Color,
    pub selected_bg: Color,
    pub depth: ColorDepth,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            open: Color::Green,
            closed: Color::Magenta,
            accent: Color::Cyan,
            text: Color::Reset,
            faint: Color::DarkGrey,
            error: Color::Red,
            selected_bg: Color::AnsiValue(236),
            depth: ColorDepth::default(),
        }
    }
}

impl Palette {
    pub fn resolve(theme: &ThemeConfig, depth: ColorDepth) -> Self {
        let base = Self::default();
        let pick = |c: Option<crate::color::Color>, fallback: Color| {
            c.map_or(fallback, |c| c.to_crossterm_color(depth))
        };
        Self {
            open: pick(theme.open, base.open),
            closed: pick(theme.closed, base.closed),
            accent: pick(theme.accent, base.accent),
            text: pick(theme.text, base.text),
            faint: pick(theme.faint, base.faint),
            error: pick(theme.error, base.error),
            selected_bg: pick(theme.selected_bg, base.selected_bg),
            depth,
        }
    }

    pub fn state_color(&self, state: IssueState) -> Color {
        match state {
            IssueState::Open => self.open,
            IssueState::Closed => self.closed,
        }
    }
}
