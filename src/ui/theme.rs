use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Semantic colors; `resolve` maps them to concrete styles per theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Text,
    Primary,
    Accent,
    Dim,
    Success,
    Danger,
    Warning,
    Highlight,
}

pub fn resolve(color: Palette, theme: Theme) -> Style {
    match (theme, color) {
        (Theme::Dark, Palette::Text) => Style::default().fg(Color::White),
        (Theme::Light, Palette::Text) => Style::default().fg(Color::Black),
        (Theme::Dark, Palette::Primary) => Style::default().fg(Color::Rgb(46, 204, 113)),
        (Theme::Light, Palette::Primary) => Style::default().fg(Color::Rgb(22, 128, 60)),
        (_, Palette::Accent) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        (Theme::Dark, Palette::Dim) => Style::default().fg(Color::Indexed(244)),
        (Theme::Light, Palette::Dim) => Style::default().fg(Color::Indexed(240)),
        (_, Palette::Success) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        (_, Palette::Danger) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        (_, Palette::Warning) => Style::default().fg(Color::Rgb(255, 103, 31)),
        (Theme::Dark, Palette::Highlight) => Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(46, 204, 113))
            .add_modifier(Modifier::BOLD),
        (Theme::Light, Palette::Highlight) => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(22, 128, 60))
            .add_modifier(Modifier::BOLD),
    }
}
