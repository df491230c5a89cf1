use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const WATER: Color = Color::Cyan;
    pub const SELECTED_BG: Color = Color::DarkGray;

    // Status
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Forecast quantities
    pub const TEMP_MILD: Color = Color::Cyan;
    pub const TEMP_WARM: Color = Color::Yellow;
    pub const TEMP_HOT: Color = Color::Red;
    pub const RAIN: Color = Color::LightBlue;
    pub const ET0: Color = Color::LightYellow;
    pub const DEMAND: Color = Color::LightGreen;

    fn bold(color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Self::bold(Self::WATER)
    }

    pub fn header() -> Style {
        Self::bold(Self::FG)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Headline figures: applied depth, week totals.
    pub fn highlight() -> Style {
        Self::bold(Self::DEMAND)
    }

    pub fn selected() -> Style {
        Self::bold(Self::FG).bg(Self::SELECTED_BG)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn nav_key() -> Style {
        Self::title()
    }

    pub fn nav_label() -> Style {
        Self::dim()
    }

    pub fn border() -> Style {
        Self::dim()
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::WATER)
    }

    pub fn temp_color(temp_c: f64) -> Color {
        if temp_c < 25.0 {
            Self::TEMP_MILD
        } else if temp_c < 32.0 {
            Self::TEMP_WARM
        } else {
            Self::TEMP_HOT
        }
    }

    /// Status line style: warnings for fallbacks and failures.
    pub fn status(message: &str) -> Style {
        let lower = message.to_lowercase();
        if lower.contains("unavailable") || lower.contains("failed") || lower.contains("must") {
            Self::warning()
        } else {
            Self::success()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bands() {
        assert_eq!(Theme::temp_color(22.0), Theme::TEMP_MILD);
        assert_eq!(Theme::temp_color(25.0), Theme::TEMP_WARM);
        assert_eq!(Theme::temp_color(33.5), Theme::TEMP_HOT);
    }

    #[test]
    fn fallback_status_is_a_warning() {
        assert_eq!(
            Theme::status("Live forecast unavailable (timed out) - showing demo data"),
            Theme::warning()
        );
        assert_eq!(Theme::status("Export failed: permission denied"), Theme::warning());
        assert_eq!(Theme::status("Forecast updated: 7 days from Open-Meteo"), Theme::success());
    }
}
