use crate::models::IntensityClass;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    min: f64,
    max: f64,
    thresholds: Vec<(f64, Color)>,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            min: 0.0,
            max: 100.0,
            thresholds: Vec::new(),
            precision: 1,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn thresholds(mut self, thresholds: Vec<(f64, Color)>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn get_color(&self, value: f64) -> Color {
        for (threshold, color) in self.thresholds.iter().rev() {
            if value >= *threshold {
                return *color;
            }
        }
        Theme::FG
    }

    fn fill_ratio(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        match self.value {
            Some(value) => {
                let color = self.get_color(value);
                let value_str = format!("{:.prec$}{}", value, self.unit, prec = self.precision);

                let value_line =
                    Line::from(vec![Span::styled(value_str, Style::default().fg(color))]);
                Paragraph::new(value_line).render(inner, buf);

                // Bar on the second line if there is room
                if inner.height >= 2 {
                    let bar_area = Rect {
                        x: inner.x,
                        y: inner.y + 1,
                        width: inner.width,
                        height: 1,
                    };

                    let filled = (bar_area.width as f64 * self.fill_ratio(value)) as u16;

                    for x in bar_area.x..bar_area.x + bar_area.width {
                        let ch = if x < bar_area.x + filled {
                            '█'
                        } else {
                            '░'
                        };
                        buf[(x, bar_area.y)].set_char(ch).set_fg(color);
                    }
                }
            }
            None => {
                let na_line = Line::from(vec![Span::styled("N/A", Theme::dim())]);
                Paragraph::new(na_line).render(inner, buf);
            }
        }
    }
}

/// Weekly depth in mm, colored by intensity class.
pub fn depth_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " mm")
        .range(0.0, 60.0)
        .thresholds(vec![
            (0.0, IntensityClass::Minimal.color()),
            (5.0, IntensityClass::Light.color()),
            (20.0, IntensityClass::Moderate.color()),
            (40.0, IntensityClass::Heavy.color()),
        ])
}

pub fn rainfall_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " mm")
        .range(0.0, 50.0)
        .thresholds(vec![(0.0, Theme::RAIN)])
}

pub fn et0_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " mm")
        .range(0.0, 50.0)
        .thresholds(vec![(0.0, Theme::ET0)])
}

pub fn temperature_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "°C")
        .range(10.0, 40.0)
        .thresholds(vec![
            (0.0, Theme::TEMP_MILD),
            (25.0, Theme::TEMP_WARM),
            (32.0, Theme::TEMP_HOT),
        ])
}

/// Coefficient of determination, 0-1.
pub fn r2_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "")
        .range(0.0, 1.0)
        .precision(2)
        .thresholds(vec![
            (f64::NEG_INFINITY, Theme::ERROR),
            (0.5, Theme::WARNING),
            (0.75, Theme::SUCCESS),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_follows_thresholds() {
        let gauge = depth_gauge("Demand", Some(30.0));
        assert_eq!(gauge.get_color(30.0), IntensityClass::Moderate.color());
        assert_eq!(gauge.get_color(2.0), IntensityClass::Minimal.color());
        assert_eq!(gauge.get_color(45.0), IntensityClass::Heavy.color());
    }

    #[test]
    fn fill_ratio_is_clamped() {
        let gauge = r2_gauge("R²", Some(0.8));
        assert_eq!(gauge.fill_ratio(-0.4), 0.0);
        assert_eq!(gauge.fill_ratio(1.3), 1.0);

        let flat = GaugeWidget::new("x", Some(1.0), "").range(5.0, 5.0);
        assert_eq!(flat.fill_ratio(5.0), 0.0);
    }

    #[test]
    fn renders_missing_value_as_na() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        temperature_gauge("Max Temp", None).render(area, &mut buf);

        let row: String = (1..4).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row, "N/A");
    }
}
