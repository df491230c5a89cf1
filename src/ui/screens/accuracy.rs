use crate::logic::AccuracyOutcome;
use crate::ui::components::r2_gauge;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct AccuracyScreen<'a> {
    pub outcome: &'a AccuracyOutcome,
}

impl<'a> AccuracyScreen<'a> {
    pub fn new(outcome: &'a AccuracyOutcome) -> Self {
        Self { outcome }
    }
}

impl Widget for AccuracyScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(5), // R² gauge
                Constraint::Min(6),    // Details
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Model Accuracy", Theme::title()),
            Span::styled(" - predicted vs observed requirement", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let gauge_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(chunks[1]);
        r2_gauge("R²", Some(self.outcome.display_r2())).render(gauge_area[0], buf);

        self.render_details(chunks[2], buf);

        let nav = Line::from(vec![
            Span::styled("[1-5]", Theme::nav_key()),
            Span::styled("Screens ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl AccuracyScreen<'_> {
    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Validation")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        match self.outcome {
            AccuracyOutcome::Scored { report, .. } => {
                lines.push(Line::from(vec![
                    Span::styled("MAE:  ", Theme::dim()),
                    Span::styled(format!("{:.3} mm", report.mae), Theme::normal()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("RMSE: ", Theme::dim()),
                    Span::styled(format!("{:.3} mm", report.rmse), Theme::normal()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("R²:   ", Theme::dim()),
                    Span::styled(format!("{:.3}", report.r2), Theme::normal()),
                ]));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(self.outcome.message(), Theme::dim())));
            }
            AccuracyOutcome::NotProvided => {
                lines.push(Line::from(Span::styled(self.outcome.message(), Theme::dim())));
                lines.push(Line::from(Span::styled(
                    "Set data.accuracy_csv in config.yaml (columns: date, predicted_mm, actual_mm)",
                    Theme::dim(),
                )));
            }
            AccuracyOutcome::Unavailable { .. } => {
                lines.push(Line::from(Span::styled(self.outcome.message(), Theme::warning())));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
