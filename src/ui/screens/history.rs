use crate::models::HistorySummary;
use crate::ui::components::{Bar, BarsWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct HistoryScreen<'a> {
    pub summary: Option<&'a HistorySummary>,
    pub error: Option<&'a str>,
}

impl<'a> HistoryScreen<'a> {
    pub fn new(summary: Option<&'a HistorySummary>) -> Self {
        Self {
            summary,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for HistoryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(4), // Summary
                Constraint::Min(8),    // Monthly chart
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("History", Theme::title()),
            Span::styled(" - monthly mean irrigation requirement", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        match self.summary.filter(|s| !s.is_empty()) {
            Some(summary) => {
                render_summary(summary, chunks[1], buf);
                let bars = summary
                    .monthly
                    .iter()
                    .map(|m| Bar::new(m.month.format("%b%y").to_string(), m.mean_mm, Theme::DEMAND))
                    .collect();
                BarsWidget::new("Mean daily requirement (mm)", bars)
                    .precision(1)
                    .render(chunks[2], buf);
            }
            None => self.render_placeholder(chunks[1].union(chunks[2]), buf),
        }

        let nav = Line::from(vec![
            Span::styled("[1-5]", Theme::nav_key()),
            Span::styled("Screens ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

fn render_summary(summary: &HistorySummary, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title("Summary")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    block.render(area, buf);

    let span = match (summary.first_month(), summary.last_month()) {
        (Some(first), Some(last)) => format!("{} to {}", first.format("%b %Y"), last.format("%b %Y")),
        _ => "-".to_string(),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Days analyzed: ", Theme::dim()),
        Span::styled(summary.days_analyzed.to_string(), Theme::normal()),
        Span::styled("   Period: ", Theme::dim()),
        Span::styled(span, Theme::normal()),
    ])];

    if let Some(peak) = summary.peak() {
        lines.push(Line::from(vec![
            Span::styled("Peak month: ", Theme::dim()),
            Span::styled(
                format!("{} ({:.2} mm/day)", peak.month.format("%B %Y"), peak.mean_mm),
                Theme::highlight(),
            ),
        ]));
    }

    Paragraph::new(lines).render(inner, buf);
}

impl HistoryScreen<'_> {
    fn render_placeholder(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.error {
            Some(err) => vec![
                Line::from(Span::styled("Historical data could not be loaded", Theme::error())),
                Line::from(Span::styled(err, Theme::dim())),
            ],
            None => vec![
                Line::from(Span::styled("No historical data loaded", Theme::dim())),
                Line::from(Span::styled(
                    "Set data.historical_csv in config.yaml to a CSV with date and Irrigation_requirement_mm columns",
                    Theme::dim(),
                )),
            ],
        };

        Paragraph::new(lines).render(inner, buf);
    }
}
