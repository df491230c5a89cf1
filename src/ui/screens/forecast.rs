use crate::logic::{Acquired, WeeklyPlan};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

pub struct ForecastScreen<'a> {
    pub acquired: Option<&'a Acquired>,
    pub plan: Option<&'a WeeklyPlan>,
}

impl<'a> ForecastScreen<'a> {
    pub fn new(acquired: Option<&'a Acquired>, plan: Option<&'a WeeklyPlan>) -> Self {
        Self { acquired, plan }
    }
}

impl Widget for ForecastScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(2), // Source / warning
                Constraint::Min(8),    // Daily table
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Forecast", Theme::title()),
            Span::styled(" - daily weather and crop water use", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_source(chunks[1], buf);
        self.render_table(chunks[2], buf);

        let nav = Line::from(vec![
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[1-5]", Theme::nav_key()),
            Span::styled("Screens ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl ForecastScreen<'_> {
    fn render_source(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();
        match self.acquired {
            Some(a) => {
                let range = match (a.series.first_date(), a.series.last_date()) {
                    (Some(first), Some(last)) => format!(" | {} to {}", first, last),
                    _ => String::new(),
                };
                let peak = a
                    .series
                    .max_temp_c()
                    .map(|t| format!(" | peak {:.1}°C", t))
                    .unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled("Source: ", Theme::dim()),
                    Span::styled(a.series.origin.as_str(), Theme::normal()),
                    Span::styled(range, Theme::dim()),
                    Span::styled(peak, Theme::dim()),
                ]));
                if let Some(reason) = &a.degraded {
                    lines.push(Line::from(Span::styled(
                        format!("Live forecast unavailable: {}", reason),
                        Theme::warning(),
                    )));
                }
            }
            None => lines.push(Line::from(Span::styled("Fetching forecast...", Theme::dim()))),
        }
        Paragraph::new(lines).render(area, buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Daily Forecast")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(plan) = self.plan else {
            Paragraph::new(Span::styled("No data available", Theme::dim())).render(inner, buf);
            return;
        };

        let header = Row::new(vec![
            Cell::from("Date"),
            Cell::from("Max °C"),
            Cell::from("Rain mm"),
            Cell::from("ET₀ mm"),
            Cell::from("ETc mm"),
            Cell::from("Eff. rain"),
            Cell::from("Deficit"),
        ])
        .style(Theme::header());

        let mut rows: Vec<Row> = plan
            .demand
            .days
            .iter()
            .map(|d| {
                let temp = d
                    .temp_max_c
                    .map(|t| format!("{:.1}", t))
                    .unwrap_or_else(|| "-".to_string());
                let temp_color = d.temp_max_c.map(Theme::temp_color).unwrap_or(Theme::DIM);

                Row::new(vec![
                    Cell::from(d.date.format("%a %d %b").to_string()),
                    Cell::from(temp).style(Style::default().fg(temp_color)),
                    Cell::from(format!("{:.1}", d.rainfall_mm)).style(Style::default().fg(Theme::RAIN)),
                    Cell::from(format!("{:.1}", d.et0_mm)).style(Style::default().fg(Theme::ET0)),
                    Cell::from(format!("{:.2}", d.etc_mm)),
                    Cell::from(format!("{:.2}", d.eff_rain_mm)),
                    Cell::from(format!("{:.2}", d.deficit_mm())).style(Style::default().fg(Theme::DEMAND)),
                ])
            })
            .collect();

        let demand = &plan.demand;
        rows.push(
            Row::new(vec![
                Cell::from("Week"),
                Cell::from(""),
                Cell::from(format!("{:.1}", demand.days.iter().map(|d| d.rainfall_mm).sum::<f64>())),
                Cell::from(format!("{:.1}", demand.days.iter().map(|d| d.et0_mm).sum::<f64>())),
                Cell::from(format!("{:.2}", demand.weekly_etc_mm)),
                Cell::from(format!("{:.2}", demand.weekly_eff_rain_mm)),
                Cell::from(format!("{:.2}", demand.weekly_net_mm)),
            ])
            .style(Theme::highlight()),
        );

        let widths = [
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(8),
        ];

        Table::new(rows, widths).header(header).render(inner, buf);
    }
}
