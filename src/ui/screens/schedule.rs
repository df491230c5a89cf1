use crate::logic::WeeklyPlan;
use crate::models::BlockConfig;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Widget},
};
use std::path::Path;

pub struct ScheduleScreen<'a> {
    pub plan: Option<&'a WeeklyPlan>,
    pub block: &'a BlockConfig,
    pub export_dir: &'a Path,
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
}

impl<'a> ScheduleScreen<'a> {
    pub fn new(plan: Option<&'a WeeklyPlan>, block: &'a BlockConfig, export_dir: &'a Path) -> Self {
        Self {
            plan,
            block,
            export_dir,
            selected_index: 0,
            status_message: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for ScheduleScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Event table
                Constraint::Length(4), // Totals
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_table(chunks[1], buf);
        self.render_totals(chunks[2], buf);

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::status(msg))).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Select ", Theme::nav_label()),
            Span::styled("[e]", Theme::nav_key()),
            Span::styled(
                format!("Export CSV to {} ", self.export_dir.display()),
                Theme::nav_label(),
            ),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl ScheduleScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Irrigation Schedule", Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = match self.plan {
            Some(plan) => {
                let class = plan.outlook.class;
                Line::from(vec![
                    Span::styled(
                        format!(
                            "{} to {} | {:.2} ha | max {:.0} mm per event | ",
                            plan.outlook.week_start,
                            plan.outlook.week_ending,
                            self.block.area_ha,
                            self.block.max_event_depth_mm
                        ),
                        Theme::dim(),
                    ),
                    Span::styled(
                        class.as_str(),
                        Style::default().fg(class.color()).add_modifier(Modifier::BOLD),
                    ),
                ])
            }
            None => Line::from(Span::styled("Waiting for forecast data", Theme::dim())),
        };

        Paragraph::new(info).block(block).render(area, buf);
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let table_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let events = self.plan.map(|p| p.events.as_slice()).unwrap_or_default();
        if events.is_empty() {
            let inner = table_block.inner(area);
            table_block.render(area, buf);
            let msg = if self.plan.is_some() {
                Span::styled("No irrigation needed this week", Theme::success())
            } else {
                Span::styled("No schedule yet", Theme::dim())
            };
            Paragraph::new(msg).render(inner, buf);
            return;
        }

        let header_cells = ["Event", "Depth (mm)", "Volume (m³)", "Duration (h)"]
            .iter()
            .map(|h| Cell::from(*h).style(Theme::header()));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = events
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Theme::normal()
                };

                Row::new(vec![
                    Cell::from(e.event.to_string()),
                    Cell::from(format!("{:.2}", e.depth_mm)),
                    Cell::from(format!("{:.1}", e.volume_m3)),
                    Cell::from(
                        e.duration_hr
                            .map(|h| format!("{:.2}", h))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(14),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(table_block)
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        state.select(Some(self.selected_index));

        ratatui::widgets::StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_totals(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Totals")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(plan) = self.plan else {
            return;
        };

        let hours = match plan.total_pump_hours() {
            Some(h) => format!("{:.2} h", h),
            None => "set a pump rate in Settings".to_string(),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Gross depth: ", Theme::dim()),
                Span::styled(format!("{:.1} mm", plan.demand.weekly_gross_mm), Theme::highlight()),
                Span::styled("   Volume: ", Theme::dim()),
                Span::styled(format!("{:.1} m³", plan.total_volume_m3()), Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Pumping: ", Theme::dim()),
                Span::styled(hours, Theme::normal()),
            ]),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
