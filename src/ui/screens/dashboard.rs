use crate::logic::{Acquired, WeeklyPlan};
use crate::models::BlockConfig;
use crate::ui::components::{
    depth_gauge, et0_gauge, r2_gauge, rainfall_gauge, temperature_gauge, Bar, BarsWidget,
};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct DashboardScreen<'a> {
    pub location: &'a str,
    pub block: &'a BlockConfig,
    pub acquired: Option<&'a Acquired>,
    pub plan: Option<&'a WeeklyPlan>,
    pub r2: f64,
    pub status_message: Option<&'a str>,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(
        location: &'a str,
        block: &'a BlockConfig,
        acquired: Option<&'a Acquired>,
        plan: Option<&'a WeeklyPlan>,
    ) -> Self {
        Self {
            location,
            block,
            acquired,
            plan,
            r2: crate::logic::accuracy::DEFAULT_DISPLAY_R2,
            status_message: None,
        }
    }

    pub fn with_r2(mut self, r2: f64) -> Self {
        self.r2 = r2;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for DashboardScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(5), // Gauges row
                Constraint::Min(10),   // Outlook and daily chart
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_gauges(chunks[1], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);

        self.render_outlook(middle[0], buf);
        self.render_daily(middle[1], buf);

        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::status(msg))).render(chunks[3], buf);
        }

        render_nav(chunks[4], buf);
    }
}

impl DashboardScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            "IrrigOps - {} ({}, {} stage, {} soil)",
            self.location, self.block.crop, self.block.stage, self.block.soil
        );

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let info = match self.acquired {
            Some(a) => {
                let style = if a.is_live() { Theme::dim() } else { Theme::warning() };
                Span::styled(
                    format!(
                        "Source: {} | fetched {}",
                        a.series.origin,
                        a.series.fetched_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    style,
                )
            }
            None => Span::styled("Fetching forecast...", Theme::dim()),
        };
        Paragraph::new(info).block(block).render(area, buf);
    }

    fn render_gauges(&self, area: Rect, buf: &mut Buffer) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 6); 6])
            .split(area);

        let demand = self.plan.map(|p| &p.demand);
        let series = self.acquired.map(|a| &a.series);

        depth_gauge("Gross Demand", demand.map(|d| d.weekly_gross_mm)).render(gauge_chunks[0], buf);
        depth_gauge("Net Demand", demand.map(|d| d.weekly_net_mm)).render(gauge_chunks[1], buf);
        rainfall_gauge("Rainfall", series.map(|s| s.total_rainfall_mm())).render(gauge_chunks[2], buf);
        et0_gauge("ET₀", series.map(|s| s.total_et0_mm())).render(gauge_chunks[3], buf);
        temperature_gauge("Peak Temp", series.and_then(|s| s.max_temp_c())).render(gauge_chunks[4], buf);
        r2_gauge("Model R²", Some(self.r2)).render(gauge_chunks[5], buf);
    }

    fn render_outlook(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Weekly Outlook", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(plan) = self.plan else {
            Paragraph::new(Span::styled("Waiting for forecast data", Theme::dim())).render(inner, buf);
            return;
        };

        let outlook = &plan.outlook;
        let class_style = Style::default()
            .fg(outlook.class.color())
            .add_modifier(Modifier::BOLD);

        // Wet/dry factors can be configured so the scenarios cross over
        let range_note = if plan.band.is_ordered() {
            Span::styled(format!(" (spread {:.1})", plan.band.spread_mm()), Theme::dim())
        } else {
            Span::styled(" (wet/dry scenarios cross)", Theme::warning())
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Intensity: ", Theme::dim()),
                Span::styled(outlook.class.as_str(), class_style),
            ]),
            Line::from(vec![
                Span::styled("Week ending: ", Theme::dim()),
                Span::styled(outlook.week_ending.format("%a %d %b").to_string(), Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Apply: ", Theme::dim()),
                Span::styled(format!("{:.1} mm", outlook.total_mm), Theme::highlight()),
                Span::styled(format!(" ({:.1} mm/day)", outlook.daily_avg_mm), Theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("Range: ", Theme::dim()),
                Span::styled(
                    format!("{:.1} - {:.1} mm", plan.band.low_mm, plan.band.high_mm),
                    Theme::normal(),
                ),
                range_note,
            ]),
            Line::from(vec![
                Span::styled("Kc: ", Theme::dim()),
                Span::styled(format!("{:.2}", plan.demand.kc_used), Theme::normal()),
                Span::styled("  Efficiency: ", Theme::dim()),
                Span::styled(format!("{:.0}%", self.block.efficiency * 100.0), Theme::normal()),
            ]),
            Line::from(""),
        ];

        if plan.events.is_empty() {
            lines.push(Line::from(Span::styled("No irrigation needed", Theme::success())));
        } else {
            lines.push(Line::from(vec![
                Span::styled("Events: ", Theme::dim()),
                Span::styled(
                    format!(
                        "{} × {:.1} mm, {:.0} m³ total",
                        plan.events.len(),
                        plan.events[0].depth_mm,
                        plan.total_volume_m3()
                    ),
                    Theme::normal(),
                ),
            ]));
            if let Some(hours) = plan.total_pump_hours() {
                lines.push(Line::from(vec![
                    Span::styled("Pumping: ", Theme::dim()),
                    Span::styled(format!("{:.1} h", hours), Theme::normal()),
                ]));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_daily(&self, area: Rect, buf: &mut Buffer) {
        let bars = self
            .plan
            .map(|plan| {
                plan.demand
                    .days
                    .iter()
                    .map(|d| Bar::new(d.date.format("%a").to_string(), d.deficit_mm(), Theme::DEMAND))
                    .collect()
            })
            .unwrap_or_default();

        BarsWidget::new("Daily Net Deficit (mm)", bars).render(area, buf);
    }
}

pub fn render_nav(area: Rect, buf: &mut Buffer) {
    let nav = Line::from(vec![
        Span::styled("[1]", Theme::nav_key()),
        Span::styled("Dashboard ", Theme::nav_label()),
        Span::styled("[2]", Theme::nav_key()),
        Span::styled("Forecast ", Theme::nav_label()),
        Span::styled("[3]", Theme::nav_key()),
        Span::styled("Schedule ", Theme::nav_label()),
        Span::styled("[4]", Theme::nav_key()),
        Span::styled("History ", Theme::nav_label()),
        Span::styled("[5]", Theme::nav_key()),
        Span::styled("Accuracy ", Theme::nav_label()),
        Span::styled("[s]", Theme::nav_key()),
        Span::styled("Settings ", Theme::nav_label()),
        Span::styled("[r]", Theme::nav_key()),
        Span::styled("Refresh ", Theme::nav_label()),
        Span::styled("[q]", Theme::nav_key()),
        Span::styled("Quit", Theme::nav_label()),
    ]);

    Paragraph::new(nav).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::uncertainty::Perturbation;
    use crate::models::ForecastSeries;
    use chrono::{NaiveDate, Utc};

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(perturbation: &Perturbation) -> String {
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let block = BlockConfig::default();
        let acquired = Acquired {
            series: ForecastSeries::demo(today, Utc::now()),
            degraded: None,
        };
        let plan = WeeklyPlan::build(&acquired.series, &block, perturbation, today);

        let area = Rect::new(0, 0, 140, 30);
        let mut buf = Buffer::empty(area);
        DashboardScreen::new("Gabiro", &block, Some(&acquired), Some(&plan)).render(area, &mut buf);
        screen_text(&buf)
    }

    #[test]
    fn shows_peak_temperature_gauge() {
        let text = render(&Perturbation::default());
        assert!(text.contains("Peak Temp"));
        assert!(text.contains("spread"));
    }

    #[test]
    fn flags_crossed_scenarios() {
        let crossed = Perturbation {
            wet_rain_factor: 0.5,
            wet_et0_factor: 1.5,
            dry_rain_factor: 1.5,
            dry_et0_factor: 0.5,
        };
        let text = render(&crossed);
        assert!(text.contains("wet/dry scenarios cross"));
    }
}
