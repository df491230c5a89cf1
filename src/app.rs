use crate::config::Config;
use crate::logic::forecast_service::{Clock, SystemClock};
use crate::logic::{accuracy, export, historical, AccuracyOutcome, Acquired, WeeklyPlan};
use crate::models::{BlockConfig, HistorySummary};
use crate::ui::screens::SettingsField;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Forecast,
    Schedule,
    History,
    Accuracy,
    Settings,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Dashboard),
            '2' => Some(Screen::Forecast),
            '3' => Some(Screen::Schedule),
            '4' => Some(Screen::History),
            '5' => Some(Screen::Accuracy),
            's' | 'S' => Some(Screen::Settings),
            _ => None,
        }
    }
}

pub struct ScheduleState {
    pub selected_index: usize,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

pub struct SettingsState {
    pub focused_field: SettingsField,
    pub editing: bool,
    pub edit_buffer: String,
}

impl SettingsState {
    pub fn new() -> Self {
        Self {
            focused_field: SettingsField::Crop,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn start_editing(&mut self, current_value: &str) {
        self.editing = true;
        self.edit_buffer = current_value.to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) -> String {
        self.editing = false;
        std::mem::take(&mut self.edit_buffer)
    }
}

/// Historical table state: not configured, loaded, or failed to load
pub enum HistoryState {
    NotConfigured,
    Loaded(HistorySummary),
    Failed(String),
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub today: NaiveDate,

    // Data
    pub block: BlockConfig,
    pub acquired: Option<Acquired>,
    pub plan: Option<WeeklyPlan>,
    pub history: HistoryState,
    pub accuracy: AccuracyOutcome,

    // Screen states
    pub schedule_state: ScheduleState,
    pub settings_state: SettingsState,

    // UI state
    pub status_message: Option<String>,
    pub needs_refresh: bool,
    pub force_refresh: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let history = match &config.data.historical_csv {
            None => HistoryState::NotConfigured,
            Some(path) => match historical::load_from_path(path) {
                Ok(summary) => HistoryState::Loaded(summary),
                Err(e) => {
                    tracing::warn!("Failed to load historical data from {:?}: {}", path, e);
                    HistoryState::Failed(format!("{}: {}", path.display(), e))
                }
            },
        };

        let accuracy = match &config.data.accuracy_csv {
            Some(path) => accuracy::report_from_path(path),
            None => AccuracyOutcome::NotProvided,
        };

        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            block: config.block.to_block(),
            config,
            today: SystemClock.today(),
            acquired: None,
            plan: None,
            history,
            accuracy,
            schedule_state: ScheduleState::new(),
            settings_state: SettingsState::new(),
            status_message: None,
            needs_refresh: true,
            force_refresh: false,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    /// Ask the main loop to drop the cached forecast and fetch again.
    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.force_refresh = true;
        self.set_status("Refreshing forecast...");
    }

    pub fn update_forecast(&mut self, acquired: Acquired) {
        match &acquired.degraded {
            Some(reason) => self.set_status(&format!(
                "Live forecast unavailable ({}) - showing demo data",
                reason
            )),
            None => self.set_status(&format!(
                "Forecast updated: {} days from {}",
                acquired.series.len(),
                acquired.series.origin
            )),
        }
        self.acquired = Some(acquired);
        self.recompute();
    }

    /// Re-run the weekly pipeline for the current block and forecast.
    pub fn recompute(&mut self) {
        self.plan = self.acquired.as_ref().map(|acquired| {
            WeeklyPlan::build(
                &acquired.series,
                &self.block,
                &self.config.uncertainty,
                self.today,
            )
        });

        let events = self.plan.as_ref().map_or(0, |p| p.events.len());
        if self.schedule_state.selected_index >= events {
            self.schedule_state.selected_index = events.saturating_sub(1);
        }
    }

    pub fn apply_setting(&mut self, field: SettingsField, value: &str) {
        match field.apply(&mut self.block, value) {
            Ok(()) => {
                self.set_status(&format!(
                    "{} set to {}",
                    field.label(),
                    field.value_of(&self.block)
                ));
                self.recompute();
            }
            Err(msg) => self.set_status(&msg),
        }
    }

    pub fn cycle_setting(&mut self, forward: bool) {
        let field = self.settings_state.focused_field;
        if field.is_choice() {
            field.cycle(&mut self.block, forward);
            self.recompute();
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config
            .data
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn export_schedule(&mut self) {
        let Some(plan) = &self.plan else {
            self.set_status("Nothing to export yet");
            return;
        };

        match export::export_schedule(&plan.events, &self.export_dir(), plan.outlook.week_start) {
            Ok(path) => {
                let msg = format!("Schedule exported to {}", path.display());
                self.set_status(&msg);
            }
            Err(e) => {
                tracing::warn!("Schedule export failed: {}", e);
                self.set_status(&format!("Export failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, ForecastSeries};
    use chrono::Utc;

    fn app() -> App {
        let mut app = App::new(Config::default());
        app.today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        app
    }

    fn demo(degraded: Option<&str>) -> Acquired {
        Acquired {
            series: ForecastSeries::demo(NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(), Utc::now()),
            degraded: degraded.map(String::from),
        }
    }

    #[test]
    fn starts_on_dashboard_waiting_for_data() {
        let app = app();
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.needs_refresh);
        assert!(app.plan.is_none());
        assert!(matches!(app.history, HistoryState::NotConfigured));
        assert_eq!(app.accuracy, AccuracyOutcome::NotProvided);
    }

    #[test]
    fn screen_keys() {
        assert_eq!(Screen::from_key('2'), Some(Screen::Forecast));
        assert_eq!(Screen::from_key('5'), Some(Screen::Accuracy));
        assert_eq!(Screen::from_key('S'), Some(Screen::Settings));
        assert_eq!(Screen::from_key('x'), None);
    }

    #[test]
    fn degraded_forecast_sets_warning() {
        let mut app = app();
        app.update_forecast(demo(Some("timed out")));

        assert!(!app.acquired.as_ref().unwrap().is_live());
        assert!(app.plan.is_some());
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("timed out")));
    }

    #[test]
    fn settings_change_recomputes_plan() {
        let mut app = app();
        app.update_forecast(demo(None));
        let before = app.plan.as_ref().unwrap().demand.weekly_gross_mm;

        app.apply_setting(SettingsField::Efficiency, "0.5");
        let after = app.plan.as_ref().unwrap().demand.weekly_gross_mm;
        assert!(after > before);

        app.apply_setting(SettingsField::Efficiency, "2");
        assert_eq!(app.block.efficiency, 0.5);
    }

    #[test]
    fn cycling_only_touches_choice_fields() {
        let mut app = app();
        app.update_forecast(demo(None));
        assert_eq!(app.block.crop, Crop::Maize);

        app.cycle_setting(true);
        assert_eq!(app.block.crop, Crop::Rice);

        app.settings_state.focused_field = SettingsField::AreaHa;
        app.cycle_setting(true);
        assert_eq!(app.block.area_ha, 1.0);
    }

    #[test]
    fn export_without_plan_is_soft() {
        let mut app = app();
        app.export_schedule();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to export yet"));
    }

    #[test]
    fn export_writes_into_configured_dir() {
        let dir = std::env::temp_dir().join(format!("irrigops-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut app = app();
        app.config.data.export_dir = Some(dir.clone());
        app.update_forecast(demo(None));
        app.export_schedule();

        assert!(dir.join("irrigation_schedule_2025-11-17.csv").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
