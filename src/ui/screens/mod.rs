pub mod accuracy;
pub mod dashboard;
pub mod forecast;
pub mod history;
pub mod schedule;
pub mod settings;

pub use accuracy::AccuracyScreen;
pub use dashboard::DashboardScreen;
pub use forecast::ForecastScreen;
pub use history::HistoryScreen;
pub use schedule::ScheduleScreen;
pub use settings::{SettingsField, SettingsScreen};
