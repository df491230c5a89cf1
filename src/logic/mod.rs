pub mod accuracy;
pub mod demand;
pub mod export;
pub mod forecast_service;
pub mod historical;
pub mod outlook;
pub mod plan;
pub mod scheduler;
pub mod uncertainty;

pub use accuracy::AccuracyOutcome;
pub use forecast_service::{Acquired, ForecastRequest, ForecastService};
pub use plan::WeeklyPlan;
