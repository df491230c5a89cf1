use crate::models::{IntensityClass, WeeklyDemand};
use chrono::{Datelike, Duration, NaiveDate};

/// Headline figures for the current irrigation week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyOutlook {
    pub week_start: NaiveDate,
    pub week_ending: NaiveDate,
    pub total_mm: f64,
    pub daily_avg_mm: f64,
    pub class: IntensityClass,
}

impl WeeklyOutlook {
    pub fn from_demand(demand: &WeeklyDemand, today: NaiveDate) -> Self {
        let total_mm = demand.weekly_gross_mm;
        Self {
            week_start: today,
            week_ending: week_ending(today),
            total_mm,
            daily_avg_mm: demand.daily_average_gross_mm(),
            class: IntensityClass::from_weekly_mm(total_mm),
        }
    }
}

/// The next Sunday strictly after `today`.
pub fn week_ending(today: NaiveDate) -> NaiveDate {
    let days_from_monday = today.weekday().num_days_from_monday() as i64;
    let to_sunday = (6 - days_from_monday).rem_euclid(7);
    let ending = today + Duration::days(to_sunday);
    if ending <= today {
        ending + Duration::days(7)
    } else {
        ending
    }
}
