use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Built-in 7-day series used whenever the live provider cannot deliver.
const DEMO_TEMP_MAX_C: [f64; 7] = [27.4, 28.1, 26.9, 28.6, 29.2, 27.8, 27.1];
const DEMO_RAINFALL_MM: [f64; 7] = [0.0, 2.4, 7.8, 0.0, 0.0, 1.6, 0.3];
const DEMO_ET0_MM: [f64; 7] = [4.3, 4.6, 3.7, 4.9, 5.2, 4.4, 4.1];

/// One day of the daily weather forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub temp_max_c: Option<f64>,
    pub rainfall_mm: f64,
    pub et0_mm: f64, // FAO-56 reference evapotranspiration
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastOrigin {
    Live,
    Demo,
}

impl ForecastOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastOrigin::Live => "Open-Meteo (FAO-56 ET₀)",
            ForecastOrigin::Demo => "Built-in demo data",
        }
    }
}

impl std::fmt::Display for ForecastOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Consecutive daily observations starting at the provider's first day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub origin: ForecastOrigin,
    pub fetched_at: DateTime<Utc>,
    pub days: Vec<DailyObservation>,
}

impl ForecastSeries {
    pub fn new(origin: ForecastOrigin, fetched_at: DateTime<Utc>, days: Vec<DailyObservation>) -> Self {
        Self {
            origin,
            fetched_at,
            days,
        }
    }

    /// The fixed fallback week, dated from `start`.
    pub fn demo(start: NaiveDate, fetched_at: DateTime<Utc>) -> Self {
        let days = (0..DEMO_ET0_MM.len())
            .map(|i| DailyObservation {
                date: start + Duration::days(i as i64),
                temp_max_c: Some(DEMO_TEMP_MAX_C[i]),
                rainfall_mm: DEMO_RAINFALL_MM[i],
                et0_mm: DEMO_ET0_MM[i],
            })
            .collect();

        Self::new(ForecastOrigin::Demo, fetched_at, days)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    pub fn total_rainfall_mm(&self) -> f64 {
        self.days.iter().map(|d| d.rainfall_mm).sum()
    }

    pub fn total_et0_mm(&self) -> f64 {
        self.days.iter().map(|d| d.et0_mm).sum()
    }

    pub fn max_temp_c(&self) -> Option<f64> {
        self.days
            .iter()
            .filter_map(|d| d.temp_max_c)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Independent copy with rainfall and et0 scaled by the given factors.
    pub fn perturbed(&self, rainfall_factor: f64, et0_factor: f64) -> Self {
        let days = self
            .days
            .iter()
            .map(|d| DailyObservation {
                rainfall_mm: d.rainfall_mm * rainfall_factor,
                et0_mm: d.et0_mm * et0_factor,
                ..d.clone()
            })
            .collect();

        Self::new(self.origin, self.fetched_at, days)
    }
}
