use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast day augmented with crop water use and effective rain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDemand {
    pub date: NaiveDate,
    pub temp_max_c: Option<f64>,
    pub rainfall_mm: f64,
    pub et0_mm: f64,
    pub etc_mm: f64,
    pub eff_rain_mm: f64,
}

impl DailyDemand {
    /// Day-level deficit, floored at zero. Display only; the weekly total is
    /// computed from the weekly sums, so surplus days offset deficit days.
    pub fn deficit_mm(&self) -> f64 {
        (self.etc_mm - self.eff_rain_mm).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDemand {
    pub weekly_etc_mm: f64,
    pub weekly_eff_rain_mm: f64,
    pub weekly_net_mm: f64,
    pub weekly_gross_mm: f64,
    pub kc_used: f64,
    pub days: Vec<DailyDemand>,
}

impl WeeklyDemand {
    pub fn daily_average_gross_mm(&self) -> f64 {
        if self.days.is_empty() {
            0.0
        } else {
            self.weekly_gross_mm / self.days.len() as f64
        }
    }
}

/// Weekly gross demand under wet, expected and dry weather assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyBand {
    pub low_mm: f64,
    pub med_mm: f64,
    pub high_mm: f64,
}

impl UncertaintyBand {
    pub fn spread_mm(&self) -> f64 {
        self.high_mm - self.low_mm
    }

    pub fn is_ordered(&self) -> bool {
        self.low_mm <= self.med_mm && self.med_mm <= self.high_mm
    }
}
