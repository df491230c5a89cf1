use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mean daily irrigation requirement for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRequirement {
    pub month: NaiveDate, // first day of the month
    pub mean_mm: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub days_analyzed: usize,
    pub monthly: Vec<MonthlyRequirement>,
}

impl HistorySummary {
    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }

    pub fn first_month(&self) -> Option<NaiveDate> {
        self.monthly.first().map(|m| m.month)
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.monthly.last().map(|m| m.month)
    }

    pub fn peak(&self) -> Option<&MonthlyRequirement> {
        self.monthly
            .iter()
            .max_by(|a, b| a.mean_mm.partial_cmp(&b.mean_mm).unwrap_or(std::cmp::Ordering::Equal))
    }
}
