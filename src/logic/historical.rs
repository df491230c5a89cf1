use crate::error::{IrrigOpsError, Result};
use crate::models::{HistorySummary, MonthlyRequirement};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

const DATE_COLUMN: &str = "date";
const REQUIREMENT_COLUMN: &str = "irrigation_requirement_mm";

/// Load a daily history table and reduce it to monthly mean requirements.
pub fn load_from_path(path: &Path) -> Result<HistorySummary> {
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<HistorySummary> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (date_idx, req_idx) = match (column(DATE_COLUMN), column(REQUIREMENT_COLUMN)) {
        (Some(d), Some(r)) => (d, r),
        _ => {
            return Err(IrrigOpsError::InvalidData(format!(
                "history CSV needs '{}' and '{}' columns",
                DATE_COLUMN, "Irrigation_requirement_mm"
            )))
        }
    };

    let mut days_analyzed = 0;
    let mut by_month: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        days_analyzed += 1;

        let date = record.get(date_idx).and_then(parse_date);
        let value = record
            .get(req_idx)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        if let (Some(date), Some(value)) = (date, value) {
            let Some(month) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) else {
                continue;
            };
            let entry = by_month.entry(month).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let monthly = by_month
        .into_iter()
        .map(|(month, (sum, samples))| MonthlyRequirement {
            month,
            mean_mm: sum / samples as f64,
            samples,
        })
        .collect();

    tracing::debug!("Loaded {} historical rows", days_analyzed);

    Ok(HistorySummary {
        days_analyzed,
        monthly,
    })
}

/// Accepts plain dates and timestamps with a date prefix.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
