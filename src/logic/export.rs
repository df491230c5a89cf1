use crate::error::Result;
use crate::models::IrrigationEvent;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One row of the downloadable schedule table
#[derive(Debug, Serialize)]
struct ScheduleRow {
    event: u32,
    depth_mm: f64,
    volume_m3: f64,
    duration_hr: Option<f64>,
}

impl From<&IrrigationEvent> for ScheduleRow {
    fn from(e: &IrrigationEvent) -> Self {
        Self {
            event: e.event,
            depth_mm: round_to(e.depth_mm, 2),
            volume_m3: round_to(e.volume_m3, 2),
            duration_hr: e.duration_hr,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Write `event,depth_mm,volume_m3,duration_hr`; absent durations are empty cells.
pub fn write_schedule<W: Write>(events: &[IrrigationEvent], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if events.is_empty() {
        // serialize() writes headers lazily; keep them for an empty schedule
        wtr.write_record(["event", "depth_mm", "volume_m3", "duration_hr"])?;
    }
    for event in events {
        wtr.serialize(ScheduleRow::from(event))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn default_file_name(week_start: NaiveDate) -> String {
    format!("irrigation_schedule_{}.csv", week_start.format("%Y-%m-%d"))
}

/// Write the schedule to `path`, or to the default file name inside `path`
/// when it is a directory. Returns the file written.
pub fn export_schedule(events: &[IrrigationEvent], path: &Path, week_start: NaiveDate) -> Result<PathBuf> {
    let target = if path.is_dir() {
        path.join(default_file_name(week_start))
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(&target)?;
    write_schedule(events, file)?;

    tracing::info!("Exported {} irrigation events to {:?}", events.len(), target);
    Ok(target)
}
