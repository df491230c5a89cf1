use crate::models::IrrigationEvent;

/// Per-event depth used when no usable maximum is supplied
pub const DEFAULT_MAX_EVENT_DEPTH_MM: f64 = 25.0;

/// Smallest block area used in volume conversion; keeps a zero or negative
/// area from collapsing the volume to nothing.
pub const AREA_FLOOR_HA: f64 = 0.0001;

const M2_PER_HA: f64 = 10_000.0;

/// Partition a weekly gross depth into equal-depth irrigation events.
///
/// The event count is the fewest that keeps every pass at or under
/// `max_event_depth_mm`, capped at `n_splits`. Invalid input yields an
/// empty schedule rather than an error.
pub fn split(
    total_mm: f64,
    area_ha: f64,
    n_splits: i32,
    max_event_depth_mm: Option<f64>,
    pump_rate_m3h: Option<f64>,
) -> Vec<IrrigationEvent> {
    if !total_mm.is_finite() || total_mm <= 0.0 || n_splits <= 0 {
        return Vec::new();
    }

    let max_depth = max_event_depth_mm
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(DEFAULT_MAX_EVENT_DEPTH_MM);

    let n_min = (total_mm / max_depth).ceil();
    let n = (n_min as i64).clamp(1, n_splits as i64) as u32;

    let depth_mm = total_mm / n as f64;
    let area_m2 = area_floor(area_ha) * M2_PER_HA;
    let volume_m3 = depth_mm / 1000.0 * area_m2;
    let duration_hr = pump_rate_m3h
        .filter(|rate| *rate > 0.0)
        .map(|rate| round2(volume_m3 / rate));

    (1..=n)
        .map(|event| IrrigationEvent {
            event,
            depth_mm,
            volume_m3,
            duration_hr,
        })
        .collect()
}

fn area_floor(area_ha: f64) -> f64 {
    if area_ha.is_nan() {
        AREA_FLOOR_HA
    } else {
        area_ha.max(AREA_FLOOR_HA)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
