use super::outlook::WeeklyOutlook;
use super::uncertainty::{self, Perturbation};
use super::{demand, scheduler};
use crate::models::{BlockConfig, ForecastSeries, IrrigationEvent, UncertaintyBand, WeeklyDemand};
use chrono::NaiveDate;

/// Everything the dashboard shows for one block and one forecast
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPlan {
    pub demand: WeeklyDemand,
    pub band: UncertaintyBand,
    pub events: Vec<IrrigationEvent>,
    pub outlook: WeeklyOutlook,
}

impl WeeklyPlan {
    /// Run calculator, uncertainty and splitter for the block.
    pub fn build(
        series: &ForecastSeries,
        block: &BlockConfig,
        perturbation: &Perturbation,
        today: NaiveDate,
    ) -> Self {
        let demand = demand::compute_for_block(series, block);
        let band = uncertainty::band(
            series,
            block.crop,
            block.stage,
            block.soil,
            block.efficiency,
            perturbation,
        );
        let events = scheduler::split(
            demand.weekly_gross_mm,
            block.area_ha,
            block.max_events.min(i32::MAX as u32) as i32,
            Some(block.max_event_depth_mm),
            block.pump_rate(),
        );
        let outlook = WeeklyOutlook::from_demand(&demand, today);

        tracing::debug!(
            "Plan for {} ({}): gross {:.1} mm in {} events",
            block.crop,
            block.stage,
            demand.weekly_gross_mm,
            events.len()
        );

        Self {
            demand,
            band,
            events,
            outlook,
        }
    }

    pub fn total_volume_m3(&self) -> f64 {
        self.events.iter().map(|e| e.volume_m3).sum()
    }

    pub fn total_pump_hours(&self) -> Option<f64> {
        self.events.iter().map(|e| e.duration_hr).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, DailyObservation, ForecastOrigin, GrowthStage, SoilType};
    use chrono::{Duration, Utc};

    fn dry_week() -> ForecastSeries {
        let start = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let days = (0..7)
            .map(|i| DailyObservation {
                date: start + Duration::days(i),
                temp_max_c: Some(28.0),
                rainfall_mm: 0.0,
                et0_mm: 4.0,
            })
            .collect();
        ForecastSeries::new(ForecastOrigin::Live, Utc::now(), days)
    }

    fn block() -> BlockConfig {
        BlockConfig {
            crop: Crop::Custom,
            stage: GrowthStage::Mid,
            soil: SoilType::Loam,
            area_ha: 1.0,
            efficiency: 0.8,
            pump_rate_m3h: 50.0,
            max_event_depth_mm: 25.0,
            max_events: 3,
        }
    }

    #[test]
    fn plan_chains_all_stages() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let plan = WeeklyPlan::build(&dry_week(), &block(), &Perturbation::default(), today);

        assert!((plan.demand.weekly_gross_mm - 35.0).abs() < 1e-9);
        assert!((plan.band.med_mm - plan.demand.weekly_gross_mm).abs() < 1e-9);
        // ceil(35 / 25) = 2 events of 17.5 mm
        assert_eq!(plan.events.len(), 2);
        assert!((plan.events[0].depth_mm - 17.5).abs() < 1e-9);
        assert!((plan.total_volume_m3() - 350.0).abs() < 1e-6);
        assert_eq!(plan.events[0].duration_hr, Some(3.5));
        assert_eq!(plan.total_pump_hours(), Some(7.0));
    }

    #[test]
    fn no_pump_means_no_hours() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let block = BlockConfig {
            pump_rate_m3h: 0.0,
            ..block()
        };
        let plan = WeeklyPlan::build(&dry_week(), &block, &Perturbation::default(), today);
        assert_eq!(plan.total_pump_hours(), None);
    }

    #[test]
    fn wet_week_has_no_events() {
        let mut series = dry_week();
        for d in &mut series.days {
            d.rainfall_mm = 30.0;
        }
        let today = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let plan = WeeklyPlan::build(&series, &block(), &Perturbation::default(), today);
        assert!(plan.events.is_empty());
        assert_eq!(plan.total_volume_m3(), 0.0);
    }
}
