use crate::models::{BlockConfig, Crop, DailyDemand, ForecastSeries, GrowthStage, SoilType, WeeklyDemand};

/// Efficiency floor. At the floor the net requirement is amplified 20x.
pub const EFFICIENCY_FLOOR: f64 = 0.05;

/// Convert a daily forecast into crop water use and the weekly irrigation
/// requirement.
///
/// Rainfall surplus is not banked: the net requirement is floored at zero
/// and nothing carries into the following week.
pub fn compute(
    series: &ForecastSeries,
    crop: Crop,
    stage: GrowthStage,
    soil: SoilType,
    efficiency: f64,
) -> WeeklyDemand {
    let kc = crop.coefficients().for_stage(stage);
    let rain_fraction = soil.effective_rain_fraction();

    let days: Vec<DailyDemand> = series
        .days
        .iter()
        .map(|d| DailyDemand {
            date: d.date,
            temp_max_c: d.temp_max_c,
            rainfall_mm: d.rainfall_mm,
            et0_mm: d.et0_mm,
            etc_mm: d.et0_mm * kc,
            eff_rain_mm: d.rainfall_mm * rain_fraction,
        })
        .collect();

    let weekly_etc_mm: f64 = days.iter().map(|d| d.etc_mm).sum();
    let weekly_eff_rain_mm: f64 = days.iter().map(|d| d.eff_rain_mm).sum();
    let weekly_net_mm = (weekly_etc_mm - weekly_eff_rain_mm).max(0.0);
    let weekly_gross_mm = gross_from_net(weekly_net_mm, efficiency);

    WeeklyDemand {
        weekly_etc_mm,
        weekly_eff_rain_mm,
        weekly_net_mm,
        weekly_gross_mm,
        kc_used: kc,
        days,
    }
}

pub fn compute_for_block(series: &ForecastSeries, block: &BlockConfig) -> WeeklyDemand {
    compute(series, block.crop, block.stage, block.soil, block.efficiency)
}

/// Gross application depth needed to deliver `net_mm` at the given efficiency.
pub fn gross_from_net(net_mm: f64, efficiency: f64) -> f64 {
    net_mm / efficiency.max(EFFICIENCY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyObservation, ForecastOrigin};
    use chrono::{Duration, NaiveDate, Utc};
    use proptest::prelude::*;

    fn series(et0: &[f64], rain: &[f64]) -> ForecastSeries {
        let start = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        let days = et0
            .iter()
            .zip(rain)
            .enumerate()
            .map(|(i, (e, r))| DailyObservation {
                date: start + Duration::days(i as i64),
                temp_max_c: Some(27.0),
                rainfall_mm: *r,
                et0_mm: *e,
            })
            .collect();
        ForecastSeries::new(ForecastOrigin::Live, Utc::now(), days)
    }

    #[test]
    fn dry_week_reference_scenario() {
        // Custom crop: Kc mid = 1.0; Loam: f = 0.6
        let s = series(&[4.0; 7], &[0.0; 7]);
        let demand = compute(&s, Crop::Custom, GrowthStage::Mid, SoilType::Loam, 0.8);

        assert!((demand.weekly_etc_mm - 28.0).abs() < 1e-9);
        assert_eq!(demand.weekly_eff_rain_mm, 0.0);
        assert!((demand.weekly_net_mm - 28.0).abs() < 1e-9);
        assert!((demand.weekly_gross_mm - 35.0).abs() < 1e-9);
        assert_eq!(demand.kc_used, 1.0);
        assert_eq!(demand.days.len(), 7);
    }

    #[test]
    fn all_zero_rain_net_equals_etc() {
        let s = series(&[3.1, 4.2, 5.0, 4.4, 3.9, 4.8, 5.3], &[0.0; 7]);
        let demand = compute(&s, Crop::Maize, GrowthStage::Initial, SoilType::Clay, 0.7);
        assert!((demand.weekly_net_mm - demand.weekly_etc_mm).abs() < 1e-9);
    }

    #[test]
    fn daily_series_is_augmented() {
        let s = series(&[5.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0], &[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let demand = compute(&s, Crop::Maize, GrowthStage::Mid, SoilType::Sandy, 1.0);

        assert!((demand.days[0].etc_mm - 6.0).abs() < 1e-9);
        assert!((demand.days[0].eff_rain_mm - 7.0).abs() < 1e-9);
        assert!((demand.days[1].etc_mm - 4.8).abs() < 1e-9);
        assert_eq!(demand.days[0].date, s.days[0].date);
    }

    #[test]
    fn heavy_rain_does_not_go_negative_or_carry_over() {
        let s = series(&[2.0; 7], &[40.0; 7]);
        let demand = compute(&s, Crop::Beans, GrowthStage::Late, SoilType::Loam, 0.8);
        assert_eq!(demand.weekly_net_mm, 0.0);
        assert_eq!(demand.weekly_gross_mm, 0.0);
    }

    #[test]
    fn efficiency_floor_amplifies_twenty_fold() {
        // The floor guards division by zero; a 20x amplification is expected.
        let s = series(&[4.0; 7], &[0.0; 7]);
        for eff in [0.0, 0.01, 0.05, -1.0] {
            let demand = compute(&s, Crop::Custom, GrowthStage::Mid, SoilType::Loam, eff);
            assert!(
                (demand.weekly_gross_mm - 28.0 * 20.0).abs() < 1e-9,
                "efficiency {} gave {}",
                eff,
                demand.weekly_gross_mm
            );
        }
    }

    #[test]
    fn unit_efficiency_gross_equals_net() {
        let s = series(&[4.5; 7], &[1.0; 7]);
        let demand = compute(&s, Crop::Rice, GrowthStage::Mid, SoilType::ClayLoam, 1.0);
        assert_eq!(demand.weekly_gross_mm, demand.weekly_net_mm);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let s = series(&[4.3, 4.6, 3.7, 4.9, 5.2, 4.4, 4.1], &[0.0, 2.4, 7.8, 0.0, 0.0, 1.6, 0.3]);
        let before = s.clone();
        let a = compute(&s, Crop::Maize, GrowthStage::Mid, SoilType::Loam, 0.75);
        let b = compute(&s, Crop::Maize, GrowthStage::Mid, SoilType::Loam, 0.75);
        assert_eq!(a, b);
        assert_eq!(s, before);
    }

    #[test]
    fn block_wrapper_uses_block_fields() {
        let s = series(&[4.0; 7], &[0.0; 7]);
        let block = BlockConfig {
            crop: Crop::Custom,
            stage: GrowthStage::Mid,
            soil: SoilType::Loam,
            efficiency: 0.8,
            ..BlockConfig::default()
        };
        let demand = compute_for_block(&s, &block);
        assert!((demand.weekly_gross_mm - 35.0).abs() < 1e-9);
    }

    fn week() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (
            prop::collection::vec(0.0f64..12.0, 7),
            prop::collection::vec(0.0f64..80.0, 7),
        )
    }

    fn crop() -> impl Strategy<Value = Crop> {
        prop::sample::select(Crop::ALL.to_vec())
    }

    fn soil() -> impl Strategy<Value = SoilType> {
        prop::sample::select(SoilType::ALL.to_vec())
    }

    fn stage() -> impl Strategy<Value = GrowthStage> {
        prop::sample::select(GrowthStage::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn net_is_never_negative(
            (et0, rain) in week(),
            crop in crop(),
            stage in stage(),
            soil in soil(),
            eff in 0.05f64..=1.0,
        ) {
            let demand = compute(&series(&et0, &rain), crop, stage, soil, eff);
            prop_assert!(demand.weekly_net_mm >= 0.0);
        }

        #[test]
        fn gross_at_least_net(
            (et0, rain) in week(),
            crop in crop(),
            soil in soil(),
            eff in 0.05f64..1.0,
        ) {
            let demand = compute(&series(&et0, &rain), crop, GrowthStage::Mid, soil, eff);
            prop_assert!(demand.weekly_gross_mm >= demand.weekly_net_mm);
            if demand.weekly_net_mm > 0.0 {
                prop_assert!(demand.weekly_gross_mm > demand.weekly_net_mm);
            }
        }
    }
}
