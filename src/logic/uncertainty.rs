use super::demand;
use crate::models::{Crop, ForecastSeries, GrowthStage, SoilType, UncertaintyBand};
use serde::{Deserialize, Serialize};

/// Input scaling for the wet (low demand) and dry (high demand) scenarios.
///
/// The defaults are ±20% rainfall and ±10% reference evapotranspiration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perturbation {
    pub wet_rain_factor: f64,
    pub wet_et0_factor: f64,
    pub dry_rain_factor: f64,
    pub dry_et0_factor: f64,
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            wet_rain_factor: 1.2,
            wet_et0_factor: 0.9,
            dry_rain_factor: 0.8,
            dry_et0_factor: 1.1,
        }
    }
}

impl Perturbation {
    pub fn is_valid(&self) -> bool {
        [
            self.wet_rain_factor,
            self.wet_et0_factor,
            self.dry_rain_factor,
            self.dry_et0_factor,
        ]
        .iter()
        .all(|f| f.is_finite() && *f > 0.0)
    }
}

/// Weekly gross demand under the expected, wet and dry scenarios.
///
/// Each scenario runs on its own perturbed copy of `series`. The result is
/// not sorted; with the default factors and positive inputs it comes out
/// ordered low <= med <= high.
pub fn band(
    series: &ForecastSeries,
    crop: Crop,
    stage: GrowthStage,
    soil: SoilType,
    efficiency: f64,
    perturbation: &Perturbation,
) -> UncertaintyBand {
    let gross = |s: &ForecastSeries| demand::compute(s, crop, stage, soil, efficiency).weekly_gross_mm;

    let wet = series.perturbed(perturbation.wet_rain_factor, perturbation.wet_et0_factor);
    let dry = series.perturbed(perturbation.dry_rain_factor, perturbation.dry_et0_factor);

    UncertaintyBand {
        low_mm: gross(&wet),
        med_mm: gross(series),
        high_mm: gross(&dry),
    }
}
