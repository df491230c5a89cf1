use super::crop::{Crop, GrowthStage, SoilType};
use serde::{Deserialize, Serialize};

/// User-chosen parameters for one irrigated block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub crop: Crop,
    pub stage: GrowthStage,
    pub soil: SoilType,
    pub area_ha: f64,
    pub efficiency: f64,
    pub pump_rate_m3h: f64, // 0 = no pump rating
    pub max_event_depth_mm: f64,
    pub max_events: u32,
}

impl BlockConfig {
    /// Pump rate if one was entered; zero or negative means none.
    pub fn pump_rate(&self) -> Option<f64> {
        (self.pump_rate_m3h > 0.0).then_some(self.pump_rate_m3h)
    }

    pub fn kc(&self) -> f64 {
        self.crop.coefficients().for_stage(self.stage)
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            crop: Crop::Maize,
            stage: GrowthStage::Mid,
            soil: SoilType::Loam,
            area_ha: 1.0,
            efficiency: 0.75,
            pump_rate_m3h: 0.0,
            max_event_depth_mm: 25.0,
            max_events: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pump_rate_zero_means_none() {
        let mut block = BlockConfig::default();
        assert_eq!(block.pump_rate(), None);

        block.pump_rate_m3h = 50.0;
        assert_eq!(block.pump_rate(), Some(50.0));

        block.pump_rate_m3h = -3.0;
        assert_eq!(block.pump_rate(), None);
    }

    #[test]
    fn kc_follows_crop_and_stage() {
        let block = BlockConfig {
            crop: Crop::Rice,
            stage: GrowthStage::Late,
            ..BlockConfig::default()
        };
        assert_eq!(block.kc(), 0.9);
    }
}
