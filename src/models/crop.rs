use serde::{Deserialize, Serialize};

/// Effective-rainfall fraction applied when the soil is not one we know.
pub const DEFAULT_EFFECTIVE_RAIN_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrowthStage {
    Initial,
    #[default]
    Mid,
    Late,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 3] = [GrowthStage::Initial, GrowthStage::Mid, GrowthStage::Late];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Initial => "Initial",
            GrowthStage::Mid => "Mid-season",
            GrowthStage::Late => "Late",
        }
    }

    /// Unknown names fall back to mid-season.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "initial" | "init" | "early" => GrowthStage::Initial,
            "mid" | "mid-season" | "midseason" | "mid season" => GrowthStage::Mid,
            "late" | "late-season" | "late season" => GrowthStage::Late,
            other => {
                tracing::debug!("Unknown growth stage '{}', using mid-season", other);
                GrowthStage::Mid
            }
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// FAO-56 style crop coefficients for the three tabulated stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropCoefficients {
    pub initial: f64,
    pub mid: f64,
    pub late: f64,
}

impl CropCoefficients {
    pub const fn new(initial: f64, mid: f64, late: f64) -> Self {
        Self { initial, mid, late }
    }

    pub fn for_stage(&self, stage: GrowthStage) -> f64 {
        match stage {
            GrowthStage::Initial => self.initial,
            GrowthStage::Mid => self.mid,
            GrowthStage::Late => self.late,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Crop {
    Maize,
    Rice,
    Beans,
    Vegetables,
    Potato,
    Banana,
    #[default]
    Custom,
}

impl Crop {
    pub const ALL: [Crop; 7] = [
        Crop::Maize,
        Crop::Rice,
        Crop::Beans,
        Crop::Vegetables,
        Crop::Potato,
        Crop::Banana,
        Crop::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Maize => "Maize",
            Crop::Rice => "Rice",
            Crop::Beans => "Beans",
            Crop::Vegetables => "Vegetables",
            Crop::Potato => "Potato",
            Crop::Banana => "Banana",
            Crop::Custom => "Custom",
        }
    }

    pub fn coefficients(&self) -> CropCoefficients {
        match self {
            Crop::Maize => CropCoefficients::new(0.3, 1.2, 0.6),
            Crop::Rice => CropCoefficients::new(1.05, 1.2, 0.9),
            Crop::Beans => CropCoefficients::new(0.4, 1.15, 0.35),
            Crop::Vegetables => CropCoefficients::new(0.6, 1.05, 0.9),
            Crop::Potato => CropCoefficients::new(0.5, 1.15, 0.75),
            Crop::Banana => CropCoefficients::new(0.5, 1.1, 1.0),
            Crop::Custom => CropCoefficients::new(0.5, 1.0, 0.8),
        }
    }

    /// Unknown crops use the Custom profile.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "maize" | "corn" => Crop::Maize,
            "rice" | "paddy" => Crop::Rice,
            "beans" | "bean" => Crop::Beans,
            "vegetables" | "vegetable" | "veg" => Crop::Vegetables,
            "potato" | "potatoes" | "irish potato" => Crop::Potato,
            "banana" | "bananas" => Crop::Banana,
            "custom" => Crop::Custom,
            other => {
                tracing::debug!("Unknown crop '{}', using Custom coefficients", other);
                Crop::Custom
            }
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    SandyLoam,
    Loam,
    ClayLoam,
    Clay,
    #[default]
    Unspecified,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Sandy,
        SoilType::SandyLoam,
        SoilType::Loam,
        SoilType::ClayLoam,
        SoilType::Clay,
        SoilType::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::Loam => "Loam",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::Clay => "Clay",
            SoilType::Unspecified => "Unspecified",
        }
    }

    /// Share of raw precipitation that infiltrates and stays available to the crop.
    pub fn effective_rain_fraction(&self) -> f64 {
        match self {
            SoilType::Sandy => 0.7,
            SoilType::SandyLoam => 0.65,
            SoilType::Loam => 0.6,
            SoilType::ClayLoam => 0.55,
            SoilType::Clay => 0.5,
            SoilType::Unspecified => DEFAULT_EFFECTIVE_RAIN_FRACTION,
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sandy" | "sand" => SoilType::Sandy,
            "sandyloam" | "sandy loam" => SoilType::SandyLoam,
            "loam" => SoilType::Loam,
            "clayloam" | "clay loam" => SoilType::ClayLoam,
            "clay" => SoilType::Clay,
            other => {
                tracing::debug!("Unknown soil '{}', using default rain fraction", other);
                SoilType::Unspecified
            }
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
