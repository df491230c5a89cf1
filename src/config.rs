use crate::error::{IrrigOpsError, Result};
use crate::logic::forecast_service::ForecastRequest;
use crate::logic::uncertainty::Perturbation;
use crate::models::{BlockConfig, Crop, GrowthStage, SoilType};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub block: BlockSettings,
    #[serde(default)]
    pub uncertainty: Perturbation,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Gabiro, Gatsibo".into(),
            latitude: -1.5789,
            longitude: 30.5089,
            timezone: "Africa/Kigali".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_url: String,
    pub horizon_days: u32,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".into(),
            horizon_days: 7,
            timeout_secs: 15,
            cache_ttl_secs: 3600,
        }
    }
}

impl ForecastConfig {
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.min(u32::MAX as u64) as i64)
    }
}

/// Block defaults as written in config.yaml
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockSettings {
    pub crop: String,
    pub stage: String,
    pub soil: String,
    pub area_ha: f64,
    pub efficiency: f64,
    pub pump_rate_m3h: f64,
    pub max_event_depth_mm: f64,
    pub max_events: u32,
}

impl Default for BlockSettings {
    fn default() -> Self {
        let block = BlockConfig::default();
        Self {
            crop: block.crop.as_str().into(),
            stage: block.stage.as_str().into(),
            soil: block.soil.as_str().into(),
            area_ha: block.area_ha,
            efficiency: block.efficiency,
            pump_rate_m3h: block.pump_rate_m3h,
            max_event_depth_mm: block.max_event_depth_mm,
            max_events: block.max_events,
        }
    }
}

impl BlockSettings {
    pub fn to_block(&self) -> BlockConfig {
        BlockConfig {
            crop: Crop::from_name(&self.crop),
            stage: GrowthStage::from_name(&self.stage),
            soil: SoilType::from_name(&self.soil),
            area_ha: self.area_ha,
            efficiency: self.efficiency,
            pump_rate_m3h: self.pump_rate_m3h,
            max_event_depth_mm: self.max_event_depth_mm,
            max_events: self.max_events,
        }
    }
}

/// Optional local files
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default)]
    pub historical_csv: Option<PathBuf>,
    #[serde(default)]
    pub accuracy_csv: Option<PathBuf>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(IrrigOpsError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            tracing::info!(
                "No config at {:?} - using built-in defaults. Run `irrigops init` to create one.",
                config_path
            );
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| IrrigOpsError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str)?;

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| IrrigOpsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        tracing::debug!("Loaded config from {:?}", config_path);

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/irrigops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IrrigOpsError::Config("Cannot determine config directory".into()))?
            .join("irrigops");
        Ok(config_dir.join("config.yaml"))
    }

    pub fn forecast_request(&self) -> ForecastRequest {
        ForecastRequest {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            timezone: self.location.timezone.clone(),
            horizon_days: self.forecast.horizon_days,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) || !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(IrrigOpsError::Config(format!(
                "location ({}, {}) is outside valid coordinates",
                loc.latitude, loc.longitude
            )));
        }
        if loc.timezone.trim().is_empty() {
            return Err(IrrigOpsError::Config("location.timezone must not be empty".into()));
        }
        if !(1..=16).contains(&self.forecast.horizon_days) {
            return Err(IrrigOpsError::Config(format!(
                "forecast.horizon_days must be 1-16, got {}",
                self.forecast.horizon_days
            )));
        }
        if self.forecast.timeout_secs == 0 {
            return Err(IrrigOpsError::Config("forecast.timeout_secs must be positive".into()));
        }

        let block = &self.block;
        if !(block.area_ha > 0.0) {
            return Err(IrrigOpsError::Config("block.area_ha must be positive".into()));
        }
        if !(block.efficiency > 0.0 && block.efficiency <= 1.0) {
            return Err(IrrigOpsError::Config(format!(
                "block.efficiency must be in (0, 1], got {}",
                block.efficiency
            )));
        }
        if block.pump_rate_m3h < 0.0 {
            return Err(IrrigOpsError::Config("block.pump_rate_m3h must not be negative".into()));
        }
        if !(block.max_event_depth_mm > 0.0) {
            return Err(IrrigOpsError::Config("block.max_event_depth_mm must be positive".into()));
        }
        if block.max_events == 0 {
            return Err(IrrigOpsError::Config("block.max_events must be at least 1".into()));
        }
        if !self.uncertainty.is_valid() {
            return Err(IrrigOpsError::Config(
                "uncertainty factors must be positive numbers".into(),
            ));
        }

        Ok(())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up irrigops!");
        println!();

        let defaults = Config::default();

        // --- Location ---
        println!("Location");
        let name: String = Input::new()
            .with_prompt("  Site name")
            .default(defaults.location.name.clone())
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(defaults.location.latitude)
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(defaults.location.longitude)
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let timezone: String = Input::new()
            .with_prompt("  Timezone")
            .default(defaults.location.timezone.clone())
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Block ---
        println!("Irrigated block");
        let crop: String = Input::new()
            .with_prompt("  Crop (Maize, Rice, Beans, Vegetables, Potato, Banana, Custom)")
            .default(defaults.block.crop.clone())
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let soil: String = Input::new()
            .with_prompt("  Soil (Sandy, Sandy Loam, Loam, Clay Loam, Clay)")
            .default(defaults.block.soil.clone())
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let area_ha: f64 = Input::new()
            .with_prompt("  Area (ha)")
            .default(defaults.block.area_ha)
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let efficiency: f64 = Input::new()
            .with_prompt("  System efficiency (0.5-0.95)")
            .default(defaults.block.efficiency)
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        let pump_rate_m3h: f64 = Input::new()
            .with_prompt("  Pump rate (m³/h, 0 if unknown)")
            .default(defaults.block.pump_rate_m3h)
            .interact_text()
            .map_err(|e| IrrigOpsError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            location: LocationConfig {
                name,
                latitude,
                longitude,
                timezone,
            },
            block: BlockSettings {
                crop: Crop::from_name(&crop).as_str().into(),
                soil: SoilType::from_name(&soil).as_str().into(),
                area_ha,
                efficiency,
                pump_rate_m3h,
                ..defaults.block
            },
            ..Config::default()
        };
        config.validate()?;

        // Write to default config path
        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| IrrigOpsError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# irrigops configuration\n# Generated by `irrigops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| IrrigOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.forecast.horizon_days, 7);
        assert_eq!(config.location.timezone, "Africa/Kigali");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "block:\n  crop: Rice\n  area_ha: 2.5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.block.crop, "Rice");
        assert_eq!(config.block.area_ha, 2.5);
        assert_eq!(config.block.max_events, 3);
        assert_eq!(config.forecast.cache_ttl_secs, 3600);
        assert_eq!(config.uncertainty, Perturbation::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn uncertainty_factors_are_configurable() {
        let yaml = "uncertainty:\n  wet_rain_factor: 1.3\n  dry_et0_factor: 1.2\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.uncertainty.wet_rain_factor, 1.3);
        assert_eq!(config.uncertainty.wet_et0_factor, 0.9);
        assert_eq!(config.uncertainty.dry_et0_factor, 1.2);
    }

    #[test]
    fn block_settings_parse_leniently() {
        let settings = BlockSettings {
            crop: "cassava".into(),
            soil: "peat".into(),
            stage: "late".into(),
            ..BlockSettings::default()
        };
        let block = settings.to_block();
        assert_eq!(block.crop, Crop::Custom);
        assert_eq!(block.soil, SoilType::Unspecified);
        assert_eq!(block.stage, GrowthStage::Late);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.block.efficiency = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.block.efficiency = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.location.latitude = 95.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.forecast.horizon_days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.block.max_events = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_var_substitution() {
        std::env::set_var("IRRIGOPS_TEST_TZ", "Africa/Nairobi");
        let out = Config::substitute_env_vars("timezone: ${IRRIGOPS_TEST_TZ}\nname: ${IRRIGOPS_UNSET_VAR}").unwrap();
        assert!(out.contains("timezone: Africa/Nairobi"));
        assert!(out.contains("${IRRIGOPS_UNSET_VAR}"));
    }
}
