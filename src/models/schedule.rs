use serde::{Deserialize, Serialize};

/// One discrete watering application within the weekly schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEvent {
    pub event: u32, // 1-based
    pub depth_mm: f64,
    pub volume_m3: f64,
    pub duration_hr: Option<f64>,
}

/// Weekly irrigation intensity, banded on the gross weekly depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityClass {
    Minimal,
    Light,
    Moderate,
    Heavy,
}

impl IntensityClass {
    pub fn from_weekly_mm(total_mm: f64) -> Self {
        if total_mm < 5.0 {
            IntensityClass::Minimal
        } else if total_mm < 20.0 {
            IntensityClass::Light
        } else if total_mm < 40.0 {
            IntensityClass::Moderate
        } else {
            IntensityClass::Heavy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityClass::Minimal => "MINIMAL",
            IntensityClass::Light => "LIGHT",
            IntensityClass::Moderate => "MODERATE",
            IntensityClass::Heavy => "HEAVY",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            IntensityClass::Minimal => Color::Green,
            IntensityClass::Light => Color::LightBlue,
            IntensityClass::Moderate => Color::Yellow,
            IntensityClass::Heavy => Color::Red,
        }
    }
}

impl std::fmt::Display for IntensityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_class_boundaries() {
        assert_eq!(IntensityClass::from_weekly_mm(0.0), IntensityClass::Minimal);
        assert_eq!(IntensityClass::from_weekly_mm(4.99), IntensityClass::Minimal);
        assert_eq!(IntensityClass::from_weekly_mm(5.0), IntensityClass::Light);
        assert_eq!(IntensityClass::from_weekly_mm(19.9), IntensityClass::Light);
        assert_eq!(IntensityClass::from_weekly_mm(20.0), IntensityClass::Moderate);
        assert_eq!(IntensityClass::from_weekly_mm(40.0), IntensityClass::Heavy);
    }
}
