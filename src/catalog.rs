//! Human-readable text: display names, icons, alert/event templates and
//! recommendations.
//!
//! Classification never depends on anything here. Swapping the
//! [`MessageCatalog`] changes wording only.

use crate::daily::OverallStatus;
use crate::models::{Parameter, ParameterStatus};
use crate::thresholds::thresholds;

// ---

/// Which side of the normal band a value lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Below,
    Above,
}

impl Direction {
    /// Compare `value` to the normal band of `parameter`.
    ///
    /// Only the normal band matters here, not which warning or critical
    /// sub-range matched.
    pub fn of(parameter: Parameter, value: f64) -> Self {
        // ---
        if value < thresholds(parameter).normal.min {
            Direction::Below
        } else {
            Direction::Above
        }
    }
}

/// Message table used by the analyzer, aggregator and formatter.
pub trait MessageCatalog: Send + Sync {
    fn display_name(&self, parameter: Parameter) -> &str;

    /// Live alert headline for a non-normal status.
    fn alert_message(&self, parameter: Parameter, status: ParameterStatus) -> String;

    /// Timeline entry for a non-normal status in the daily record.
    fn event_message(&self, parameter: Parameter, status: ParameterStatus, value: f64) -> String;

    /// Canned action text. An empty string means "no action".
    fn recommendation(&self, parameter: Parameter, direction: Direction) -> &str;

    /// Text for a parameter (possibly unknown) at normal status.
    fn optimal(&self, parameter: &str) -> String;

    /// Text for a non-normal value of a parameter with no recommendation table.
    fn unknown_parameter(&self) -> &str;

    /// Only entry when nothing in the report needs attention.
    fn all_optimal(&self) -> &str;

    /// Closing remarks appended for the overall status.
    fn rollup(&self, status: OverallStatus) -> &[&str];
}

/// Default English catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn display_name(&self, parameter: Parameter) -> &str {
        parameter.display_name()
    }

    fn alert_message(&self, parameter: Parameter, status: ParameterStatus) -> String {
        // ---
        let name = self.display_name(parameter);
        match status {
            ParameterStatus::Critical => {
                format!("🚨 Critical alert: {name} has reached a dangerous level!")
            }
            ParameterStatus::Warning => {
                format!("⚠️ Attention needed: {name} is moving out of the ideal range.")
            }
            ParameterStatus::Normal => format!("{name} is within the ideal range."),
        }
    }

    fn event_message(&self, parameter: Parameter, status: ParameterStatus, value: f64) -> String {
        // ---
        let name = self.display_name(parameter);
        match status {
            ParameterStatus::Critical => format!("{name} reached critical level ({value:.1})"),
            _ => format!("{name} entered warning range ({value:.1})"),
        }
    }

    fn recommendation(&self, parameter: Parameter, direction: Direction) -> &str {
        // ---
        use Direction::{Above, Below};
        match (parameter, direction) {
            (Parameter::Soil, Below) => "Water the soil immediately. Check irrigation system.",
            (Parameter::Soil, Above) => "Reduce watering. Improve drainage to prevent waterlogging.",
            (Parameter::Temp, Below) => {
                "Protect plants from cold. Consider using greenhouse or covers."
            }
            (Parameter::Temp, Above) => {
                "Provide shade. Increase ventilation. Consider misting systems."
            }
            (Parameter::Rain, Below) => {
                "Monitor soil moisture. Supplement with irrigation if needed."
            }
            (Parameter::Rain, Above) => {
                "Ensure proper drainage. Protect from excessive water damage."
            }
            (Parameter::PlantHealth, Below) => {
                "Inspect for pests/diseases. Check nutrient levels. Review watering schedule."
            }
            (Parameter::PlantHealth, Above) => "",
            (Parameter::Humidity, Below) => "Increase humidity through misting or humidifiers.",
            (Parameter::Humidity, Above) => "Improve air circulation. Reduce watering frequency.",
            (Parameter::LightIntensity, Below) => {
                "Increase light exposure. Move plants or add grow lights."
            }
            (Parameter::LightIntensity, Above) => {
                "Provide shade during peak hours. Protect from direct sunlight."
            }
        }
    }

    fn optimal(&self, parameter: &str) -> String {
        format!("{parameter} levels are optimal.")
    }

    fn unknown_parameter(&self) -> &str {
        "Monitor conditions closely."
    }

    fn all_optimal(&self) -> &str {
        "All parameters are within optimal ranges. Continue current care routine."
    }

    fn rollup(&self, status: OverallStatus) -> &[&str] {
        // ---
        match status {
            OverallStatus::Healthy => &[],
            OverallStatus::Moderate => &["Monitor conditions closely over the next 24 hours."],
            OverallStatus::Poor => &[
                "Immediate attention required. Review all critical parameters.",
                "Consider consulting an agricultural expert if conditions don't improve.",
            ],
        }
    }
}

impl Parameter {
    pub fn icon(self) -> &'static str {
        // ---
        match self {
            Parameter::Soil => "🌱",
            Parameter::Temp => "🌡️",
            Parameter::Rain => "🌧️",
            Parameter::PlantHealth => "🌿",
            Parameter::Humidity => "💧",
            Parameter::LightIntensity => "☀️",
        }
    }

    pub fn display_name(self) -> &'static str {
        // ---
        match self {
            Parameter::Soil => "Soil Moisture",
            Parameter::Temp => "Temperature",
            Parameter::Rain => "Rainfall",
            Parameter::PlantHealth => "Plant Health Index",
            Parameter::Humidity => "Humidity",
            Parameter::LightIntensity => "Light Intensity",
        }
    }
}

/// Display name for a wire key, falling back to the key itself.
pub fn display_name(parameter: &str) -> String {
    parameter
        .parse::<Parameter>()
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|_| parameter.to_string())
}

/// Icon for a wire key, with a generic chart icon for unknown keys.
pub fn icon(parameter: &str) -> &'static str {
    parameter.parse::<Parameter>().map(Parameter::icon).unwrap_or("📊")
}

/// Recommended action for `value` at `status`, using `catalog`.
pub fn recommend_with(
    catalog: &dyn MessageCatalog,
    parameter: &str,
    value: f64,
    status: ParameterStatus,
) -> String {
    // ---
    if status.is_normal() {
        return catalog.optimal(parameter);
    }
    match parameter.parse::<Parameter>() {
        Ok(p) => catalog
            .recommendation(p, Direction::of(p, value))
            .to_string(),
        Err(_) => catalog.unknown_parameter().to_string(),
    }
}

/// Recommended action for `value` at `status`.
///
/// Callers must treat an empty string as "no action".
pub fn recommend(parameter: &str, value: f64, status: ParameterStatus) -> String {
    recommend_with(&EnglishCatalog, parameter, value, status)
}
