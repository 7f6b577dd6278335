//! Threshold table and parameter classifier.
//!
//! Pure logic. Every range is inclusive on both ends and expressed on the same
//! 0-100 scale as the readings. Ranges are matched critical first, then
//! warning, then normal, so an overlap always resolves to the more severe tier.
//! A value that no declared range covers classifies as `normal`.

use crate::models::{Parameter, ParameterStatus};

// ---

/// Inclusive numeric range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Normal/warning/critical bands for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterThresholds {
    pub normal: Range,
    pub warning: &'static [Range],
    pub critical: &'static [Range],
}

impl ParameterThresholds {
    /// Classify `value` against these bands.
    pub fn classify(&self, value: f64) -> ParameterStatus {
        // ---
        if self.critical.iter().any(|r| r.contains(value)) {
            return ParameterStatus::Critical;
        }
        if self.warning.iter().any(|r| r.contains(value)) {
            return ParameterStatus::Warning;
        }
        // Matching the normal band and missing every band both land here.
        ParameterStatus::Normal
    }
}

const SOIL: ParameterThresholds = ParameterThresholds {
    normal: Range::new(40.0, 70.0),
    warning: &[Range::new(25.0, 40.0), Range::new(70.0, 85.0)],
    critical: &[Range::new(0.0, 25.0), Range::new(85.0, 100.0)],
};

const TEMP: ParameterThresholds = ParameterThresholds {
    normal: Range::new(40.0, 60.0),
    warning: &[Range::new(25.0, 40.0), Range::new(60.0, 75.0)],
    critical: &[Range::new(0.0, 25.0), Range::new(75.0, 100.0)],
};

const RAIN: ParameterThresholds = ParameterThresholds {
    normal: Range::new(0.0, 40.0),
    warning: &[Range::new(40.0, 70.0)],
    critical: &[Range::new(70.0, 100.0)],
};

const PLANT_HEALTH: ParameterThresholds = ParameterThresholds {
    normal: Range::new(70.0, 100.0),
    warning: &[Range::new(40.0, 70.0)],
    critical: &[Range::new(0.0, 40.0)],
};

const HUMIDITY: ParameterThresholds = ParameterThresholds {
    normal: Range::new(40.0, 70.0),
    warning: &[Range::new(25.0, 40.0), Range::new(70.0, 85.0)],
    critical: &[Range::new(0.0, 25.0), Range::new(85.0, 100.0)],
};

const LIGHT_INTENSITY: ParameterThresholds = ParameterThresholds {
    normal: Range::new(50.0, 80.0),
    warning: &[Range::new(30.0, 50.0), Range::new(80.0, 90.0)],
    critical: &[Range::new(0.0, 30.0), Range::new(90.0, 100.0)],
};

/// Static threshold table entry for `parameter`.
pub fn thresholds(parameter: Parameter) -> &'static ParameterThresholds {
    // ---
    match parameter {
        Parameter::Soil => &SOIL,
        Parameter::Temp => &TEMP,
        Parameter::Rain => &RAIN,
        Parameter::PlantHealth => &PLANT_HEALTH,
        Parameter::Humidity => &HUMIDITY,
        Parameter::LightIntensity => &LIGHT_INTENSITY,
    }
}

impl Parameter {
    /// Classify a value of this parameter.
    pub fn classify(self, value: f64) -> ParameterStatus {
        thresholds(self).classify(value)
    }
}

/// Classify a value for a parameter given by its wire key.
///
/// Unknown keys have no thresholds to violate and are always `normal`.
pub fn classify(parameter: &str, value: f64) -> ParameterStatus {
    // ---
    parameter
        .parse::<Parameter>()
        .map(|p| p.classify(value))
        .unwrap_or(ParameterStatus::Normal)
}
