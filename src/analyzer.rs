//! Reading analyzer: one snapshot in, per-parameter alerts out.

use serde::{Deserialize, Serialize};

use crate::catalog::{recommend_with, EnglishCatalog, MessageCatalog};
use crate::models::{Parameter, ParameterStatus, SensorReading};

// ---

/// A non-normal parameter found in a single snapshot.
///
/// Built fresh on every analysis; never stored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAlert {
    pub parameter: Parameter,
    pub value: f64,
    pub status: ParameterStatus,
    pub message: String,
    /// Recommended action, absent when the catalog has no guidance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub icon: String,
}

/// Analyze `reading` with the default catalog.
pub fn analyze(reading: &SensorReading) -> Vec<ParameterAlert> {
    analyze_with(&EnglishCatalog, reading)
}

/// Classify every present parameter and return one alert per non-normal value.
///
/// Order is mandatory parameters (soil, temp, rain, plant health) followed by
/// the measured optional ones. An all-normal reading yields an empty list.
pub fn analyze_with(catalog: &dyn MessageCatalog, reading: &SensorReading) -> Vec<ParameterAlert> {
    // ---
    reading
        .present()
        .filter_map(|(parameter, value)| {
            let status = parameter.classify(value);
            if status.is_normal() {
                return None;
            }

            let action = recommend_with(catalog, parameter.key(), value, status);
            tracing::debug!(%parameter, value, %status, "parameter out of range");

            Some(ParameterAlert {
                parameter,
                value,
                status,
                message: catalog.alert_message(parameter, status),
                action: (!action.is_empty()).then_some(action),
                icon: parameter.icon().to_string(),
            })
        })
        .collect()
}
