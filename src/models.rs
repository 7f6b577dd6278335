//! Data models for farm sensor snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

// ---

/// One monitored farm metric, normalized to a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Soil,
    Temp,
    Rain,
    PlantHealth,
    Humidity,
    LightIntensity,
}

impl Parameter {
    /// Fields every snapshot carries, in analysis order.
    pub const MANDATORY: [Parameter; 4] = [
        Parameter::Soil,
        Parameter::Temp,
        Parameter::Rain,
        Parameter::PlantHealth,
    ];

    /// Recognized extra fields; absence means "not measured".
    pub const OPTIONAL: [Parameter; 2] = [Parameter::Humidity, Parameter::LightIntensity];

    pub const ALL: [Parameter; 6] = [
        Parameter::Soil,
        Parameter::Temp,
        Parameter::Rain,
        Parameter::PlantHealth,
        Parameter::Humidity,
        Parameter::LightIntensity,
    ];

    /// Wire key used by the data store.
    pub fn key(self) -> &'static str {
        // ---
        match self {
            Parameter::Soil => "soil",
            Parameter::Temp => "temp",
            Parameter::Rain => "rain",
            Parameter::PlantHealth => "plant_health",
            Parameter::Humidity => "humidity",
            Parameter::LightIntensity => "light_intensity",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Parameter {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        Parameter::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| ReadingError::UnknownParameter(s.to_string()))
    }
}

/// Status tier of a single parameter value.
///
/// Variant order is severity order: `Normal < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl ParameterStatus {
    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            ParameterStatus::Normal => "normal",
            ParameterStatus::Warning => "warning",
            ParameterStatus::Critical => "critical",
        }
    }

    pub fn is_normal(self) -> bool {
        self == ParameterStatus::Normal
    }
}

impl fmt::Display for ParameterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp exactly as the data store hands it over.
///
/// Accepts an RFC 3339 string, epoch milliseconds, or a document-store
/// timestamp object (`{seconds, nanoseconds}`, optionally underscore-prefixed).
/// Any other JSON value still decodes, into `Unsupported`, so one bad record
/// is rejected by [`RawTimestamp::to_instant`] instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(f64),
    Document {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    Unsupported(serde_json::Value),
}

impl Default for RawTimestamp {
    /// A missing `timestamp` field.
    fn default() -> Self {
        RawTimestamp::Unsupported(serde_json::Value::Null)
    }
}

impl RawTimestamp {
    /// Resolve to an absolute instant, failing fast on anything unparseable.
    pub fn to_instant(&self) -> Result<DateTime<Utc>, ReadingError> {
        // ---
        match self {
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| ReadingError::InvalidTimestamp(format!("{text:?}: {e}"))),
            RawTimestamp::Millis(ms) => {
                if !ms.is_finite() {
                    return Err(ReadingError::InvalidTimestamp(format!("{ms} ms")));
                }
                DateTime::from_timestamp_millis(*ms as i64)
                    .ok_or_else(|| ReadingError::InvalidTimestamp(format!("{ms} ms out of range")))
            }
            RawTimestamp::Document {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds).ok_or_else(|| {
                ReadingError::InvalidTimestamp(format!("{seconds}s {nanoseconds}ns out of range"))
            }),
            RawTimestamp::Unsupported(serde_json::Value::Null) => {
                Err(ReadingError::InvalidTimestamp("missing".to_string()))
            }
            RawTimestamp::Unsupported(other) => Err(ReadingError::InvalidTimestamp(format!(
                "unsupported value {other}"
            ))),
        }
    }
}

/// Raw snapshot as received from the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSensorReading {
    // ---
    pub temp: f64,
    pub rain: f64,
    pub soil: f64,
    pub plant_health: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_intensity: Option<f64>,
    #[serde(default)]
    pub timestamp: RawTimestamp,
}

/// Typed snapshot with a resolved absolute timestamp.
///
/// Immutable once built; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub timestamp: DateTime<Utc>,
    pub temp: f64,
    pub rain: f64,
    pub soil: f64,
    pub plant_health: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_intensity: Option<f64>,
}

impl RawSensorReading {
    // ---
    /// Decode one record of a batch; a shape error stays local to the record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ReadingError> {
        serde_json::from_value(value).map_err(|e| ReadingError::MalformedRecord(e.to_string()))
    }

    pub fn to_reading(&self) -> Result<SensorReading, ReadingError> {
        // ---
        Ok(SensorReading {
            timestamp: self.timestamp.to_instant()?,
            temp: self.temp,
            rain: self.rain,
            soil: self.soil,
            plant_health: self.plant_health,
            humidity: self.humidity,
            light_intensity: self.light_intensity,
        })
    }
}

impl SensorReading {
    // ---
    pub fn new(timestamp: DateTime<Utc>, temp: f64, rain: f64, soil: f64, plant_health: f64) -> Self {
        // ---
        SensorReading {
            timestamp,
            temp,
            rain,
            soil,
            plant_health,
            humidity: None,
            light_intensity: None,
        }
    }

    pub fn with_humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_light_intensity(mut self, light_intensity: f64) -> Self {
        self.light_intensity = Some(light_intensity);
        self
    }

    /// Value of `parameter`, or `None` when an optional field was not measured.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        // ---
        match parameter {
            Parameter::Soil => Some(self.soil),
            Parameter::Temp => Some(self.temp),
            Parameter::Rain => Some(self.rain),
            Parameter::PlantHealth => Some(self.plant_health),
            Parameter::Humidity => self.humidity,
            Parameter::LightIntensity => self.light_intensity,
        }
    }

    /// Present parameters with their values: mandatory first, then optional.
    pub fn present(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::MANDATORY
            .into_iter()
            .chain(Parameter::OPTIONAL)
            .filter_map(move |p| self.value(p).map(|v| (p, v)))
    }
}
