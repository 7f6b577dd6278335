//! Daily aggregation of a 24-hour reading window into a scored health report.
//!
//! Everything here is a pure function of its arguments. No clock is read, so
//! the same readings and date label always produce the same report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{recommend_with, EnglishCatalog, MessageCatalog};
use crate::models::{Parameter, ParameterStatus, SensorReading};

// ---

/// Hours in the aggregation window, used to turn total rainfall into a rate.
pub const WINDOW_HOURS: f64 = 24.0;

/// Minimum score change between periods that counts as a trend.
pub const TREND_TOLERANCE: f64 = 5.0;

const WEIGHT_PLANT_HEALTH: f64 = 0.35;
const WEIGHT_SOIL: f64 = 0.25;
const WEIGHT_TEMP: f64 = 0.20;
const WEIGHT_HUMIDITY: f64 = 0.10;
const WEIGHT_LIGHT: f64 = 0.05;
const WEIGHT_RAIN: f64 = 0.05;

/// Earliest and latest reading in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Averages and totals over a reading window.
///
/// Humidity and light averages cover only readings that measured them and are
/// `0` when none did. `time_range` is `None` for an empty window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    pub avg_soil_moisture: f64,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub total_rainfall: f64,
    pub avg_light_intensity: f64,
    pub avg_plant_health: f64,
    pub readings_count: usize,
    pub humidity_samples: usize,
    pub light_samples: usize,
    pub time_range: Option<TimeRange>,
}

impl DailyStatistics {
    /// Rainfall expressed as an average hourly rate over the window.
    pub fn hourly_rainfall(&self) -> f64 {
        self.total_rainfall / WINDOW_HOURS
    }

    pub fn has_humidity(&self) -> bool {
        self.humidity_samples > 0
    }

    pub fn has_light(&self) -> bool {
        self.light_samples > 0
    }
}

/// One parameter of one reading outside its normal band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalEvent {
    pub timestamp: DateTime<Utc>,
    pub parameter: Parameter,
    pub value: f64,
    pub status: ParameterStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Healthy,
    Moderate,
    Poor,
}

impl OverallStatus {
    pub fn from_score(score: u8) -> Self {
        // ---
        match score {
            70.. => OverallStatus::Healthy,
            40..=69 => OverallStatus::Moderate,
            _ => OverallStatus::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            OverallStatus::Healthy => "Healthy",
            OverallStatus::Moderate => "Moderate",
            OverallStatus::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Stable,
    Improving,
    Declining,
}

/// Per-parameter rollup line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub parameter: Parameter,
    pub display_name: String,
    /// Window average; for rainfall this is the window total.
    pub avg_value: f64,
    pub status: ParameterStatus,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHealthReport {
    pub date: String,
    pub overall_health_score: u8,
    pub overall_status: OverallStatus,
    pub statistics: DailyStatistics,
    pub parameter_wise_status: Vec<ParameterSummary>,
    pub critical_events: Vec<CriticalEvent>,
    pub recommendations: Vec<String>,
}

// ---

/// Compute window statistics. Rainfall is summed, everything else averaged.
pub fn calculate_statistics(readings: &[SensorReading]) -> DailyStatistics {
    // ---
    if readings.is_empty() {
        return DailyStatistics::default();
    }

    let count = readings.len();
    let mean = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };
    let sum_of = |f: fn(&SensorReading) -> f64| readings.iter().map(f).sum::<f64>();

    let humidity: Vec<f64> = readings.iter().filter_map(|r| r.humidity).collect();
    let light: Vec<f64> = readings.iter().filter_map(|r| r.light_intensity).collect();

    let time_range = readings
        .iter()
        .map(|r| r.timestamp)
        .min()
        .zip(readings.iter().map(|r| r.timestamp).max())
        .map(|(start, end)| TimeRange { start, end });

    DailyStatistics {
        avg_soil_moisture: mean(sum_of(|r| r.soil), count),
        avg_temperature: mean(sum_of(|r| r.temp), count),
        avg_humidity: mean(humidity.iter().sum(), humidity.len()),
        total_rainfall: sum_of(|r| r.rain),
        avg_light_intensity: mean(light.iter().sum(), light.len()),
        avg_plant_health: mean(sum_of(|r| r.plant_health), count),
        readings_count: count,
        humidity_samples: humidity.len(),
        light_samples: light.len(),
        time_range,
    }
}

/// Number of readings whose timestamp is not on the UTC calendar day `day`.
pub fn readings_outside_day(readings: &[SensorReading], day: NaiveDate) -> usize {
    readings
        .iter()
        .filter(|r| r.timestamp.date_naive() != day)
        .count()
}

/// Every non-normal (reading, parameter) pair, most recent first.
///
/// Nothing is de-duplicated: a reading with two abnormal parameters yields two
/// events, and transient spikes hidden by the averages are kept.
pub fn extract_critical_events_with(
    catalog: &dyn MessageCatalog,
    readings: &[SensorReading],
) -> Vec<CriticalEvent> {
    // ---
    let mut events: Vec<CriticalEvent> = readings
        .iter()
        .flat_map(|reading| {
            reading.present().filter_map(move |(parameter, value)| {
                let status = parameter.classify(value);
                (!status.is_normal()).then(|| CriticalEvent {
                    timestamp: reading.timestamp,
                    parameter,
                    value,
                    status,
                    message: catalog.event_message(parameter, status, value),
                })
            })
        })
        .collect();

    // Stable sort keeps per-reading parameter order for equal timestamps.
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

pub fn extract_critical_events(readings: &[SensorReading]) -> Vec<CriticalEvent> {
    extract_critical_events_with(&EnglishCatalog, readings)
}

/// 100 inside `[min, max]`, minus 2 points per unit of distance outside, floored at 0.
pub fn band_score(value: f64, min: f64, max: f64) -> f64 {
    // ---
    let distance = if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0.0
    };
    (100.0 - distance * 2.0).max(0.0)
}

/// Score of a window's rainfall: 100 up to 40/hour, then 2 points off per unit.
pub fn rainfall_score(total_rainfall: f64) -> f64 {
    // ---
    let rate = (total_rainfall / WINDOW_HOURS).min(100.0);
    if rate <= 40.0 {
        100.0
    } else {
        (100.0 - (rate - 40.0) * 2.0).max(0.0)
    }
}

/// Weighted 0-100 blend of the window statistics.
///
/// Humidity and light contribute only when some reading measured them; their
/// weight is then also left out of the denominator.
pub fn health_score(stats: &DailyStatistics) -> u8 {
    // ---
    let mut parts = vec![
        (WEIGHT_PLANT_HEALTH, stats.avg_plant_health),
        (WEIGHT_SOIL, band_score(stats.avg_soil_moisture, 40.0, 70.0)),
        (WEIGHT_TEMP, band_score(stats.avg_temperature, 40.0, 60.0)),
    ];
    if stats.has_humidity() {
        parts.push((WEIGHT_HUMIDITY, band_score(stats.avg_humidity, 40.0, 70.0)));
    }
    if stats.has_light() {
        parts.push((WEIGHT_LIGHT, band_score(stats.avg_light_intensity, 50.0, 80.0)));
    }
    parts.push((WEIGHT_RAIN, rainfall_score(stats.total_rainfall)));

    let total: f64 = parts.iter().map(|(w, s)| w * s).sum();
    let weight: f64 = parts.iter().map(|(w, _)| w).sum();

    // NaN (from NaN inputs) saturates to 0 in the cast.
    (total / weight).round().clamp(0.0, 100.0) as u8
}

/// Parameters reported for these statistics, with the value each is judged on.
///
/// Returns `(parameter, reported value, classified value)`. Rainfall reports
/// its total but classifies on the hourly rate.
fn reported_parameters(stats: &DailyStatistics) -> Vec<(Parameter, f64, f64)> {
    // ---
    let mut out = vec![
        (Parameter::Soil, stats.avg_soil_moisture, stats.avg_soil_moisture),
        (Parameter::Temp, stats.avg_temperature, stats.avg_temperature),
        (Parameter::Rain, stats.total_rainfall, stats.hourly_rainfall()),
        (Parameter::PlantHealth, stats.avg_plant_health, stats.avg_plant_health),
    ];
    if stats.has_humidity() {
        out.push((Parameter::Humidity, stats.avg_humidity, stats.avg_humidity));
    }
    if stats.has_light() {
        out.push((
            Parameter::LightIntensity,
            stats.avg_light_intensity,
            stats.avg_light_intensity,
        ));
    }
    out
}

/// Quality of one parameter in a window on the 0-100 scoring scale.
fn parameter_quality(parameter: Parameter, stats: &DailyStatistics) -> Option<f64> {
    // ---
    match parameter {
        Parameter::PlantHealth => Some(stats.avg_plant_health),
        Parameter::Soil => Some(band_score(stats.avg_soil_moisture, 40.0, 70.0)),
        Parameter::Temp => Some(band_score(stats.avg_temperature, 40.0, 60.0)),
        Parameter::Rain => Some(rainfall_score(stats.total_rainfall)),
        Parameter::Humidity => stats
            .has_humidity()
            .then(|| band_score(stats.avg_humidity, 40.0, 70.0)),
        Parameter::LightIntensity => stats
            .has_light()
            .then(|| band_score(stats.avg_light_intensity, 50.0, 80.0)),
    }
}

/// Direction of change for `parameter` against a prior window.
pub fn trend(parameter: Parameter, current: &DailyStatistics, baseline: &DailyStatistics) -> Trend {
    // ---
    let (Some(now), Some(before)) = (
        parameter_quality(parameter, current),
        parameter_quality(parameter, baseline),
    ) else {
        return Trend::Stable;
    };
    if baseline.readings_count == 0 {
        return Trend::Stable;
    }

    let delta = now - before;
    if delta > TREND_TOLERANCE {
        Trend::Improving
    } else if delta < -TREND_TOLERANCE {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Build the daily report with the default catalog and no prior period.
pub fn aggregate(readings: &[SensorReading], date: &str) -> DailyHealthReport {
    aggregate_with(&EnglishCatalog, readings, date, None)
}

/// Build the daily report, computing trends against `baseline` when given.
pub fn aggregate_with_baseline(
    readings: &[SensorReading],
    date: &str,
    baseline: Option<&DailyStatistics>,
) -> DailyHealthReport {
    aggregate_with(&EnglishCatalog, readings, date, baseline)
}

pub fn aggregate_with(
    catalog: &dyn MessageCatalog,
    readings: &[SensorReading],
    date: &str,
    baseline: Option<&DailyStatistics>,
) -> DailyHealthReport {
    // ---
    let statistics = calculate_statistics(readings);
    let critical_events = extract_critical_events_with(catalog, readings);
    let overall_health_score = health_score(&statistics);
    let overall_status = OverallStatus::from_score(overall_health_score);

    let parameter_wise_status: Vec<ParameterSummary> = reported_parameters(&statistics)
        .into_iter()
        .map(|(parameter, avg_value, judged_on)| ParameterSummary {
            parameter,
            display_name: catalog.display_name(parameter).to_string(),
            avg_value,
            status: parameter.classify(judged_on),
            trend: baseline
                .map(|b| trend(parameter, &statistics, b))
                .unwrap_or_default(),
        })
        .collect();

    let mut recommendations: Vec<String> = parameter_wise_status
        .iter()
        .filter(|p| !p.status.is_normal())
        .filter_map(|p| {
            let text = recommend_with(catalog, p.parameter.key(), p.avg_value, p.status);
            (!text.is_empty()).then(|| format!("{}: {}", p.display_name, text))
        })
        .collect();

    if parameter_wise_status.iter().all(|p| p.status.is_normal()) {
        recommendations.push(catalog.all_optimal().to_string());
    }
    recommendations.extend(catalog.rollup(overall_status).iter().map(|s| s.to_string()));

    tracing::debug!(
        date,
        readings = statistics.readings_count,
        score = overall_health_score,
        status = overall_status.as_str(),
        events = critical_events.len(),
        "daily report aggregated"
    );

    DailyHealthReport {
        date: date.to_string(),
        overall_health_score,
        overall_status,
        statistics,
        parameter_wise_status,
        critical_events,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    /// 24 hourly readings with identical values.
    fn hourly(temp: f64, rain: f64, soil: f64, plant_health: f64) -> Vec<SensorReading> {
        // ---
        (0..24)
            .map(|h| {
                SensorReading::new(
                    midnight() + TimeDelta::hours(h),
                    temp,
                    rain,
                    soil,
                    plant_health,
                )
            })
            .collect()
    }

    fn healthy_day() -> Vec<SensorReading> {
        // ---
        hourly(50.0, 1.0, 55.0, 85.0)
            .into_iter()
            .map(|r| r.with_humidity(55.0).with_light_intensity(65.0))
            .collect()
    }

    #[test]
    fn test_healthy_day() {
        // ---
        let report = aggregate(&healthy_day(), "2025-06-01");

        assert_eq!(report.overall_status, OverallStatus::Healthy);
        assert_eq!(report.overall_health_score, 95);
        assert!(report.critical_events.is_empty());
        assert_eq!(
            report.recommendations,
            vec!["All parameters are within optimal ranges. Continue current care routine."]
        );
        assert_eq!(report.parameter_wise_status.len(), 6);
        assert!(report
            .parameter_wise_status
            .iter()
            .all(|p| p.trend == Trend::Stable));
    }

    #[test]
    fn test_rainfall_is_summed() {
        // ---
        let readings: Vec<SensorReading> = [1.0, 2.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, &rain)| {
                SensorReading::new(midnight() + TimeDelta::hours(i as i64), 50.0, rain, 55.0, 85.0)
            })
            .collect();
        let stats = calculate_statistics(&readings);

        assert_eq!(stats.total_rainfall, 6.0);
        assert_eq!(stats.readings_count, 3);
        assert_eq!(
            stats.time_range,
            Some(TimeRange {
                start: midnight(),
                end: midnight() + TimeDelta::hours(2)
            })
        );
    }

    #[test]
    fn test_critical_soil_every_reading() {
        // ---
        let readings: Vec<SensorReading> = (0..3)
            .map(|h| SensorReading::new(midnight() + TimeDelta::hours(h), 50.0, 1.0, 10.0, 85.0))
            .collect();
        let report = aggregate(&readings, "2025-06-01");

        let soil = report
            .parameter_wise_status
            .iter()
            .find(|p| p.parameter == Parameter::Soil)
            .unwrap();
        assert_eq!(soil.status, ParameterStatus::Critical);

        let soil_events: Vec<&CriticalEvent> = report
            .critical_events
            .iter()
            .filter(|e| e.parameter == Parameter::Soil)
            .collect();
        assert_eq!(soil_events.len(), 3);
        assert_eq!(soil_events[0].message, "Soil Moisture reached critical level (10.0)");
        assert!(report
            .recommendations
            .contains(&"Soil Moisture: Water the soil immediately. Check irrigation system.".to_string()));
    }

    #[test]
    fn test_events_are_most_recent_first() {
        // ---
        let readings = vec![
            SensorReading::new(midnight(), 30.0, 1.0, 55.0, 85.0),
            SensorReading::new(midnight() + TimeDelta::hours(5), 90.0, 1.0, 10.0, 85.0),
            SensorReading::new(midnight() + TimeDelta::hours(2), 30.0, 1.0, 55.0, 85.0),
        ];
        let events = extract_critical_events(&readings);

        let stamps: Vec<i64> = events
            .iter()
            .map(|e| (e.timestamp - midnight()).num_hours())
            .collect();
        assert_eq!(stamps, vec![5, 5, 2, 0]);
        // same reading keeps parameter order
        assert_eq!(events[0].parameter, Parameter::Soil);
        assert_eq!(events[1].parameter, Parameter::Temp);
        assert_eq!(events[2].message, "Temperature entered warning range (30.0)");
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        // ---
        let mut readings = healthy_day();
        readings[3].soil = 12.0;
        readings[7].temp = 80.0;

        let a = aggregate(&readings, "2025-06-01");
        let b = aggregate(&readings, "2025-06-01");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_window_degrades_to_zeros() {
        // ---
        let report = aggregate(&[], "2025-06-01");

        assert_eq!(report.statistics, DailyStatistics::default());
        assert!(report.statistics.time_range.is_none());
        // plant 0, soil 20, temp 20, rain 100 over weight 0.85
        assert_eq!(report.overall_health_score, 16);
        assert_eq!(report.overall_status, OverallStatus::Poor);
        assert_eq!(report.parameter_wise_status.len(), 4);
        assert!(report.critical_events.is_empty());
        assert_eq!(
            report.recommendations.last().unwrap(),
            "Consider consulting an agricultural expert if conditions don't improve."
        );
    }

    #[test]
    fn test_optional_fields_excluded_from_score() {
        // ---
        // without humidity/light: (0.35*85 + 0.25*100 + 0.2*100 + 0.05*100) / 0.85
        let stats = calculate_statistics(&hourly(50.0, 1.0, 55.0, 85.0));
        assert_eq!(stats.avg_humidity, 0.0);
        assert_eq!(stats.humidity_samples, 0);
        assert_eq!(health_score(&stats), 94);

        // humidity averaged only over readings that carried it
        let mut readings = hourly(50.0, 1.0, 55.0, 85.0);
        readings[0].humidity = Some(20.0);
        readings[1].humidity = Some(60.0);
        let stats = calculate_statistics(&readings);
        assert_eq!(stats.avg_humidity, 40.0);
        assert_eq!(stats.humidity_samples, 2);
    }

    #[test]
    fn test_measured_zero_humidity_still_counts() {
        // ---
        let readings: Vec<SensorReading> = hourly(50.0, 1.0, 55.0, 85.0)
            .into_iter()
            .map(|r| r.with_humidity(0.0))
            .collect();
        let report = aggregate(&readings, "2025-06-01");

        let humidity = report
            .parameter_wise_status
            .iter()
            .find(|p| p.parameter == Parameter::Humidity)
            .unwrap();
        assert_eq!(humidity.status, ParameterStatus::Critical);
        // humidity band score 20 at weight 0.10 joins the blend
        assert_eq!(report.overall_health_score, 86);
    }

    #[test]
    fn test_band_and_rainfall_scores() {
        // ---
        assert_eq!(band_score(55.0, 40.0, 70.0), 100.0);
        assert_eq!(band_score(30.0, 40.0, 70.0), 80.0);
        assert_eq!(band_score(80.0, 40.0, 70.0), 80.0);
        assert_eq!(band_score(-20.0, 40.0, 70.0), 0.0);

        assert_eq!(rainfall_score(24.0 * 40.0), 100.0);
        assert_eq!(rainfall_score(24.0 * 50.0), 80.0);
        assert_eq!(rainfall_score(24.0 * 500.0), 0.0);
    }

    #[test]
    fn test_rain_status_uses_hourly_rate() {
        // ---
        // 24 readings of 50 sum to 1200 (raw total would be "normal" by fall-through);
        // the hourly rate of 50 is a warning
        let report = aggregate(&hourly(50.0, 50.0, 55.0, 85.0), "2025-06-01");
        let rain = report
            .parameter_wise_status
            .iter()
            .find(|p| p.parameter == Parameter::Rain)
            .unwrap();

        assert_eq!(rain.avg_value, 1200.0);
        assert_eq!(rain.status, ParameterStatus::Warning);
    }

    #[test]
    fn test_status_thresholds() {
        // ---
        assert_eq!(OverallStatus::from_score(100), OverallStatus::Healthy);
        assert_eq!(OverallStatus::from_score(70), OverallStatus::Healthy);
        assert_eq!(OverallStatus::from_score(69), OverallStatus::Moderate);
        assert_eq!(OverallStatus::from_score(40), OverallStatus::Moderate);
        assert_eq!(OverallStatus::from_score(39), OverallStatus::Poor);
    }

    #[test]
    fn test_moderate_report_adds_caution() {
        // ---
        // temperature 30 (warning), plant health 30 (critical): score 66
        let report = aggregate(&hourly(30.0, 1.0, 55.0, 30.0), "2025-06-01");

        assert_eq!(report.overall_status, OverallStatus::Moderate);
        assert_eq!(
            report.recommendations,
            vec![
                "Temperature: Protect plants from cold. Consider using greenhouse or covers."
                    .to_string(),
                "Plant Health Index: Inspect for pests/diseases. Check nutrient levels. Review watering schedule."
                    .to_string(),
                "Monitor conditions closely over the next 24 hours.".to_string(),
            ]
        );
    }

    #[test]
    fn test_trend_against_baseline() {
        // ---
        let yesterday = calculate_statistics(&hourly(50.0, 1.0, 20.0, 60.0));
        let report =
            aggregate_with_baseline(&hourly(80.0, 1.0, 55.0, 62.0), "2025-06-02", Some(&yesterday));

        let trend_of = |p: Parameter| {
            report
                .parameter_wise_status
                .iter()
                .find(|s| s.parameter == p)
                .map(|s| s.trend)
                .unwrap()
        };
        assert_eq!(trend_of(Parameter::Soil), Trend::Improving);
        assert_eq!(trend_of(Parameter::Temp), Trend::Declining);
        assert_eq!(trend_of(Parameter::PlantHealth), Trend::Stable);
        assert_eq!(trend_of(Parameter::Rain), Trend::Stable);
    }

    #[test]
    fn test_trend_without_comparable_baseline_is_stable() {
        // ---
        let empty = DailyStatistics::default();
        let report = aggregate_with_baseline(&healthy_day(), "2025-06-02", Some(&empty));

        assert!(report
            .parameter_wise_status
            .iter()
            .all(|p| p.trend == Trend::Stable));
    }

    #[test]
    fn test_readings_outside_day() {
        // ---
        let day = midnight().date_naive();
        let mut readings = hourly(50.0, 1.0, 55.0, 85.0);
        readings.push(SensorReading::new(
            midnight() - TimeDelta::seconds(1),
            50.0,
            1.0,
            55.0,
            85.0,
        ));
        readings.push(SensorReading::new(
            midnight() + TimeDelta::hours(24),
            50.0,
            1.0,
            55.0,
            85.0,
        ));

        assert_eq!(readings_outside_day(&readings, day), 2);
        assert_eq!(readings_outside_day(&readings[..24], day), 0);
    }
}
