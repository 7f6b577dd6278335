//! Sensor health-evaluation and reporting engine for farm monitoring.
//!
//! The engine is a set of pure functions over in-memory readings:
//! - [`classify`] maps a parameter value onto a status tier
//! - [`recommend`] turns a status into action text
//! - [`analyze`] turns one snapshot into per-parameter alerts
//! - [`aggregate`] rolls a 24-hour window into a scored [`DailyHealthReport`]
//! - [`to_markdown`] renders that report for export
//!
//! [`AlertDispatcher`] is the only stateful piece: it applies a cooldown per
//! `(parameter, status)` and groups live alerts by severity.
//!
//! The `routes` gateway exposes all of it over HTTP. Following the Explicit
//! Module Boundary Pattern (EMBP), route handlers import engine types only
//! through the crate root re-exports below.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod daily;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod report;
pub mod routes;
pub mod thresholds;

pub use analyzer::{analyze, analyze_with, ParameterAlert};
pub use catalog::{display_name, icon, recommend, recommend_with, EnglishCatalog, MessageCatalog};
pub use config::Config;
pub use daily::{
    aggregate, aggregate_with, aggregate_with_baseline, calculate_statistics,
    extract_critical_events, readings_outside_day, CriticalEvent, DailyHealthReport,
    DailyStatistics, OverallStatus, ParameterSummary, Trend,
};
pub use dispatcher::{AlertDispatcher, DispatchMode, Notification};
pub use error::ReadingError;
pub use models::{Parameter, ParameterStatus, RawSensorReading, RawTimestamp, SensorReading};
pub use report::{report_filename, to_markdown};
pub use thresholds::classify;
