use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AppState, ErrorBody};
use crate::{
    aggregate_with_baseline, calculate_statistics, readings_outside_day, report_filename,
    to_markdown, DailyHealthReport, RawSensorReading, SensorReading,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/reports/daily", post(json_handler))
        .route("/reports/daily/markdown", post(markdown_handler))
}

/// Request body shared by the report endpoints.
///
/// Records stay as raw JSON until [`decode_readings`] so that one malformed
/// record is skipped instead of rejecting the request.
#[derive(Debug, Deserialize)]
struct ReportRequest {
    /// Report date as `YYYY-MM-DD`; defaults to today (UTC).
    date: Option<String>,
    readings: Vec<Value>,
    /// Prior window used for trend direction.
    #[serde(default)]
    previous_readings: Option<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    #[serde(flatten)]
    report: DailyHealthReport,
    skipped_readings: usize,
    /// Decoded readings timestamped outside the labelled UTC day.
    outside_day_readings: usize,
}

struct BuiltReport {
    report: DailyHealthReport,
    skipped: usize,
    outside_day: usize,
}

fn unprocessable(error: String) -> Response {
    // ---
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody { error })).into_response()
}

/// Decode every record, skipping (and logging) the ones that are malformed or
/// carry a bad timestamp.
fn decode_readings(raw: Vec<Value>) -> (Vec<SensorReading>, usize) {
    // ---
    let mut readings = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (i, record) in raw.into_iter().enumerate() {
        match RawSensorReading::from_value(record).and_then(|r| r.to_reading()) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                warn!("Skipping reading {}: {}", i, e);
                skipped += 1;
            }
        }
    }
    (readings, skipped)
}

/// Validate the request and build the report.
fn build_report(request: ReportRequest, max_readings: usize) -> Result<BuiltReport, Response> {
    // ---
    let day = match &request.date {
        Some(date) => NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| unprocessable(format!("Invalid date {date:?}: {e}")))?,
        None => Utc::now().date_naive(),
    };
    let date = day.format("%Y-%m-%d").to_string();

    let previous_len = request.previous_readings.as_ref().map_or(0, Vec::len);
    let total = request.readings.len() + previous_len;
    if total > max_readings {
        return Err(unprocessable(format!(
            "Too many readings: {total} (limit {max_readings})"
        )));
    }

    let (readings, skipped) = decode_readings(request.readings);
    let baseline = request.previous_readings.map(|prev| {
        let (prev, _) = decode_readings(prev);
        calculate_statistics(&prev)
    });

    let outside_day = readings_outside_day(&readings, day);
    if outside_day > 0 {
        warn!("{} readings fall outside {} (UTC)", outside_day, date);
    }

    debug!(
        "Aggregating {} readings for {} ({} skipped)",
        readings.len(),
        date,
        skipped
    );
    Ok(BuiltReport {
        report: aggregate_with_baseline(&readings, &date, baseline.as_ref()),
        skipped,
        outside_day,
    })
}

/// Turn a body the extractor could not decode into the JSON error shape.
fn rejected(rejection: JsonRejection) -> Response {
    // ---
    warn!("Rejected report request: {}", rejection.body_text());
    unprocessable(rejection.body_text())
}

async fn json_handler(
    State((_dispatcher, config)): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    // ---
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    info!("POST /reports/daily - {} readings", request.readings.len());

    match build_report(request, config.report_max_readings) {
        Ok(built) => (
            StatusCode::OK,
            Json(ReportResponse {
                report: built.report,
                skipped_readings: built.skipped,
                outside_day_readings: built.outside_day,
            }),
        )
            .into_response(),
        Err(response) => response,
    }
}

async fn markdown_handler(
    State((_dispatcher, config)): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    // ---
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    info!(
        "POST /reports/daily/markdown - {} readings",
        request.readings.len()
    );

    let report = match build_report(request, config.report_max_readings) {
        Ok(built) => built.report,
        Err(response) => return response,
    };

    let body = to_markdown(&report, Utc::now());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_filename(&report.date)
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}
