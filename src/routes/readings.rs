use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AppState, ErrorBody};
use crate::{analyze, Notification, ParameterAlert, RawSensorReading};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/readings/analyze", post(handler))
}

/// Full analyzer output plus what the dispatcher let through.
#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    alerts: Vec<ParameterAlert>,
    notifications: Vec<Notification>,
}

async fn handler(
    State((dispatcher, _config)): State<AppState>,
    payload: Result<Json<RawSensorReading>, JsonRejection>,
) -> impl IntoResponse {
    // ---
    debug!("POST /readings/analyze - Decoding snapshot");

    let reading = match payload
        .map_err(|rejection| rejection.body_text())
        .and_then(|Json(raw)| raw.to_reading().map_err(|e| e.to_string()))
    {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Rejected snapshot: {}", e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody { error: e }),
            )
                .into_response();
        }
    };

    let alerts = analyze(&reading);
    let notifications = dispatcher.dispatch(&alerts, Utc::now());

    info!(
        "Analyzed snapshot at {}: {} alerts, {} notifications",
        reading.timestamp,
        alerts.len(),
        notifications.len()
    );
    (
        StatusCode::OK,
        Json(AnalyzeResponse {
            alerts,
            notifications,
        }),
    )
        .into_response()
}
