//! Alert dispatcher: cooldown and severity grouping in front of the
//! notification surface.
//!
//! One dispatcher lives for one live-monitoring session. The cooldown map is
//! the only mutable state in the engine and sits behind a mutex, so
//! concurrent snapshot arrivals are processed one batch at a time.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::ParameterAlert;
use crate::models::{Parameter, ParameterStatus};

// ---

/// Default minimum interval between repeats of the same alert key.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300); // 5 minutes

/// Cooldown key: the same parameter at the same severity.
pub type AlertKey = (Parameter, ParameterStatus);

/// How surviving alerts of one severity are handed to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// A single alert goes out as-is, two or more become one summary.
    #[default]
    Grouped,
    /// Every alert goes out on its own.
    Individual,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped" => Ok(DispatchMode::Grouped),
            "individual" => Ok(DispatchMode::Individual),
            other => Err(format!("expected `grouped` or `individual`, got `{other}`")),
        }
    }
}

/// One decision handed to the notification surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Single(ParameterAlert),
    Summary {
        status: ParameterStatus,
        alerts: Vec<ParameterAlert>,
    },
}

impl Notification {
    pub fn status(&self) -> ParameterStatus {
        // ---
        match self {
            Notification::Single(alert) => alert.status,
            Notification::Summary { status, .. } => *status,
        }
    }

    /// Headline text for the surface.
    pub fn headline(&self) -> String {
        // ---
        match self {
            Notification::Single(alert) => alert.message.clone(),
            Notification::Summary { status, alerts } => match status {
                ParameterStatus::Critical => format!("🚨 {} Critical Alerts!", alerts.len()),
                _ => format!("⚠️ {} Warnings", alerts.len()),
            },
        }
    }
}

/// Session-scoped de-duplication of live alerts.
#[derive(Debug)]
pub struct AlertDispatcher {
    cooldown: TimeDelta,
    mode: DispatchMode,
    last_sent: Mutex<HashMap<AlertKey, DateTime<Utc>>>,
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN, DispatchMode::default())
    }
}

impl AlertDispatcher {
    // ---
    pub fn new(cooldown: Duration, mode: DispatchMode) -> Self {
        // ---
        AlertDispatcher {
            cooldown: TimeDelta::from_std(cooldown).unwrap_or(TimeDelta::MAX),
            mode,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// `true` if `key` has not been emitted within the cooldown window.
    pub fn should_emit(&self, key: &AlertKey, now: DateTime<Utc>) -> bool {
        Self::is_due(&self.lock(), key, now, self.cooldown)
    }

    /// Record that `key` was emitted at `now`.
    pub fn mark_emitted(&self, key: AlertKey, now: DateTime<Utc>) {
        self.lock().insert(key, now);
    }

    /// Forget every emission, e.g. when a monitoring session restarts.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Apply cooldown to `alerts` and group what survives.
    ///
    /// Critical notifications always precede warning notifications. The whole
    /// batch is decided under one lock, and every emitted key is marked.
    pub fn dispatch(&self, alerts: &[ParameterAlert], now: DateTime<Utc>) -> Vec<Notification> {
        // ---
        let (mut critical, mut warning) = (Vec::new(), Vec::new());
        {
            let mut last_sent = self.lock();
            for alert in alerts {
                let key = (alert.parameter, alert.status);
                if !Self::is_due(&last_sent, &key, now, self.cooldown) {
                    tracing::debug!(parameter = %key.0, status = %key.1, "alert suppressed by cooldown");
                    continue;
                }
                match alert.status {
                    ParameterStatus::Critical => critical.push(alert.clone()),
                    ParameterStatus::Warning => warning.push(alert.clone()),
                    ParameterStatus::Normal => continue,
                }
                last_sent.insert(key, now);
            }
        }

        let mut out = Vec::new();
        for (status, group) in [
            (ParameterStatus::Critical, critical),
            (ParameterStatus::Warning, warning),
        ] {
            if group.is_empty() {
                continue;
            }
            match self.mode {
                DispatchMode::Grouped if group.len() > 1 => {
                    out.push(Notification::Summary {
                        status,
                        alerts: group,
                    });
                }
                _ => out.extend(group.into_iter().map(Notification::Single)),
            }
        }

        if !out.is_empty() {
            tracing::info!(
                alerts = alerts.len(),
                notifications = out.len(),
                "dispatching alert notifications"
            );
        }
        out
    }

    fn is_due(
        last_sent: &HashMap<AlertKey, DateTime<Utc>>,
        key: &AlertKey,
        now: DateTime<Utc>,
        cooldown: TimeDelta,
    ) -> bool {
        // ---
        match last_sent.get(key) {
            Some(last) => now.signed_duration_since(*last) >= cooldown,
            None => true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AlertKey, DateTime<Utc>>> {
        // The map only holds timestamps, so a poisoned lock is still usable.
        self.last_sent.lock().unwrap_or_else(|e| e.into_inner())
    }
}
