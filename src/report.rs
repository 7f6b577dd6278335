//! Markdown export of a [`DailyHealthReport`].

use chrono::{DateTime, NaiveDate, Utc};

use crate::daily::{DailyHealthReport, OverallStatus};
use crate::models::ParameterStatus;

// ---

/// Most critical events listed in the export; the heading still shows the total.
pub const MAX_EXPORTED_EVENTS: usize = 10;

/// Suggested download filename for the report of `date`.
pub fn report_filename(date: &str) -> String {
    format!("plant-health-report-{date}.md")
}

fn status_glyph(status: ParameterStatus) -> &'static str {
    // ---
    match status {
        ParameterStatus::Normal => "✅",
        ParameterStatus::Warning => "⚠️",
        ParameterStatus::Critical => "🚨",
    }
}

fn overall_glyph(status: OverallStatus) -> &'static str {
    // ---
    match status {
        OverallStatus::Healthy => "✅",
        OverallStatus::Moderate => "⚠️",
        OverallStatus::Poor => "🚨",
    }
}

/// Long-form date for `YYYY-MM-DD` labels, anything else verbatim.
fn long_date(label: &str) -> String {
    // ---
    NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| label.to_string())
}

/// Render `report` as markdown.
///
/// `generated_at` only feeds the footer, so the same inputs always render the
/// same text.
pub fn to_markdown(report: &DailyHealthReport, generated_at: DateTime<Utc>) -> String {
    // ---
    let stats = &report.statistics;
    let mut md: Vec<String> = Vec::new();

    md.push("# Daily Plant Health Report".into());
    md.push(format!("**Date:** {}\n", long_date(&report.date)));

    md.push(format!(
        "## Overall Health Score: {}/100",
        report.overall_health_score
    ));
    md.push(format!(
        "**Status:** {} {}\n",
        report.overall_status.as_str(),
        overall_glyph(report.overall_status)
    ));

    md.push("## Summary Statistics (24 Hours)".into());
    md.push(format!("- **Total Readings:** {}", stats.readings_count));
    md.push(format!(
        "- **Average Soil Moisture:** {:.1}%",
        stats.avg_soil_moisture
    ));
    md.push(format!(
        "- **Average Temperature:** {:.1}°C",
        stats.avg_temperature
    ));
    if stats.avg_humidity > 0.0 {
        md.push(format!("- **Average Humidity:** {:.1}%", stats.avg_humidity));
    }
    md.push(format!(
        "- **Total Rainfall:** {:.2} mm",
        stats.total_rainfall
    ));
    if stats.avg_light_intensity > 0.0 {
        md.push(format!(
            "- **Average Light Intensity:** {:.1}",
            stats.avg_light_intensity
        ));
    }
    md.push(format!(
        "- **Average Plant Health:** {:.1}%\n",
        stats.avg_plant_health
    ));

    md.push("## Parameter-wise Status".into());
    for p in &report.parameter_wise_status {
        md.push(format!(
            "- **{}:** {:.1} {} ({})",
            p.display_name,
            p.avg_value,
            status_glyph(p.status),
            p.status
        ));
    }
    md.push(String::new());

    if report.critical_events.is_empty() {
        md.push("## Critical Events\nNo critical events recorded today. ✅\n".into());
    } else {
        md.push(format!(
            "## Critical Events ({})",
            report.critical_events.len()
        ));
        for event in report.critical_events.iter().take(MAX_EXPORTED_EVENTS) {
            md.push(format!(
                "- {} **{}** - {}",
                status_glyph(event.status),
                event.timestamp.format("%I:%M %p"),
                event.message
            ));
        }
        md.push(String::new());
    }

    md.push("## Recommendations".into());
    for (i, rec) in report.recommendations.iter().enumerate() {
        md.push(format!("{}. {}", i + 1, rec));
    }
    md.push(String::new());

    md.push("---".into());
    md.push(format!(
        "*Report generated automatically at {}*",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.join("\n")
}
