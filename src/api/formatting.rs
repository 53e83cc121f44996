//! Estimate output formatting and history export
//!
//! This module renders estimation results as human-readable text, JSON or
//! CSV, and exports an observation snapshot as the plain-text history log.

use crate::algorithms::bearing::compass_point;
use crate::algorithms::estimator::SourceEstimator;
use crate::algorithms::projection::reference_point;
use crate::core::{Estimate, Observation, ReferencePoint};
use crate::utils::config::EngineConfig;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (expected text, json or csv)", other)),
        }
    }
}

/// Outcome of one estimation call, ready for formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    /// Number of observations in the snapshot
    pub observation_count: usize,
    /// Frame origin used for the solve
    pub reference: Option<ReferencePoint>,
    /// The fix, if any
    pub estimate: Option<Estimate>,
    /// RMS perpendicular distance from the fix to the lines it was fitted to (meters)
    pub rms_residual_m: Option<f64>,
    /// Observations the fix was fitted to
    pub lines_used: Option<usize>,
    /// Why no fix exists
    pub failure: Option<String>,
}

impl EstimateReport {
    /// Run the estimator and collect diagnostics
    pub fn from_observations(observations: &[Observation], config: &EngineConfig) -> Self {
        match SourceEstimator::with_config(*config).try_solve(observations) {
            Ok(solution) => Self {
                observation_count: observations.len(),
                reference: Some(solution.reference),
                estimate: Some(solution.estimate),
                rms_residual_m: Some(solution.rms_residual_m),
                lines_used: Some(solution.lines_used),
                failure: None,
            },
            Err(err) => Self {
                observation_count: observations.len(),
                reference: reference_point(observations).ok(),
                estimate: None,
                rms_residual_m: None,
                lines_used: None,
                failure: Some(err.to_string()),
            },
        }
    }
}

/// Rounds report values to a fixed number of decimals
pub struct EstimateFormatter {
    /// Decimal places kept for coordinates
    pub precision: u8,
}

impl Default for EstimateFormatter {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl EstimateFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Copy of `report` with coordinates rounded
    pub fn format(&self, report: &EstimateReport) -> EstimateReport {
        let mut formatted = report.clone();
        if let Some(estimate) = formatted.estimate.as_mut() {
            estimate.lat = self.round_to_precision(estimate.lat);
            estimate.lng = self.round_to_precision(estimate.lng);
        }
        if let Some(reference) = formatted.reference.as_mut() {
            reference.ref_lat = self.round_to_precision(reference.ref_lat);
            reference.ref_lng = self.round_to_precision(reference.ref_lng);
        }
        formatted.rms_residual_m = formatted.rms_residual_m.map(|r| (r * 1000.0).round() / 1000.0);
        formatted
    }

    fn round_to_precision(&self, value: f64) -> f64 {
        let multiplier = 10_f64.powi(self.precision as i32);
        (value * multiplier).round() / multiplier
    }
}

/// Human-readable text formatter
#[derive(Default)]
pub struct TextFormatter {
    /// Single-line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, report: &EstimateReport) -> String {
        let mut output = String::new();

        match (&report.estimate, self.compact) {
            (Some(estimate), true) => {
                let _ = write!(
                    output,
                    "Fix: {:.6}, {:.6} ({}) | Obs:{}",
                    estimate.lat, estimate.lng, estimate.method, report.observation_count
                );
            }
            (Some(estimate), false) => {
                let _ = writeln!(output, "Estimate ({}):", estimate.method);
                let _ = writeln!(output, "  Latitude:  {:.6}°", estimate.lat);
                let _ = writeln!(output, "  Longitude: {:.6}°", estimate.lng);
            }
            (None, true) => {
                let _ = write!(output, "No fix | Obs:{}", report.observation_count);
            }
            (None, false) => {
                let reason = report.failure.as_deref().unwrap_or("unknown reason");
                let _ = writeln!(output, "No estimate: {}", reason);
            }
        }

        if !self.compact {
            let _ = writeln!(output, "Observations: {}", report.observation_count);
            if let Some(reference) = &report.reference {
                let _ = writeln!(
                    output,
                    "Reference:    {:.6}°, {:.6}°",
                    reference.ref_lat, reference.ref_lng
                );
            }
            if let Some(residual) = report.rms_residual_m {
                let _ = writeln!(output, "RMS residual: {:.2} m", residual);
            }
            if let Some(used) = report.lines_used.filter(|&n| n != report.observation_count) {
                let _ = writeln!(output, "Fitted to:    {} of {} observations", used, report.observation_count);
            }
        }

        output
    }

    /// One line per observation with its compass label
    pub fn format_observations(&self, observations: &[Observation]) -> String {
        let mut output = String::new();
        for obs in observations {
            let _ = writeln!(
                output,
                "  {:<12} {:>10.6}, {:>11.6}  {:>6.1}° ({})",
                obs.station_id,
                obs.lat,
                obs.lng,
                obs.bearing_deg,
                compass_point(obs.bearing_deg)
            );
        }
        output
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// CSV formatter for data logging
pub struct CsvFormatter {
    /// Include header row
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &'static str {
        "lat,lng,method,observation_count"
    }

    /// Row for a report; coordinates and method are empty without a fix
    pub fn format_row(&self, report: &EstimateReport) -> String {
        match &report.estimate {
            Some(estimate) => format!(
                "{:.6},{:.6},{},{}",
                estimate.lat, estimate.lng, estimate.method, report.observation_count
            ),
            None => format!(",,,{}", report.observation_count),
        }
    }

    pub fn format_csv(&self, report: &EstimateReport) -> String {
        if self.include_header {
            format!("{}\n{}\n", self.header(), self.format_row(report))
        } else {
            format!("{}\n", self.format_row(report))
        }
    }
}

/// Plain-text observation history, one line per reading
#[derive(Default)]
pub struct HistoryFormatter;

impl HistoryFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_line(&self, observation: &Observation) -> String {
        let time = DateTime::from_timestamp_millis(observation.timestamp)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| observation.timestamp.to_string());
        format!(
            "ID: {}, Lat: {}, Lng: {}, Dir: {}° ({}), Time: {}",
            observation.station_id,
            observation.lat,
            observation.lng,
            observation.bearing_deg,
            compass_point(observation.bearing_deg),
            time
        )
    }

    pub fn format_history(&self, observations: &[Observation]) -> String {
        observations
            .iter()
            .map(|o| self.format_line(o))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EstimationMethod;

    fn snapshot() -> Vec<Observation> {
        vec![
            Observation::new("dev-1", 52.01, 5.00, 180.0).with_timestamp(1_700_000_000_000),
            Observation::new("dev-2", 52.00, 4.98, 90.0).with_timestamp(1_700_000_060_000),
        ]
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_report_with_fix() {
        let report = EstimateReport::from_observations(&snapshot(), &EngineConfig::default());
        assert_eq!(report.observation_count, 2);
        assert_eq!(report.estimate.unwrap().method, EstimationMethod::TwoRay);
        assert!(report.failure.is_none());
        assert!(report.rms_residual_m.unwrap() < 1e-6);
    }

    #[test]
    fn test_report_without_fix() {
        let report = EstimateReport::from_observations(&snapshot()[..1], &EngineConfig::default());
        assert!(report.estimate.is_none());
        assert!(report.failure.unwrap().starts_with("insufficient data"));
    }

    #[test]
    fn test_report_residual_follows_line_policy() {
        // Three stations aimed at (52.0, 5.0) plus one looking away from it
        let snapshot = vec![
            Observation::new("dev-1", 52.01, 5.00, 180.0).with_timestamp(0),
            Observation::new("dev-2", 52.00, 4.98, 90.0).with_timestamp(0),
            Observation::new("dev-3", 51.99, 5.00, 0.0).with_timestamp(0),
            Observation::new("dev-4", 52.00, 5.03, 80.0).with_timestamp(0),
        ];

        let lines = EstimateReport::from_observations(&snapshot, &EngineConfig::default());
        assert_eq!(lines.lines_used, Some(4));

        let config = EngineConfig {
            line_policy: crate::utils::config::LinePolicy::ForwardRays,
            ..EngineConfig::default()
        };
        let rays = EstimateReport::from_observations(&snapshot, &config);
        assert_eq!(rays.lines_used, Some(3));
        assert!(rays.rms_residual_m.unwrap() < lines.rms_residual_m.unwrap());
        assert!(TextFormatter::new().format_text(&rays).contains("Fitted to:    3 of 4 observations"));

        let reversed: Vec<Observation> = snapshot.iter().rev().cloned().collect();
        assert_eq!(EstimateReport::from_observations(&reversed, &config), rays);
    }

    #[test]
    fn test_rounding() {
        let report = EstimateReport::from_observations(&snapshot(), &EngineConfig::default());
        let rounded = EstimateFormatter::new().with_precision(2).format(&report);
        let estimate = rounded.estimate.unwrap();
        assert_eq!(estimate.lat, 52.0);
        assert_eq!(estimate.lng, 5.0);
    }

    #[test]
    fn test_text_output() {
        let report = EstimateReport::from_observations(&snapshot(), &EngineConfig::default());
        let text = TextFormatter::new().format_text(&report);
        assert!(text.starts_with("Estimate (two-ray):"));
        assert!(text.contains("Observations: 2"));

        let compact = TextFormatter::compact().format_text(&report);
        assert!(compact.starts_with("Fix: 52.000000, 5.000000 (two-ray)"));

        let listing = TextFormatter::new().format_observations(&snapshot());
        assert!(listing.contains("(S)"));
        assert!(listing.contains("(E)"));
    }

    #[test]
    fn test_text_output_without_fix() {
        let report = EstimateReport::from_observations(&[], &EngineConfig::default());
        let text = TextFormatter::new().format_text(&report);
        assert!(text.starts_with("No estimate: insufficient data"));
        assert!(!text.contains("Reference"));
    }

    #[test]
    fn test_csv_output() {
        let report = EstimateReport::from_observations(&snapshot(), &EngineConfig::default());
        let csv = CsvFormatter::new().format_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "lat,lng,method,observation_count");
        assert_eq!(lines[1], "52.000000,5.000000,two-ray,2");

        let empty = EstimateReport::from_observations(&[], &EngineConfig::default());
        assert_eq!(CsvFormatter { include_header: false }.format_csv(&empty), ",,,0\n");
    }

    #[test]
    fn test_json_output() {
        let report = EstimateReport::from_observations(&snapshot(), &EngineConfig::default());
        let json = JsonFormatter::new().format_json(&report).unwrap();
        assert!(json.contains("\"method\":\"two-ray\""));
        assert!(json.contains("\"observationCount\":2"));
        assert!(json.contains("\"rmsResidualM\""));
        assert!(JsonFormatter::pretty().format_json(&report).unwrap().contains('\n'));
    }

    #[test]
    fn test_history_lines() {
        let history = HistoryFormatter::new().format_history(&snapshot());
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "ID: dev-1, Lat: 52.01, Lng: 5, Dir: 180° (S), Time: 2023-11-14T22:13:20.000Z"
        );
        assert!(lines[1].ends_with("Time: 2023-11-14T22:14:20.000Z"));
    }
}
