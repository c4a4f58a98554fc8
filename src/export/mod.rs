use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::analysis::AnalysisReport;
use crate::models::{AxisMode, SegmentExtent, SegmentName, SegmentSummary};

pub mod csv;
pub mod json;
pub mod table;

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Segment summary rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySummary {
    pub duration_minutes: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub avg_cadence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

impl From<&SegmentSummary> for DisplaySummary {
    fn from(summary: &SegmentSummary) -> Self {
        let (points, distance_m) = match summary.extent {
            SegmentExtent::Points(count) => (Some(count), None),
            SegmentExtent::Meters(meters) => (None, Some(round1(meters))),
        };

        DisplaySummary {
            duration_minutes: summary.duration_minutes.map(round1),
            avg_heart_rate: summary.avg_heart_rate.map(round1),
            max_heart_rate: summary.max_heart_rate.map(round1),
            avg_cadence: summary.avg_cadence.map(round1),
            points,
            distance_m,
        }
    }
}

/// Report as handed to renderers: every number rounded to one decimal place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayReport {
    pub mode: AxisMode,
    pub rows: usize,
    pub extent: u64,
    pub segments: BTreeMap<SegmentName, DisplaySummary>,
}

impl From<&AnalysisReport> for DisplayReport {
    fn from(report: &AnalysisReport) -> Self {
        DisplayReport {
            mode: report.mode,
            rows: report.rows,
            extent: report.extent,
            segments: report
                .segments
                .iter()
                .map(|(name, summary)| (*name, DisplaySummary::from(summary)))
                .collect(),
        }
    }
}

/// Round to one decimal place for presentation
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Column header for the axis-dependent extent
pub fn extent_header(mode: AxisMode) -> &'static str {
    match mode {
        AxisMode::Time => "Points",
        AxisMode::Distance => "Distance (m)",
    }
}

/// Render a report in the requested format
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String, ExportError> {
    let display = DisplayReport::from(report);
    match format {
        OutputFormat::Table => Ok(table::render_table(&display)),
        OutputFormat::Json => json::render_json(&display),
        OutputFormat::Csv => csv::render_csv(&display),
    }
}

/// Render a report and write it to a file, or to stdout when no path is given
pub fn write_report(
    report: &AnalysisReport,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<(), ExportError> {
    let rendered = render(report, format)?;
    match output_path {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(rendered.as_bytes())?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writeln!(handle)?;
            }
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_report;
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_round1() {
        assert_eq!(round1(131.26), 131.3);
        assert_eq!(round1(10.0 / 60.0), 0.2);
        assert_eq!(round1(160.0), 160.0);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_display_summary_rounds_and_splits_extent() {
        let report = sample_report(AxisMode::Distance);
        let display = DisplayReport::from(&report);
        let warmup = &display.segments[&SegmentName::WarmUp];

        assert_eq!(warmup.avg_heart_rate, Some(131.3));
        assert_eq!(warmup.avg_cadence, Some(82.0));
        assert_eq!(warmup.points, None);
        assert_eq!(warmup.distance_m, Some(1200.0));
    }

    #[test]
    fn test_write_report_to_file() {
        let report = sample_report(AxisMode::Time);
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, OutputFormat::Csv, Some(temp_file.path())).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("Segment,"));
        assert_eq!(content.lines().count(), 4);
    }
}
