//! Unified error hierarchy for SplitRS
//!
//! Library code returns these typed errors; the binary wraps them in
//! `anyhow` for reporting. Missing sensor data is never an error: it is
//! modelled as `None` on the affected fields.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Top-level error type for all SplitRS operations
#[derive(Debug, Error)]
pub enum SplitRsError {
    /// GPX loading errors
    #[error("GPX parsing error: {0}")]
    Gpx(#[from] GpxError),

    /// Segmentation and aggregation errors
    #[error("Segment error: {0}")]
    Segment(#[from] SegmentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// GPX loading errors. All of them abort the analysis.
#[derive(Debug, Error)]
pub enum GpxError {
    /// Input is not valid UTF-8
    #[error("Input is not valid UTF-8: {reason}")]
    Encoding { reason: String },

    /// Input is not well-formed XML
    #[error("Malformed XML at byte {position}: {reason}")]
    Xml { position: usize, reason: String },

    /// Input is XML but not a readable GPX document
    #[error("Invalid GPX document: {reason}")]
    Schema { reason: String },

    /// Structural and extension passes saw a different number of points
    #[error("Inconsistent track points: expected {expected}, found {found}")]
    InconsistentPoints { expected: usize, found: usize },

    /// File does not carry a .gpx extension
    #[error("Unsupported file: {}", path.display())]
    UnsupportedFile { path: PathBuf },
}

/// Segmentation errors
#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    /// A range captured no rows, so first/last lookups are undefined
    #[error("Empty segment: no rows in [{start}, {end})")]
    EmptySegment { start: f64, end: f64 },

    /// A range could not be parsed from user input
    #[error("Invalid range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },
}

/// Result type alias for SplitRS operations
pub type Result<T> = std::result::Result<T, SplitRsError>;

impl SplitRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SplitRsError::Segment(SegmentError::EmptySegment { .. }) => ErrorSeverity::Info,
            SplitRsError::Segment(SegmentError::InvalidRange { .. }) => ErrorSeverity::Warning,
            SplitRsError::Gpx(GpxError::UnsupportedFile { .. }) => ErrorSeverity::Warning,
            SplitRsError::Configuration(_) => ErrorSeverity::Warning,
            SplitRsError::Gpx(GpxError::InconsistentPoints { .. }) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SplitRsError::Gpx(GpxError::UnsupportedFile { path }) => {
                format!("Not a GPX file: {}", path.display())
            }
            SplitRsError::Gpx(GpxError::Xml { .. })
            | SplitRsError::Gpx(GpxError::Schema { .. }) => {
                format!("Workout file could not be read as GPX: {}", self)
            }
            SplitRsError::Segment(SegmentError::InvalidRange { input, .. }) => {
                format!(
                    "Could not understand range '{}'. Use START:END, for example 0:1200.",
                    input
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Internal inconsistency
    Critical,
    /// Error that aborts the analysis
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = SplitRsError::Segment(SegmentError::EmptySegment { start: 0.0, end: 0.0 });
        assert_eq!(err.severity(), ErrorSeverity::Info);

        let err = SplitRsError::Gpx(GpxError::InconsistentPoints { expected: 3, found: 2 });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = SplitRsError::Gpx(GpxError::UnsupportedFile {
            path: PathBuf::from("workout.fit"),
        });
        assert!(err.user_message().contains("Not a GPX file"));

        let err = SplitRsError::Segment(SegmentError::InvalidRange {
            input: "abc".to_string(),
            reason: "missing ':'".to_string(),
        });
        assert!(err.user_message().contains("START:END"));
    }

    #[test]
    fn test_parse_errors_display_verbatim() {
        let err: SplitRsError = GpxError::Schema {
            reason: "unknown gpx version".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "GPX parsing error: Invalid GPX document: unknown gpx version"
        );
    }
}
