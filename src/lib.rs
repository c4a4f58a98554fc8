// Library interface for SplitRS modules
// The binary and the integration tests both go through these exports

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod segment;
pub mod series;
pub mod summary;

// Re-export commonly used types for convenience
pub use analysis::{analyze_gpx, analyze_series, Activity, AnalysisReport};
pub use config::AppConfig;
pub use error::{GpxError, Result, SegmentError, SplitRsError};
pub use export::OutputFormat;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use segment::{SegmentSlice, Segmenter};
pub use series::{Series, SeriesBuilder};
pub use summary::SegmentAggregator;
