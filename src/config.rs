use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SplitRsError;
use crate::export::OutputFormat;
use crate::logging::LogConfig;
use crate::models::{AxisMode, SegmentPlan, SegmentRange};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Segmentation defaults
    pub analysis: AnalysisSettings,

    /// Rendering preferences
    pub output: OutputSettings,

    /// Logging setup
    pub logging: LogConfig,
}

/// Segmentation defaults used when ranges are not given explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Axis used when the mode is not specified
    pub default_mode: AxisMode,

    /// Warm-up length on the time axis (seconds)
    pub warmup_seconds: f64,

    /// Interval length on the time axis (seconds)
    pub interval_seconds: f64,

    /// Warm-up length on the distance axis (meters)
    pub warmup_meters: f64,

    /// Interval length on the distance axis (meters)
    pub interval_meters: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            default_mode: AxisMode::Time,
            warmup_seconds: 1200.0,
            interval_seconds: 600.0,
            warmup_meters: 2000.0,
            interval_meters: 1000.0,
        }
    }
}

impl AnalysisSettings {
    /// Reject default widths that cannot form a range
    pub fn validate(&self) -> std::result::Result<(), SplitRsError> {
        let widths = [
            ("warmup_seconds", self.warmup_seconds),
            ("interval_seconds", self.interval_seconds),
            ("warmup_meters", self.warmup_meters),
            ("interval_meters", self.interval_meters),
        ];
        for (key, width) in widths {
            if !width.is_finite() || width < 0.0 {
                return Err(SplitRsError::Configuration(format!(
                    "analysis.{} must be a non-negative number, got {}",
                    key, width
                )));
            }
        }
        Ok(())
    }

    /// Default warm-up and interval widths on the given axis
    pub fn widths(&self, mode: AxisMode) -> (f64, f64) {
        match mode {
            AxisMode::Time => (self.warmup_seconds, self.interval_seconds),
            AxisMode::Distance => (self.warmup_meters, self.interval_meters),
        }
    }

    /// Plan for a series of the given extent.
    ///
    /// Explicit ranges are used as given; every missing one is derived from
    /// the configured widths and starts where the previous range ends.
    pub fn plan(
        &self,
        mode: AxisMode,
        extent: u64,
        warmup: Option<SegmentRange>,
        interval: Option<SegmentRange>,
        cooldown: Option<SegmentRange>,
    ) -> SegmentPlan {
        let (warmup_width, interval_width) = self.widths(mode);
        SegmentPlan::chained(
            extent,
            warmup_width,
            interval_width,
            warmup,
            interval,
            cooldown,
        )
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Format used when none is given on the command line
    pub format: OutputFormat,

    /// Colorize status lines
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: OutputFormat::Table,
            color: true,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".splitrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Ignoring unreadable config {}: {:#}",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
