use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SegmentError;

/// One recorded GPS sample as read from a GPX track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trackpoint {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Elevation in meters above sea level
    pub elevation: Option<f64>,

    /// Absolute recording time; points without one are dropped by the series builder
    pub time: Option<DateTime<Utc>>,

    /// Heart rate in beats per minute
    pub heart_rate: Option<f64>,

    /// Cadence (steps per minute for running, revolutions per minute for cycling)
    pub cadence: Option<f64>,
}

/// Axis used to index and segment a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    /// Elapsed seconds since the first timestamp
    #[default]
    Time,
    /// Cumulative geodesic distance in meters
    Distance,
}

impl AxisMode {
    /// Unit label of the axis
    pub fn unit(&self) -> &'static str {
        match self {
            AxisMode::Time => "s",
            AxisMode::Distance => "m",
        }
    }
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisMode::Time => write!(f, "time"),
            AxisMode::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for AxisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" | "seconds" => Ok(AxisMode::Time),
            "distance" | "meters" => Ok(AxisMode::Distance),
            _ => Err(format!("Invalid axis mode: {}", s)),
        }
    }
}

/// Position of a series row along the analysis axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis", rename_all = "lowercase")]
pub enum AxisPosition {
    /// Seconds since the first row
    Elapsed { seconds: f64 },
    /// Geodesic meters from the previous row and their running sum
    Distance {
        delta_meters: f64,
        cumulative_meters: f64,
    },
}

/// A timestamped trackpoint enriched with its axis position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
    pub position: AxisPosition,
}

impl SeriesRow {
    /// Value used for segmentation: elapsed seconds or cumulative meters
    pub fn axis_value(&self) -> f64 {
        match self.position {
            AxisPosition::Elapsed { seconds } => seconds,
            AxisPosition::Distance {
                cumulative_meters, ..
            } => cumulative_meters,
        }
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        match self.position {
            AxisPosition::Elapsed { seconds } => Some(seconds),
            AxisPosition::Distance { .. } => None,
        }
    }

    pub fn delta_distance(&self) -> Option<f64> {
        match self.position {
            AxisPosition::Distance { delta_meters, .. } => Some(delta_meters),
            AxisPosition::Elapsed { .. } => None,
        }
    }

    pub fn cumulative_distance(&self) -> Option<f64> {
        match self.position {
            AxisPosition::Distance {
                cumulative_meters, ..
            } => Some(cumulative_meters),
            AxisPosition::Elapsed { .. } => None,
        }
    }
}

/// Half-open interval `[start, end)` on the analysis axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentRange {
    pub start: f64,
    pub end: f64,
}

impl SegmentRange {
    pub fn new(start: f64, end: f64) -> Self {
        SegmentRange { start, end }
    }

    /// Check if an axis value falls within this range
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value < self.end
    }

    /// Requested width of the range
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

impl From<(f64, f64)> for SegmentRange {
    fn from((start, end): (f64, f64)) -> Self {
        SegmentRange::new(start, end)
    }
}

impl std::str::FromStr for SegmentRange {
    type Err = SegmentError;

    /// Parse `START:END`, e.g. `0:1200`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SegmentError::InvalidRange {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (start, end) = s.split_once(':').ok_or_else(|| invalid("expected START:END"))?;
        let start: f64 = start.trim().parse().map_err(|_| invalid("start is not a number"))?;
        let end: f64 = end.trim().parse().map_err(|_| invalid("end is not a number"))?;
        if !start.is_finite() || !end.is_finite() {
            return Err(invalid("bounds must be finite"));
        }

        Ok(SegmentRange::new(start, end))
    }
}

/// Named workout phases, in presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentName {
    #[serde(rename = "Warm-up")]
    WarmUp,
    Interval,
    #[serde(rename = "Cool-down")]
    CoolDown,
}

impl SegmentName {
    pub const ALL: [SegmentName; 3] = [
        SegmentName::WarmUp,
        SegmentName::Interval,
        SegmentName::CoolDown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SegmentName::WarmUp => "Warm-up",
            SegmentName::Interval => "Interval",
            SegmentName::CoolDown => "Cool-down",
        }
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three ranges requested for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPlan {
    pub warmup: SegmentRange,
    pub interval: SegmentRange,
    pub cooldown: SegmentRange,
}

impl SegmentPlan {
    pub fn new(warmup: SegmentRange, interval: SegmentRange, cooldown: SegmentRange) -> Self {
        SegmentPlan {
            warmup,
            interval,
            cooldown,
        }
    }

    /// Contiguous default plan over `[0, extent)`.
    ///
    /// The warm-up covers the first `warmup_width` units, the interval the next
    /// `interval_width` units, and the cool-down the rest. Every bound is
    /// clamped to the extent, so a zero extent yields three zero-width ranges.
    pub fn contiguous(extent: u64, warmup_width: f64, interval_width: f64) -> Self {
        Self::chained(extent, warmup_width, interval_width, None, None, None)
    }

    /// Plan where every range not given starts at the end of the previous one
    pub fn chained(
        extent: u64,
        warmup_width: f64,
        interval_width: f64,
        warmup: Option<SegmentRange>,
        interval: Option<SegmentRange>,
        cooldown: Option<SegmentRange>,
    ) -> Self {
        let total = extent as f64;
        let warmup = warmup
            .unwrap_or_else(|| SegmentRange::new(0.0, warmup_width.max(0.0).min(total)));
        let interval = interval.unwrap_or_else(|| {
            SegmentRange::new(
                warmup.end,
                (warmup.end + interval_width.max(0.0)).min(total),
            )
        });
        let cooldown = cooldown.unwrap_or_else(|| SegmentRange::new(interval.end, total));

        SegmentPlan {
            warmup,
            interval,
            cooldown,
        }
    }

    pub fn range(&self, name: SegmentName) -> SegmentRange {
        match name {
            SegmentName::WarmUp => self.warmup,
            SegmentName::Interval => self.interval,
            SegmentName::CoolDown => self.cooldown,
        }
    }

    /// Named ranges in presentation order
    pub fn ranges(&self) -> [(SegmentName, SegmentRange); 3] {
        SegmentName::ALL.map(|name| (name, self.range(name)))
    }
}

/// Axis-specific extent reported for a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentExtent {
    /// Number of rows in the segment (time axis)
    Points(usize),
    /// Requested range width in meters (distance axis)
    Meters(f64),
}

/// Aggregated statistics for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Duration in minutes
    pub duration_minutes: Option<f64>,

    /// Average heart rate over rows that carry one
    pub avg_heart_rate: Option<f64>,

    /// Maximum heart rate reached in the segment
    pub max_heart_rate: Option<f64>,

    /// Average cadence over rows that carry one
    pub avg_cadence: Option<f64>,

    /// Point count or covered distance, depending on the axis
    pub extent: SegmentExtent,
}
