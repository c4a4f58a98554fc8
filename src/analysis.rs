//! Analysis entry points
//!
//! An [`Activity`] owns the trackpoints of one uploaded file. Series and
//! reports are derived from it on demand, so a presentation layer can
//! re-run segmentation with new ranges without parsing the file again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::Result;
use crate::import;
use crate::models::{AxisMode, SegmentName, SegmentPlan, SegmentSummary, Trackpoint};
use crate::segment::Segmenter;
use crate::series::{Series, SeriesBuilder};
use crate::summary::SegmentAggregator;

/// Result of splitting one workout into its three segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Axis used for segmentation
    pub mode: AxisMode,

    /// Usable rows in the series
    pub rows: usize,

    /// Total axis extent (whole seconds or meters)
    pub extent: u64,

    /// Ranges that were requested
    pub plan: SegmentPlan,

    /// Summary per segment, in Warm-up, Interval, Cool-down order
    pub segments: BTreeMap<SegmentName, SegmentSummary>,
}

impl AnalysisReport {
    pub fn segment(&self, name: SegmentName) -> Option<&SegmentSummary> {
        self.segments.get(&name)
    }
}

/// A parsed workout recording
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    points: Vec<Trackpoint>,
}

impl Activity {
    pub fn new(points: Vec<Trackpoint>) -> Self {
        Activity { points }
    }

    /// Parse raw GPX bytes
    pub fn from_gpx(content: &[u8]) -> Result<Self> {
        Ok(Self::new(import::parse_gpx(content)?))
    }

    /// Read and parse a GPX file
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(import::import_file(path)?))
    }

    pub fn points(&self) -> &[Trackpoint] {
        &self.points
    }

    pub fn has_heart_rate(&self) -> bool {
        self.points.iter().any(|p| p.heart_rate.is_some())
    }

    pub fn has_cadence(&self) -> bool {
        self.points.iter().any(|p| p.cadence.is_some())
    }

    pub fn series(&self, mode: AxisMode) -> Series {
        SeriesBuilder::build(&self.points, mode)
    }

    pub fn analyze(&self, plan: &SegmentPlan, mode: AxisMode) -> AnalysisReport {
        analyze_series(&self.series(mode), plan)
    }
}

/// Segment and aggregate an already built series
pub fn analyze_series(series: &Series, plan: &SegmentPlan) -> AnalysisReport {
    let segments = plan
        .ranges()
        .into_iter()
        .map(|(name, range)| {
            let slice = Segmenter::slice(series, range);
            (name, SegmentAggregator::summarize(&slice))
        })
        .collect();

    AnalysisReport {
        mode: series.mode,
        rows: series.len(),
        extent: series.extent,
        plan: *plan,
        segments,
    }
}

/// Parse GPX bytes and split the workout with the given ranges
#[instrument(skip(content, plan), fields(bytes = content.len()))]
pub fn analyze_gpx(content: &[u8], plan: &SegmentPlan, mode: AxisMode) -> Result<AnalysisReport> {
    let activity = Activity::from_gpx(content)?;
    let report = activity.analyze(plan, mode);

    info!(
        %mode,
        points = activity.points().len(),
        rows = report.rows,
        extent = report.extent,
        "Analysis complete"
    );

    Ok(report)
}
