//! Per-segment aggregation
//!
//! Duration semantics differ by axis:
//! - time axis: width of the requested range, `(end - start) / 60`
//! - distance axis: wall-clock time between the first and last row in the
//!   slice, which is undefined for an empty slice
//!
//! Heart rate and cadence statistics only consider rows that carry a value.

use tracing::debug;

use crate::error::SegmentError;
use crate::models::{AxisMode, SegmentExtent, SegmentSummary};
use crate::segment::SegmentSlice;
use crate::series::seconds_between;

/// Computes [`SegmentSummary`] values from segment slices
pub struct SegmentAggregator;

impl SegmentAggregator {
    pub fn summarize(slice: &SegmentSlice<'_>) -> SegmentSummary {
        let heart_rates: Vec<f64> = slice.rows.iter().filter_map(|r| r.heart_rate).collect();
        let cadences: Vec<f64> = slice.rows.iter().filter_map(|r| r.cadence).collect();

        let (duration_minutes, extent) = match slice.mode {
            AxisMode::Time => (
                Some(slice.range.width() / 60.0),
                SegmentExtent::Points(slice.len()),
            ),
            AxisMode::Distance => {
                let duration = match Self::elapsed_minutes(slice) {
                    Ok(minutes) => Some(minutes),
                    Err(e) => {
                        debug!(error = %e, "Duration unavailable for segment");
                        None
                    }
                };
                (duration, SegmentExtent::Meters(slice.range.width()))
            }
        };

        SegmentSummary {
            duration_minutes,
            avg_heart_rate: mean(&heart_rates),
            max_heart_rate: max(&heart_rates),
            avg_cadence: mean(&cadences),
            extent,
        }
    }

    /// Minutes between the first and last row of the slice
    pub fn elapsed_minutes(slice: &SegmentSlice<'_>) -> Result<f64, SegmentError> {
        match (slice.first(), slice.last()) {
            (Some(first), Some(last)) => Ok(seconds_between(first.time, last.time) / 60.0),
            _ => Err(SegmentError::EmptySegment {
                start: slice.range.start,
                end: slice.range.end,
            }),
        }
    }
}

/// Arithmetic mean, `None` for no values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Maximum, `None` for no values
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
