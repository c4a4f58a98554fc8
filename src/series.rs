//! Series builders for the time and distance axes
//!
//! Both builders drop trackpoints without a timestamp, order the remainder
//! chronologically and attach an [`AxisPosition`] to every row. The distance
//! builder evaluates one WGS-84 geodesic per consecutive pair, so the cost
//! stays linear in the number of points.

use chrono::{DateTime, Utc};
use geo::{point, GeodesicDistance};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::models::{AxisMode, AxisPosition, SeriesRow, Trackpoint};

/// Normalized, axis-indexed workout series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Axis the rows are positioned on
    pub mode: AxisMode,

    /// Rows in chronological order
    pub rows: Vec<SeriesRow>,

    /// Largest axis value, truncated to whole seconds or meters
    pub extent: u64,
}

impl Series {
    pub fn empty(mode: AxisMode) -> Self {
        Series {
            mode,
            rows: Vec::new(),
            extent: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Axis values in row order
    pub fn axis_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(SeriesRow::axis_value)
    }
}

/// Builds [`Series`] values from loaded trackpoints
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Build the series for the requested axis
    #[instrument(skip(points), fields(points = points.len()))]
    pub fn build(points: &[Trackpoint], mode: AxisMode) -> Series {
        match mode {
            AxisMode::Time => Self::build_time_series(points),
            AxisMode::Distance => Self::build_distance_series(points),
        }
    }

    /// Elapsed seconds since the first timestamped point
    pub fn build_time_series(points: &[Trackpoint]) -> Series {
        let timed = Self::timed_points(points);
        let Some(&(start, _)) = timed.first() else {
            return Series::empty(AxisMode::Time);
        };

        let rows: Vec<SeriesRow> = timed
            .iter()
            .map(|&(time, point)| {
                let seconds = seconds_between(start, time);
                Self::row(time, point, AxisPosition::Elapsed { seconds })
            })
            .collect();

        Self::finish(AxisMode::Time, rows)
    }

    /// Cumulative geodesic distance along consecutive points
    pub fn build_distance_series(points: &[Trackpoint]) -> Series {
        let timed = Self::timed_points(points);
        let mut rows = Vec::with_capacity(timed.len());
        let mut previous: Option<&Trackpoint> = None;
        let mut cumulative_meters = 0.0;

        for &(time, point) in &timed {
            let delta_meters = previous.map_or(0.0, |prev| geodesic_distance(prev, point));
            cumulative_meters += delta_meters;
            rows.push(Self::row(
                time,
                point,
                AxisPosition::Distance {
                    delta_meters,
                    cumulative_meters,
                },
            ));
            previous = Some(point);
        }

        Self::finish(AxisMode::Distance, rows)
    }

    /// Drop points without a timestamp and stable-sort the rest by time
    fn timed_points(points: &[Trackpoint]) -> Vec<(DateTime<Utc>, &Trackpoint)> {
        let mut timed: Vec<(DateTime<Utc>, &Trackpoint)> = points
            .iter()
            .filter_map(|point| point.time.map(|time| (time, point)))
            .collect();

        let dropped = points.len() - timed.len();
        if dropped > 0 {
            debug!(dropped, "Dropped trackpoints without timestamp");
        }

        if timed.windows(2).any(|pair| pair[1].0 < pair[0].0) {
            warn!(
                points = timed.len(),
                "Trackpoints are not in chronological order, sorting by timestamp"
            );
            timed.sort_by_key(|&(time, _)| time);
        }

        timed
    }

    fn row(time: DateTime<Utc>, point: &Trackpoint, position: AxisPosition) -> SeriesRow {
        SeriesRow {
            time,
            latitude: point.latitude,
            longitude: point.longitude,
            elevation: point.elevation,
            heart_rate: point.heart_rate,
            cadence: point.cadence,
            position,
        }
    }

    fn finish(mode: AxisMode, rows: Vec<SeriesRow>) -> Series {
        let max = rows
            .iter()
            .map(SeriesRow::axis_value)
            .fold(0.0_f64, f64::max);
        let extent = max.trunc() as u64;

        debug!(%mode, rows = rows.len(), extent, "Built series");

        Series { mode, rows, extent }
    }
}

/// Ellipsoidal (WGS-84) distance in meters, ignoring elevation
pub fn geodesic_distance(from: &Trackpoint, to: &Trackpoint) -> f64 {
    let a = point!(x: from.longitude, y: from.latitude);
    let b = point!(x: to.longitude, y: to.latitude);
    a.geodesic_distance(&b)
}

/// Signed seconds from `start` to `end`, microsecond precision
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}
