use crate::models::{AxisMode, SegmentRange, SeriesRow};
use crate::series::Series;

/// Rows of a series that fall inside one requested range
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSlice<'a> {
    /// Axis of the series the rows were taken from
    pub mode: AxisMode,
    pub range: SegmentRange,
    pub rows: Vec<&'a SeriesRow>,
}

impl<'a> SegmentSlice<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&'a SeriesRow> {
        self.rows.first().copied()
    }

    pub fn last(&self) -> Option<&'a SeriesRow> {
        self.rows.last().copied()
    }
}

/// Half-open range filter over a series
pub struct Segmenter;

impl Segmenter {
    /// Rows whose axis value `v` satisfies `start <= v < end`, in series order.
    ///
    /// Ranges are not validated: an inverted or zero-width range simply
    /// selects nothing.
    pub fn slice(series: &Series, range: SegmentRange) -> SegmentSlice<'_> {
        let rows = series
            .rows
            .iter()
            .filter(|row| range.contains(row.axis_value()))
            .collect();

        SegmentSlice {
            mode: series.mode,
            range,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trackpoint;
    use crate::series::SeriesBuilder;
    use chrono::{Duration, TimeZone, Utc};

    fn series_at(seconds: &[i64]) -> Series {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
        let points: Vec<Trackpoint> = seconds
            .iter()
            .map(|&s| Trackpoint {
                latitude: 0.0,
                longitude: 0.0,
                elevation: None,
                time: Some(base + Duration::seconds(s)),
                heart_rate: None,
                cadence: None,
            })
            .collect();
        SeriesBuilder::build(&points, AxisMode::Time)
    }

    #[test]
    fn test_slice_is_half_open() {
        let series = series_at(&[0, 10, 20]);
        let slice = Segmenter::slice(&series, SegmentRange::new(0.0, 10.0));
        assert_eq!(slice.len(), 1);
        assert_eq!(slice.first().and_then(|r| r.elapsed_seconds()), Some(0.0));

        let slice = Segmenter::slice(&series, SegmentRange::new(10.0, 21.0));
        assert_eq!(slice.len(), 2);
    }

    #[test]
    fn test_zero_width_and_inverted_ranges_are_empty() {
        let series = series_at(&[0, 10, 20]);
        assert!(Segmenter::slice(&series, SegmentRange::new(10.0, 10.0)).is_empty());
        assert!(Segmenter::slice(&series, SegmentRange::new(20.0, 5.0)).is_empty());
    }

    #[test]
    fn test_overlapping_ranges_are_allowed() {
        let series = series_at(&[0, 10, 20, 30]);
        let a = Segmenter::slice(&series, SegmentRange::new(0.0, 25.0));
        let b = Segmenter::slice(&series, SegmentRange::new(5.0, 35.0));
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_slice_carries_series_axis() {
        let series = series_at(&[0, 10]);
        assert_eq!(Segmenter::slice(&series, SegmentRange::new(0.0, 5.0)).mode, AxisMode::Time);

        let distance = SeriesBuilder::build_distance_series(&[]);
        let slice = Segmenter::slice(&distance, SegmentRange::new(0.0, 5.0));
        assert_eq!(slice.mode, AxisMode::Distance);
    }

    #[test]
    fn test_slice_preserves_order() {
        let series = series_at(&[0, 5, 10, 15, 20]);
        let slice = Segmenter::slice(&series, SegmentRange::new(5.0, 20.0));
        let values: Vec<f64> = slice.rows.iter().map(|r| r.axis_value()).collect();
        assert_eq!(values, vec![5.0, 10.0, 15.0]);
        assert_eq!(slice.last().map(|r| r.axis_value()), Some(15.0));
    }
}
