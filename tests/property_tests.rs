//! Property-based tests for the series builders, segmenter and aggregator

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use splitrs::{
    analyze_series, AxisMode, SegmentPlan, SegmentRange, Segmenter, SeriesBuilder, Trackpoint,
};

/// (seconds offset, has timestamp, lat, lon, heart rate)
type Sample = (i64, bool, f64, f64, Option<f64>);

fn sample() -> impl Strategy<Value = Sample> {
    (
        0i64..7200,
        prop::bool::weighted(0.9),
        -60.0f64..60.0,
        -120.0f64..120.0,
        prop::option::of(90.0f64..200.0),
    )
}

fn to_points(samples: &[Sample]) -> Vec<Trackpoint> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
    samples
        .iter()
        .map(|&(offset, timed, lat, lon, heart_rate)| Trackpoint {
            latitude: lat,
            longitude: lon,
            elevation: None,
            time: timed.then(|| base + Duration::seconds(offset)),
            heart_rate,
            cadence: None,
        })
        .collect()
}

proptest! {
    #[test]
    fn test_rows_never_exceed_points(samples in prop::collection::vec(sample(), 0..60)) {
        let points = to_points(&samples);
        let timed = points.iter().filter(|p| p.time.is_some()).count();

        for mode in [AxisMode::Time, AxisMode::Distance] {
            let series = SeriesBuilder::build(&points, mode);
            prop_assert!(series.len() <= points.len());
            prop_assert_eq!(series.len(), timed);
        }
    }

    #[test]
    fn test_elapsed_seconds_start_at_zero_and_never_decrease(
        samples in prop::collection::vec(sample(), 1..60)
    ) {
        let series = SeriesBuilder::build_time_series(&to_points(&samples));
        let elapsed: Vec<f64> = series.axis_values().collect();

        if let Some(first) = elapsed.first() {
            prop_assert_eq!(*first, 0.0);
        }
        for pair in elapsed.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_cumulative_distance_is_exact_running_sum(
        samples in prop::collection::vec(sample(), 1..40)
    ) {
        let series = SeriesBuilder::build_distance_series(&to_points(&samples));

        let mut running = 0.0;
        let mut previous = 0.0;
        for (index, row) in series.rows.iter().enumerate() {
            let delta = row.delta_distance().unwrap();
            let cumulative = row.cumulative_distance().unwrap();
            if index == 0 {
                prop_assert_eq!(delta, 0.0);
            }
            prop_assert!(delta >= 0.0);
            running += delta;
            prop_assert_eq!(cumulative, running);
            prop_assert!(cumulative >= previous);
            previous = cumulative;
        }
    }

    #[test]
    fn test_range_past_extent_returns_every_row(
        samples in prop::collection::vec(sample(), 0..40),
        distance in any::<bool>()
    ) {
        let mode = if distance { AxisMode::Distance } else { AxisMode::Time };
        let series = SeriesBuilder::build(&to_points(&samples), mode);
        let slice = Segmenter::slice(&series, SegmentRange::new(0.0, series.extent as f64 + 1.0));
        prop_assert_eq!(slice.len(), series.len());
    }

    #[test]
    fn test_zero_width_range_is_empty(
        samples in prop::collection::vec(sample(), 0..40),
        at in 0.0f64..8000.0
    ) {
        let series = SeriesBuilder::build_time_series(&to_points(&samples));
        let plan = SegmentPlan::new(
            SegmentRange::new(at, at),
            SegmentRange::new(at, at),
            SegmentRange::new(at, at),
        );
        let report = analyze_series(&series, &plan);

        for summary in report.segments.values() {
            prop_assert_eq!(summary.avg_heart_rate, None);
            prop_assert_eq!(summary.max_heart_rate, None);
            prop_assert_eq!(summary.duration_minutes, Some(0.0));
        }
    }

    #[test]
    fn test_analysis_is_deterministic(
        samples in prop::collection::vec(sample(), 0..40),
        warmup in 0.0f64..3600.0,
        interval in 0.0f64..1800.0
    ) {
        let points = to_points(&samples);
        for mode in [AxisMode::Time, AxisMode::Distance] {
            let series = SeriesBuilder::build(&points, mode);
            let plan = SegmentPlan::contiguous(series.extent, warmup, interval);
            prop_assert_eq!(analyze_series(&series, &plan), analyze_series(&series, &plan));
        }
    }

    #[test]
    fn test_heart_rate_max_bounds_mean(samples in prop::collection::vec(sample(), 1..40)) {
        let series = SeriesBuilder::build_time_series(&to_points(&samples));
        let slice = Segmenter::slice(&series, SegmentRange::new(0.0, series.extent as f64 + 1.0));
        let summary = splitrs::SegmentAggregator::summarize(&slice);

        match (summary.avg_heart_rate, summary.max_heart_rate) {
            (Some(mean), Some(max)) => prop_assert!(mean <= max + 1e-9),
            (None, None) => {}
            other => prop_assert!(false, "mean and max disagree on presence: {:?}", other),
        }
    }
}
