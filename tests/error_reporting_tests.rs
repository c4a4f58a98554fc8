//! Integration tests for error reporting
//!
//! Every loader failure aborts the analysis with a typed error; missing
//! sensor values never do.

use splitrs::error::ErrorSeverity;
use splitrs::{analyze_gpx, Activity, AxisMode, GpxError, SegmentError, SegmentPlan, SplitRsError};
use std::io::Write;
use std::path::Path;

fn default_plan() -> SegmentPlan {
    SegmentPlan::contiguous(3600, 1200.0, 600.0)
}

#[test]
fn test_truncated_xml_is_reported_with_position() {
    let err = analyze_gpx(b"<gpx><trk><trkseg><trkpt lat=\"0\"", &default_plan(), AxisMode::Time)
        .unwrap_err();

    assert!(matches!(err, SplitRsError::Gpx(GpxError::Xml { .. })), "got {:?}", err);
    assert_eq!(err.severity(), ErrorSeverity::Error);
    assert!(err.user_message().contains("could not be read as GPX"));
}

#[test]
fn test_non_utf8_input_is_rejected() {
    let err = Activity::from_gpx(&[0x3c, 0x67, 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, SplitRsError::Gpx(GpxError::Encoding { .. })));
}

#[test]
fn test_well_formed_non_gpx_document_is_a_schema_error() {
    let err = Activity::from_gpx(b"<?xml version=\"1.0\"?><kml><Document/></kml>").unwrap_err();
    assert!(matches!(err, SplitRsError::Gpx(GpxError::Schema { .. })), "got {:?}", err);
}

#[test]
fn test_wrong_extension_is_unsupported() {
    let err = Activity::from_file(Path::new("morning_run.fit")).unwrap_err();

    assert!(matches!(err, SplitRsError::Gpx(GpxError::UnsupportedFile { .. })));
    assert_eq!(err.severity(), ErrorSeverity::Warning);
    assert_eq!(err.user_message(), "Not a GPX file: morning_run.fit");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Activity::from_file(&dir.path().join("absent.gpx")).unwrap_err();
    assert!(matches!(err, SplitRsError::Io(_)));
}

#[test]
fn test_unreadable_sensor_values_are_not_errors() {
    let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <trk><trkseg>
    <trkpt lat="0" lon="0"><time>2024-05-01T06:00:00Z</time>
      <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>n/a</gpxtpx:hr><gpxtpx:cad></gpxtpx:cad></gpxtpx:TrackPointExtension></extensions>
    </trkpt>
  </trkseg></trk>
</gpx>"#;

    let mut file = tempfile::Builder::new().suffix(".GPX").tempfile().unwrap();
    file.write_all(gpx.as_bytes()).unwrap();

    let activity = Activity::from_file(file.path()).unwrap();
    assert_eq!(activity.points().len(), 1);
    assert_eq!(activity.points()[0].heart_rate, None);
    assert_eq!(activity.points()[0].cadence, None);
}

#[test]
fn test_invalid_range_message() {
    let err: SplitRsError = "20-40".parse::<splitrs::SegmentRange>().unwrap_err().into();

    assert!(matches!(err, SplitRsError::Segment(SegmentError::InvalidRange { .. })));
    assert_eq!(err.severity(), ErrorSeverity::Warning);
    assert!(err.user_message().contains("START:END"));
}

#[test]
fn test_empty_segment_is_informational() {
    let err = SplitRsError::from(SegmentError::EmptySegment {
        start: 10.0,
        end: 10.0,
    });
    assert_eq!(err.severity(), ErrorSeverity::Info);
    assert!(err.to_string().contains("[10, 10)"));
}
