use super::{extent_header, DisplayReport, ExportError};

fn field(value: Option<f64>) -> String {
    value.map_or(String::new(), |v| format!("{:.1}", v))
}

/// Render the rounded report as CSV, one row per segment
pub fn render_csv(report: &DisplayReport) -> Result<String, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    let serialization = |e: ::csv::Error| ExportError::SerializationError(e.to_string());

    writer
        .write_record([
            "Segment",
            "Duration_Min",
            "Avg_HR",
            "Max_HR",
            "Avg_Cadence",
            extent_header(report.mode),
        ])
        .map_err(serialization)?;

    for (name, summary) in &report.segments {
        let extent = match (summary.points, summary.distance_m) {
            (Some(points), _) => points.to_string(),
            (None, meters) => field(meters),
        };

        writer
            .write_record([
                name.label().to_string(),
                field(summary.duration_minutes),
                field(summary.avg_heart_rate),
                field(summary.max_heart_rate),
                field(summary.avg_cadence),
                extent,
            ])
            .map_err(serialization)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_report;
    use crate::models::AxisMode;

    #[test]
    fn test_render_csv() {
        let report = sample_report(AxisMode::Distance);
        let csv = render_csv(&DisplayReport::from(&report)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Segment,Duration_Min,Avg_HR,Max_HR,Avg_Cadence,Distance (m)"
        );
        assert_eq!(lines[1], "Warm-up,20.0,131.3,148.0,82.0,1200.0");
        assert_eq!(lines[2], "Interval,10.0,171.6,183.0,,600.0");
        assert_eq!(lines[3], "Cool-down,,,,,0.0");
    }
}
