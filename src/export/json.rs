use super::{DisplayReport, ExportError};

/// Render the rounded report as pretty-printed JSON
pub fn render_json(report: &DisplayReport) -> Result<String, ExportError> {
    serde_json::to_string_pretty(report).map_err(|e| ExportError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_report;
    use crate::models::AxisMode;

    #[test]
    fn test_render_json_keys_by_segment_name() {
        let report = sample_report(AxisMode::Time);
        let json = render_json(&DisplayReport::from(&report)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "time");
        assert_eq!(value["segments"]["Warm-up"]["avg_heart_rate"], 131.3);
        assert_eq!(value["segments"]["Warm-up"]["points"], 1200);
        assert!(value["segments"]["Cool-down"]["avg_heart_rate"].is_null());
        assert!(value["segments"]["Interval"].get("distance_m").is_none());
    }
}
