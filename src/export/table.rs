use tabled::builder::Builder;
use tabled::settings::Style;

use super::{extent_header, DisplayReport, DisplaySummary};

fn cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn extent_cell(summary: &DisplaySummary) -> String {
    match (summary.points, summary.distance_m) {
        (Some(points), _) => points.to_string(),
        (None, Some(meters)) => format!("{:.1}", meters),
        (None, None) => "-".to_string(),
    }
}

/// Render the per-segment summary as a terminal table
pub fn render_table(report: &DisplayReport) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Segment",
        "Duration (min)",
        "Avg HR",
        "Max HR",
        "Avg Cadence",
        extent_header(report.mode),
    ]);

    for (name, summary) in &report.segments {
        builder.push_record([
            name.label().to_string(),
            cell(summary.duration_minutes),
            cell(summary.avg_heart_rate),
            cell(summary.max_heart_rate),
            cell(summary.avg_cadence),
            extent_cell(summary),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
