use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::{GpxError, Result, SplitRsError};
use crate::import::extensions::{scan_track_point_sensors, SensorValues};
use crate::models::Trackpoint;

/// GPX importer for GPS track data
///
/// Geometry and timestamps are read with the `gpx` crate; heart rate and
/// cadence come from a second pass over the point extensions, which the
/// `gpx` crate does not expose.
#[derive(Debug, Default, Clone, Copy)]
pub struct GpxImporter;

impl GpxImporter {
    pub fn new() -> Self {
        Self
    }

    /// Check if this importer can handle the given file
    pub fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == "gpx")
            .unwrap_or(false)
    }

    /// Read a GPX file into memory once and parse it
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    pub fn import_file(&self, file_path: &Path) -> Result<Vec<Trackpoint>> {
        if !self.can_import(file_path) {
            return Err(GpxError::UnsupportedFile {
                path: file_path.to_path_buf(),
            }
            .into());
        }

        info!("Importing GPX file");
        let content = std::fs::read(file_path)?;
        self.parse_bytes(&content)
    }

    /// Parse raw GPX bytes into a flat, document-ordered trackpoint list
    pub fn parse_bytes(&self, content: &[u8]) -> Result<Vec<Trackpoint>> {
        let text = std::str::from_utf8(content).map_err(|e| GpxError::Encoding {
            reason: e.to_string(),
        })?;
        self.parse_str(text)
    }

    pub fn parse_str(&self, text: &str) -> Result<Vec<Trackpoint>> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let sensors = scan_track_point_sensors(text)?;
        let document = ::gpx::read(text.as_bytes()).map_err(|e| GpxError::Schema {
            reason: e.to_string(),
        })?;

        let waypoints: Vec<&::gpx::Waypoint> = document
            .tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
            .collect();
        let points = Self::merge_sensors(&waypoints, &sensors)?;

        debug!(
            tracks = document.tracks.len(),
            points = points.len(),
            with_heart_rate = points.iter().filter(|p| p.heart_rate.is_some()).count(),
            with_cadence = points.iter().filter(|p| p.cadence.is_some()).count(),
            "Parsed GPX document"
        );

        Ok(points)
    }

    /// Pair every waypoint with the sensor values scanned at the same index
    fn merge_sensors(
        waypoints: &[&::gpx::Waypoint],
        sensors: &[SensorValues],
    ) -> Result<Vec<Trackpoint>> {
        if waypoints.len() != sensors.len() {
            return Err(SplitRsError::Gpx(GpxError::InconsistentPoints {
                expected: waypoints.len(),
                found: sensors.len(),
            }));
        }

        waypoints
            .iter()
            .zip(sensors)
            .map(|(waypoint, sensor)| Self::to_trackpoint(waypoint, *sensor))
            .collect()
    }

    fn to_trackpoint(waypoint: &::gpx::Waypoint, sensor: SensorValues) -> Result<Trackpoint> {
        let position = waypoint.point();
        let time = waypoint.time.as_ref().map(Self::to_utc).transpose()?;

        Ok(Trackpoint {
            latitude: position.y(),
            longitude: position.x(),
            elevation: waypoint.elevation,
            time,
            heart_rate: sensor.heart_rate,
            cadence: sensor.cadence,
        })
    }

    fn to_utc(time: &::gpx::Time) -> std::result::Result<DateTime<Utc>, GpxError> {
        let iso = time.format().map_err(|e| GpxError::Schema {
            reason: e.to_string(),
        })?;
        DateTime::parse_from_rfc3339(&iso)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| GpxError::Schema {
                reason: format!("invalid timestamp '{}': {}", iso, e),
            })
    }
}
