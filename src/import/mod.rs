use std::path::Path;

use crate::error::Result;
use crate::models::Trackpoint;

pub mod extensions;
pub mod gpx;

pub use self::gpx::GpxImporter;

/// Import a single GPX file
pub fn import_file(file_path: &Path) -> Result<Vec<Trackpoint>> {
    GpxImporter::new().import_file(file_path)
}

/// Parse GPX content already held in memory
pub fn parse_gpx(content: &[u8]) -> Result<Vec<Trackpoint>> {
    GpxImporter::new().parse_bytes(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GpxError, SplitRsError};
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_import_file_reads_from_disk() {
        let mut file = Builder::new().suffix(".gpx").tempfile().unwrap();
        write!(
            file,
            r#"<gpx version="1.1" creator="t"><trk><trkseg>
                 <trkpt lat="1" lon="2"><time>2024-01-01T00:00:00Z</time></trkpt>
               </trkseg></trk></gpx>"#
        )
        .unwrap();

        let points = import_file(file.path()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].latitude, 1.0);
        assert_eq!(points[0].longitude, 2.0);
    }

    #[test]
    fn test_import_rejects_other_extensions() {
        let file = Builder::new().suffix(".fit").tempfile().unwrap();
        assert!(matches!(
            import_file(file.path()),
            Err(SplitRsError::Gpx(GpxError::UnsupportedFile { .. }))
        ));
    }
}
