//! Heart-rate and cadence extraction from GPX point extensions
//!
//! GPX carries sensor data in vendor-specific `<extensions>` blocks, e.g.
//!
//! ```xml
//! <trkpt lat="52.1" lon="4.3">
//!   <extensions>
//!     <gpxtpx:TrackPointExtension>
//!       <gpxtpx:hr>152</gpxtpx:hr>
//!       <gpxtpx:cad>88</gpxtpx:cad>
//!     </gpxtpx:TrackPointExtension>
//!   </extensions>
//! </trkpt>
//! ```
//!
//! Only the first container element inside `<extensions>` is scanned. Each
//! direct child is matched on its lowercased local name: a name containing
//! "hr" feeds the heart rate, otherwise a name containing "cad" feeds the
//! cadence. The first matching child wins for each field.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::GpxError;

/// Sensor values found on a single track point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorValues {
    pub heart_rate: Option<f64>,
    pub cadence: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SensorField {
    HeartRate,
    Cadence,
}

impl SensorField {
    fn from_tag(tag: &str) -> Option<Self> {
        if tag.contains("hr") {
            Some(SensorField::HeartRate)
        } else if tag.contains("cad") {
            Some(SensorField::Cadence)
        } else {
            None
        }
    }
}

/// Coerce raw extension text to a sensor reading.
///
/// Anything that is not a finite, non-negative number is treated as missing.
pub fn coerce_sensor_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Child element of the extension container whose text is being collected
#[derive(Debug)]
struct Capture {
    field: Option<SensorField>,
    depth: usize,
    text: String,
}

/// Stack machine tracking where the reader is relative to `trk/trkseg/trkpt`
#[derive(Debug, Default)]
struct PointScanner {
    stack: Vec<String>,
    points: Vec<SensorValues>,
    point_depth: Option<usize>,
    extensions_depth: Option<usize>,
    container_depth: Option<usize>,
    extensions_seen: bool,
    container_seen: bool,
    heart_rate_matched: bool,
    cadence_matched: bool,
    current: SensorValues,
    capture: Option<Capture>,
}

impl PointScanner {
    fn inside_track_segment(&self) -> bool {
        let n = self.stack.len();
        n >= 2 && self.stack[n - 2] == "trk" && self.stack[n - 1] == "trkseg"
    }

    fn open(&mut self, name: String) {
        let depth = self.stack.len();

        match self.point_depth {
            None => {
                if name == "trkpt" && self.inside_track_segment() {
                    self.begin_point(depth);
                }
            }
            Some(point) => {
                if depth == point + 1 && name == "extensions" && !self.extensions_seen {
                    self.extensions_seen = true;
                    self.extensions_depth = Some(depth);
                } else if self.extensions_depth.map_or(false, |ext| depth == ext + 1)
                    && !self.container_seen
                {
                    self.container_seen = true;
                    self.container_depth = Some(depth);
                } else if self.container_depth.map_or(false, |c| depth == c + 1) {
                    self.capture = Some(Capture {
                        field: SensorField::from_tag(&name),
                        depth,
                        text: String::new(),
                    });
                }
            }
        }

        self.stack.push(name);
    }

    fn text(&mut self, text: &str) {
        let depth = self.stack.len();
        if let Some(capture) = self.capture.as_mut() {
            if depth == capture.depth + 1 {
                capture.text.push_str(text);
            }
        }
    }

    fn close(&mut self) {
        if self.stack.pop().is_none() {
            return;
        }
        let depth = self.stack.len();

        if self.capture.as_ref().map_or(false, |c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                self.record(capture);
            }
        }
        if self.container_depth == Some(depth) {
            self.container_depth = None;
        }
        if self.extensions_depth == Some(depth) {
            self.extensions_depth = None;
        }
        if self.point_depth == Some(depth) {
            self.points.push(self.current);
            self.point_depth = None;
        }
    }

    fn begin_point(&mut self, depth: usize) {
        self.point_depth = Some(depth);
        self.extensions_depth = None;
        self.container_depth = None;
        self.extensions_seen = false;
        self.container_seen = false;
        self.heart_rate_matched = false;
        self.cadence_matched = false;
        self.current = SensorValues::default();
        self.capture = None;
    }

    fn record(&mut self, capture: Capture) {
        match capture.field {
            Some(SensorField::HeartRate) if !self.heart_rate_matched => {
                self.heart_rate_matched = true;
                self.current.heart_rate = coerce_sensor_value(&capture.text);
            }
            Some(SensorField::Cadence) if !self.cadence_matched => {
                self.cadence_matched = true;
                self.current.cadence = coerce_sensor_value(&capture.text);
            }
            _ => {}
        }
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).to_lowercase()
}

/// Scan a GPX document and return the sensor values of every track point,
/// in document order.
///
/// The scan also acts as the well-formedness check for the document: any
/// XML error aborts with [`GpxError::Xml`].
pub fn scan_track_point_sensors(xml: &str) -> Result<Vec<SensorValues>, GpxError> {
    let mut reader = Reader::from_str(xml);
    let mut scanner = PointScanner::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => scanner.open(local_name(&element)),
            Ok(Event::Empty(element)) => {
                scanner.open(local_name(&element));
                scanner.close();
            }
            Ok(Event::End(_)) => scanner.close(),
            Ok(Event::Text(text)) => {
                if scanner.capture.is_some() {
                    let unescaped = text.unescape().map_err(|e| GpxError::Xml {
                        position: reader.buffer_position(),
                        reason: e.to_string(),
                    })?;
                    scanner.text(&unescaped);
                }
            }
            Ok(Event::CData(data)) => {
                if scanner.capture.is_some() {
                    scanner.text(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(GpxError::Xml {
                    position: reader.buffer_position(),
                    reason: e.to_string(),
                })
            }
        }
    }

    if !scanner.stack.is_empty() {
        return Err(GpxError::Xml {
            position: reader.buffer_position(),
            reason: format!("unclosed element <{}>", scanner.stack.join("/")),
        });
    }

    Ok(scanner.points)
}
