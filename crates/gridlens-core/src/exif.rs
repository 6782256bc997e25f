//! EXIF capture-metadata extraction
//!
//! Reads the capture timestamp and GPS position embedded in an uploaded
//! image. Extraction is opportunistic: any parse failure, missing block,
//! or malformed tag yields an empty (or partial) result and never an
//! error, so a photo without EXIF uploads exactly like one with it.

use std::io::Cursor;

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};

/// Capture metadata extracted from an image, all fields independently
/// optional.
///
/// `capture_date` is `MMddyyyy` and `capture_time` is `HHmmss`, both
/// zero-padded and timezone-naive (whatever zone the camera wrote).
/// Coordinates are signed decimal degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMetadata {
    pub capture_date: Option<String>,
    pub capture_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CaptureMetadata {
    pub fn is_empty(&self) -> bool {
        self.capture_date.is_none()
            && self.capture_time.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    /// Key/value pairs attached to the stored object, mirroring the
    /// fields persisted on the metadata record. Only present fields are
    /// emitted, so both sinks always carry the same view.
    pub fn object_metadata(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref date) = self.capture_date {
            pairs.push(("exifCaptureDate", date.clone()));
        }
        if let Some(ref time) = self.capture_time {
            pairs.push(("exifCaptureTime", time.clone()));
        }
        if let Some(lat) = self.latitude {
            pairs.push(("exifLatGPS", lat.to_string()));
        }
        if let Some(long) = self.longitude {
            pairs.push(("exifLongGPS", long.to_string()));
        }
        pairs
    }
}

/// Extract capture timestamp and GPS position from an in-memory image.
pub fn extract_capture_metadata(data: &[u8]) -> CaptureMetadata {
    let mut cursor = Cursor::new(data);
    let exif_data = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "No readable EXIF block in upload");
            return CaptureMetadata::default();
        }
    };

    let mut metadata = CaptureMetadata::default();

    let timestamp = ascii_field(&exif_data, Tag::DateTimeOriginal)
        .or_else(|| ascii_field(&exif_data, Tag::DateTime));
    if let Some((date, time)) = timestamp.as_deref().and_then(format_capture_timestamp) {
        metadata.capture_date = Some(date);
        metadata.capture_time = Some(time);
    }

    if let Some((latitude, longitude)) = parse_gps(&exif_data) {
        metadata.latitude = Some(latitude);
        metadata.longitude = Some(longitude);
    }

    metadata
}

/// First ASCII string of a tag, if present and valid UTF-8.
fn ascii_field(exif_data: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif_data.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) if !values.is_empty() => std::str::from_utf8(&values[0])
            .ok()
            .map(|s| s.trim().to_string()),
        _ => None,
    }
}

/// `YYYY:MM:DD HH:MM:SS` (EXIF form) to (`MMddyyyy`, `HHmmss`).
fn format_capture_timestamp(raw: &str) -> Option<(String, String)> {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S").ok()?;
    Some((
        parsed.format("%m%d%Y").to_string(),
        parsed.format("%H%M%S").to_string(),
    ))
}

/// GPS position in signed decimal degrees. Requires all four tags
/// (latitude, longitude, and both hemisphere references); otherwise the
/// position is not used at all.
fn parse_gps(exif_data: &exif::Exif) -> Option<(f64, f64)> {
    let latitude = dms_field(exif_data, Tag::GPSLatitude)?;
    let longitude = dms_field(exif_data, Tag::GPSLongitude)?;
    let lat_ref = ascii_field(exif_data, Tag::GPSLatitudeRef)?;
    let long_ref = ascii_field(exif_data, Tag::GPSLongitudeRef)?;

    Some((
        apply_hemisphere(latitude, &lat_ref, "S"),
        apply_hemisphere(longitude, &long_ref, "W"),
    ))
}

/// Degree/minute/second rationals of a tag as unsigned decimal degrees.
fn dms_field(exif_data: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = exif_data.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref components) if components.len() >= 3 => Some(dms_to_decimal(
            components[0].to_f64(),
            components[1].to_f64(),
            components[2].to_f64(),
        )),
        _ => None,
    }
}

fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

fn apply_hemisphere(decimal: f64, reference: &str, negative_ref: &str) -> f64 {
    if reference.eq_ignore_ascii_case(negative_ref) {
        -decimal
    } else {
        decimal
    }
}
