use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exif::CaptureMetadata;

/// Metadata record persisted for each uploaded image.
///
/// The record is created once at ingestion with every enrichment
/// placeholder unset; out-of-process workers populate those fields
/// later. The core never mutates a record after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: Uuid,
    pub media_url: String,
    pub created_at: DateTime<Utc>,
    // Capture metadata mirrored from the stored object
    pub exif_capture_date: Option<String>,
    pub exif_capture_time: Option<String>,
    pub exif_lat_gps: Option<f64>,
    pub exif_long_gps: Option<f64>,
    // Enrichment placeholders, populated by downstream workers
    pub ocr_text: Option<String>,
    pub has_high_voltage_sign: Option<bool>,
    pub has_live_electrical_sign: Option<bool>,
    pub has_live_wires_sign: Option<bool>,
    pub tags: Option<String>,
    pub dominant_colours: Option<String>,
    pub accent_colour: Option<String>,
    pub is_on_fire: Option<bool>,
    pub contains_transformer: Option<bool>,
    pub contains_pole: Option<bool>,
}

impl ImageRecord {
    /// Build the record for a freshly stored object. Enrichment fields
    /// start unset; capture metadata is whatever extraction found.
    pub fn new(id: Uuid, media_url: String, capture: &CaptureMetadata) -> Self {
        ImageRecord {
            id,
            media_url,
            created_at: Utc::now(),
            exif_capture_date: capture.capture_date.clone(),
            exif_capture_time: capture.capture_time.clone(),
            exif_lat_gps: capture.latitude,
            exif_long_gps: capture.longitude,
            ocr_text: None,
            has_high_voltage_sign: None,
            has_live_electrical_sign: None,
            has_live_wires_sign: None,
            tags: None,
            dominant_colours: None,
            accent_colour: None,
            is_on_fire: None,
            contains_transformer: None,
            contains_pole: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_leaves_enrichment_unset() {
        let capture = CaptureMetadata {
            capture_date: Some("03052020".to_string()),
            capture_time: Some("140709".to_string()),
            latitude: Some(40.446111),
            longitude: Some(-79.982222),
        };
        let id = Uuid::new_v4();
        let record = ImageRecord::new(id, "https://example/blob.jpg".to_string(), &capture);

        assert_eq!(record.id, id);
        assert_eq!(record.exif_capture_date.as_deref(), Some("03052020"));
        assert_eq!(record.exif_lat_gps, Some(40.446111));
        assert!(record.ocr_text.is_none());
        assert!(record.has_high_voltage_sign.is_none());
        assert!(record.has_live_electrical_sign.is_none());
        assert!(record.has_live_wires_sign.is_none());
        assert!(record.tags.is_none());
        assert!(record.dominant_colours.is_none());
        assert!(record.accent_colour.is_none());
        assert!(record.is_on_fire.is_none());
        assert!(record.contains_transformer.is_none());
        assert!(record.contains_pole.is_none());
    }

    #[test]
    fn record_without_capture_metadata_has_no_exif_fields() {
        let record = ImageRecord::new(
            Uuid::new_v4(),
            "https://example/blob".to_string(),
            &CaptureMetadata::default(),
        );
        assert!(record.exif_capture_date.is_none());
        assert!(record.exif_capture_time.is_none());
        assert!(record.exif_lat_gps.is_none());
        assert!(record.exif_long_gps.is_none());
    }
}
