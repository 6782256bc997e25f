use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response body returned to the uploader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFileInfo {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileExtension")]
    pub file_extension: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "fileURL")]
    pub file_url: String,
}

/// Correlation message enqueued for the enrichment workers.
///
/// Field names are the wire contract consumed by the workers; both ids
/// carry the same per-request identifier, joining the stored object to
/// its metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentNotice {
    #[serde(rename = "BlobName")]
    pub blob_name: String,
    #[serde(rename = "DocumentId")]
    pub document_id: String,
}

impl EnrichmentNotice {
    pub fn for_record(id: Uuid) -> Self {
        EnrichmentNotice {
            blob_name: id.to_string(),
            document_id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_serializes_to_wire_contract() {
        let id = Uuid::new_v4();
        let notice = EnrichmentNotice::for_record(id);
        let json = serde_json::to_value(&notice).unwrap();

        assert_eq!(json["BlobName"], id.to_string());
        assert_eq!(json["DocumentId"], id.to_string());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn upload_info_uses_response_field_names() {
        let info = UploadedFileInfo {
            file_name: "f3b1".to_string(),
            file_extension: ".jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            file_url: "https://example/blob.jpg?sig=abc".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();

        assert!(json.get("fileName").is_some());
        assert!(json.get("fileExtension").is_some());
        assert!(json.get("contentType").is_some());
        assert!(json.get("fileURL").is_some());
    }
}
