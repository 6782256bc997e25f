use axum::extract::Multipart;
use gridlens_core::AppError;

use super::types::ExtractedFile;

/// Extract the first file part from a multipart request.
///
/// A part counts as a file when its content-disposition declares a
/// filename. Additional file parts are ignored (single-file-per-request
/// contract). A body with no file part is a validation failure, checked
/// explicitly before any external call.
pub async fn extract_first_file(
    mut multipart: Multipart,
    filename_hint: Option<String>,
    max_file_size: usize,
) -> Result<ExtractedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart body: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?
            .to_vec();

        validate_file_size(data.len(), max_file_size)?;

        return Ok(ExtractedFile {
            filename,
            filename_hint: filename_hint.filter(|hint| !hint.trim().is_empty()),
            content_type,
            data,
        });
    }

    Err(AppError::Validation("no file to upload".to_string()))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_within_limit_passes() {
        assert!(validate_file_size(100, 100).is_ok());
        assert!(validate_file_size(0, 100).is_ok());
    }

    #[test]
    fn size_over_limit_is_payload_too_large() {
        let err = validate_file_size(101, 100).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
