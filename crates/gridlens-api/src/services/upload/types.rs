/// File content pulled out of the multipart request, fully buffered
/// because EXIF parsing and the storage upload both need replayable
/// access to the bytes.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Filename declared in the part's content-disposition.
    pub filename: String,
    /// Optional client-supplied name from the `filename` query parameter.
    /// Only consulted for the reported display name, never for the
    /// extension or the storage key.
    pub filename_hint: Option<String>,
    /// Declared content type, defaulted when the part carries none.
    pub content_type: String,
    pub data: Vec<u8>,
}
