use crate::processing::ExtractionError;

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Decodes UTF-8 as-is. No normalisation, so the output is byte-identical
    /// to the upload.
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractionError::Decode(format!("File is not valid UTF-8: {e}")))
    }
}
