use crate::processing::ExtractionError;

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::PdfParse(format!("PDF extraction failed: {e}")))
    }
}
