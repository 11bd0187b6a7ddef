use thiserror::Error;

use crate::models::{DocumentKind, UploadedDocument};
use crate::processing::extractors::{DocxExtractor, PdfExtractor, PlainTextExtractor};

const WORD_MIME_TYPES: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "md", "json"];
const WORD_EXTENSIONS: &[&str] = &["doc", "docx"];

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    PdfParse(String),

    #[error("{0}")]
    DocxParse(String),
}

/// Classifies uploads and turns them into plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Declared MIME type wins when it names a supported class; otherwise the
    /// filename extension decides.
    pub fn classify(content_type: Option<&str>, filename: Option<&str>) -> DocumentKind {
        let by_mime = content_type
            .map(Self::classify_mime)
            .unwrap_or(DocumentKind::Unsupported);
        if by_mime.is_supported() {
            return by_mime;
        }

        filename
            .map(Self::classify_extension)
            .unwrap_or(DocumentKind::Unsupported)
    }

    fn classify_mime(content_type: &str) -> DocumentKind {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if essence.starts_with("text/") {
            DocumentKind::PlainText
        } else if essence == "application/pdf" {
            DocumentKind::Pdf
        } else if WORD_MIME_TYPES.contains(&essence.as_str()) {
            DocumentKind::Word
        } else {
            DocumentKind::Unsupported
        }
    }

    fn classify_extension(filename: &str) -> DocumentKind {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return DocumentKind::Unsupported;
        };
        let ext = ext.to_lowercase();

        if PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str()) {
            DocumentKind::PlainText
        } else if ext == "pdf" {
            DocumentKind::Pdf
        } else if WORD_EXTENSIONS.contains(&ext.as_str()) {
            DocumentKind::Word
        } else {
            DocumentKind::Unsupported
        }
    }

    pub fn classify_document(document: &UploadedDocument) -> DocumentKind {
        Self::classify(document.content_type.as_deref(), document.filename.as_deref())
    }

    /// Synchronous extraction. Parsing PDF and Word files is CPU-bound, so
    /// async callers should go through [`TextExtractor::extract`].
    pub fn extract_blocking(document: &UploadedDocument) -> Result<String, ExtractionError> {
        match Self::classify_document(document) {
            DocumentKind::PlainText => PlainTextExtractor::extract(&document.bytes),
            DocumentKind::Pdf => PdfExtractor::extract(&document.bytes),
            DocumentKind::Word => DocxExtractor::extract(&document.bytes),
            DocumentKind::Unsupported => {
                Err(ExtractionError::Unsupported(document.describe()))
            }
        }
    }

    pub async fn extract(&self, document: UploadedDocument) -> Result<String, ExtractionError> {
        let kind = Self::classify_document(&document);
        if !kind.is_supported() {
            return Err(ExtractionError::Unsupported(document.describe()));
        }

        let label = document.describe();
        let size = document.bytes.len();
        tracing::debug!(document = %label, %kind, size, "Extracting document text");

        let result = tokio::task::spawn_blocking(move || Self::extract_blocking(&document))
            .await
            .unwrap_or_else(|join_error| {
                // Parser panics surface here instead of taking the worker down.
                let message = format!("Extraction task failed: {join_error}");
                Err(match kind {
                    DocumentKind::Pdf => ExtractionError::PdfParse(message),
                    DocumentKind::Word => ExtractionError::DocxParse(message),
                    _ => ExtractionError::Decode(message),
                })
            });

        match &result {
            Ok(text) => {
                tracing::info!(document = %label, %kind, chars = text.len(), "Extracted document text")
            }
            Err(e) => tracing::warn!(document = %label, %kind, error = %e, "Document extraction failed"),
        }

        result
    }
}
