/// A file received from a client, held only until its text is extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Short label used in logs and error messages.
    pub fn describe(&self) -> String {
        match (&self.filename, &self.content_type) {
            (Some(name), Some(ct)) => format!("{name} ({ct})"),
            (Some(name), None) => name.clone(),
            (None, Some(ct)) => ct.clone(),
            (None, None) => "unnamed file".to_string(),
        }
    }
}

/// Extraction route for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Word,
    Unsupported,
}

impl DocumentKind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "plain_text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}
