use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart};
use axum::http::Method;

use crate::error::LightyearError;
use crate::models::UploadedDocument;

/// `axum::Json` with rejections mapped onto the crate's `{error}` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(LightyearError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for LightyearError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

impl From<MultipartRejection> for LightyearError {
    fn from(rejection: MultipartRejection) -> Self {
        LightyearError::Validation(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> LightyearError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            LightyearError::Validation(format!("Invalid JSON: {}", err.body_text()))
        }
        JsonRejection::JsonSyntaxError(err) => {
            LightyearError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => LightyearError::Validation(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(_) => {
            LightyearError::Validation("Failed to read request body".to_string())
        }
        _ => LightyearError::Validation(rejection.body_text()),
    }
}

/// Fallback for routes that only accept POST.
pub async fn method_not_allowed(method: Method) -> LightyearError {
    LightyearError::MethodNotAllowed(method.to_string())
}

/// Fields of a chat upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedDocument>,
    pub message: Option<String>,
}

fn is_file_field(field: &Field<'_>) -> bool {
    matches!(field.name(), Some("file") | Some("document")) || field.file_name().is_some()
}

/// Drains a multipart body into at most one file and an optional `message`
/// text field. Unknown text fields are ignored.
pub async fn read_upload_form(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadForm, LightyearError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LightyearError::Validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        if is_file_field(&field) {
            if form.file.is_some() {
                return Err(LightyearError::Validation(
                    "Only one file may be uploaded per request".to_string(),
                ));
            }

            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| LightyearError::Validation(format!("Failed to read file: {}", e.body_text())))?;

            if bytes.len() > max_file_size {
                return Err(LightyearError::Validation(format!(
                    "File too large: {} bytes (max {} bytes)",
                    bytes.len(),
                    max_file_size
                )));
            }

            form.file = Some(UploadedDocument::new(filename, content_type, bytes.to_vec()));
            continue;
        }

        if field.name() == Some("message") {
            let text = field
                .text()
                .await
                .map_err(|e| LightyearError::Validation(format!("Invalid message field: {}", e.body_text())))?;
            form.message = Some(text);
        }
    }

    Ok(form)
}
