use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Turns an uploaded resume file into plain text. PDFs are detected by
/// content type, extension, or magic bytes; anything else must be UTF-8.
pub fn resume_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: &Bytes,
) -> Result<String, AppError> {
    let text = if is_pdf(file_name, content_type, data) {
        pdf_extract::extract_text_from_mem(data).map_err(|e| {
            warn!("PDF text extraction failed: {e}");
            AppError::UnprocessableEntity("could not read text from the PDF".to_string())
        })?
    } else {
        String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity("resume must be a PDF or UTF-8 text file".to_string())
        })?
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "resume contains no text".to_string(),
        ));
    }
    Ok(text)
}

fn is_pdf(file_name: Option<&str>, content_type: Option<&str>, data: &[u8]) -> bool {
    content_type == Some("application/pdf")
        || file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        || data.starts_with(PDF_MAGIC)
}
