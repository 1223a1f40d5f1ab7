//! PDF resume ingestion: base64 upload in, plain text out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::errors::AppError;

/// Anything shorter than this is a scan, an empty page, or garbage.
const MIN_TEXT_LEN: usize = 50;

/// Decodes a base64-encoded PDF and extracts its text content.
pub fn extract_pdf_text(base64_file: &str) -> Result<String, AppError> {
    let bytes = BASE64
        .decode(base64_file.trim())
        .map_err(|e| AppError::Validation(format!("Invalid base64 payload: {e}")))?;

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| AppError::Validation(format!("Failed to extract text from PDF: {e}")))?;

    if text.trim().len() < MIN_TEXT_LEN {
        return Err(AppError::Validation(
            "PDF contains too little text to be a resume".to_string(),
        ));
    }

    Ok(text)
}
