//! Document-to-text conversion for uploaded resumes.

use bytes::Bytes;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::errors::AppError;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Content type wins; the file extension is the fallback.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        match content_type.map(|c| c.to_ascii_lowercase()) {
            Some(c) if c.starts_with("application/pdf") => return Some(DocumentKind::Pdf),
            Some(c) if c.starts_with("text/plain") => return Some(DocumentKind::PlainText),
            _ => {}
        }
        let extension = file_name?.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "text" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Trims every line and collapses runs of blank lines.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// The PDF parser panics on some malformed files; that is a bad upload, not a server fault.
fn extraction_failed(err: JoinError) -> AppError {
    if err.is_panic() {
        warn!("PDF extraction panicked on malformed input");
        AppError::Validation("file could not be read as PDF".to_string())
    } else {
        AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {err}"))
    }
}

pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, AppError> {
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "file must be at most 5 MiB".to_string(),
        ));
    }

    let raw = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(&data).into_owned(),
        DocumentKind::Pdf => {
            let size = data.len();
            let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await
                .map_err(extraction_failed)?
                .map_err(|e| AppError::Validation(format!("file could not be read as PDF: {e}")))?;
            info!("Extracted {} chars from {size}-byte PDF", text.len());
            text
        }
    };

    let text = tidy(&raw);
    if text.is_empty() {
        return Err(AppError::Validation(
            "file contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
