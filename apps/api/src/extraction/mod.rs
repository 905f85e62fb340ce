//! Text extraction: turns an uploaded resume document into plain text.
//!
//! No structural interpretation happens here; sections, dates and bullets are
//! left for the AI parse step.

use std::path::Path;

use thiserror::Error;
use tracing::info;

mod docx;
mod pdf;

#[cfg(test)]
pub(crate) use docx::tests::docx_with_body;
#[cfg(test)]
pub(crate) use pdf::tests::pdf_with_text;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format '{0}'. Please use PDF or DOC/DOCX.")]
    UnsupportedFormat(String),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Document formats the extractor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// `.doc` and `.docx`; both are read as an OOXML package.
    WordProcessing,
}

impl DocumentKind {
    /// Picks the reader from the file extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "doc" | "docx" => Ok(DocumentKind::WordProcessing),
            _ => Err(ExtractError::UnsupportedFormat(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )),
        }
    }

    /// Extension used when the document is written back to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::WordProcessing => "docx",
        }
    }
}

/// Extracts the visible text of the document at `path`.
pub async fn extract_text(path: impl AsRef<Path>) -> Result<String, ExtractError> {
    let path = path.as_ref();
    let kind = DocumentKind::from_path(path)?;
    let bytes = tokio::fs::read(path).await?;

    let text = extract_text_from_bytes(kind, bytes).await?;
    info!(
        "Extracted {} characters from {} ({:?})",
        text.chars().count(),
        path.display(),
        kind
    );
    Ok(text)
}

/// Runs the format reader on the blocking pool. A panic inside a parsing
/// library surfaces as an extraction error for that format.
pub async fn extract_text_from_bytes(
    kind: DocumentKind,
    bytes: Vec<u8>,
) -> Result<String, ExtractError> {
    let joined = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(&bytes),
        DocumentKind::WordProcessing => docx::extract_docx_text(&bytes),
    })
    .await;

    match joined {
        Ok(result) => result,
        Err(e) => {
            let reason = format!("document parser aborted: {e}");
            Err(match kind {
                DocumentKind::Pdf => ExtractError::Pdf(reason),
                DocumentKind::WordProcessing => ExtractError::Docx(reason),
            })
        }
    }
}
