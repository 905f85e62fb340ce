//! Multipart upload handling shared by the resume endpoints.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind};

/// The uploaded resume document.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub kind: DocumentKind,
    pub data: Bytes,
}

/// Every form field the resume endpoints understand.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<ResumeUpload>,
    pub job_description: Option<String>,
    pub ai_provider: Option<String>,
    pub job_url: Option<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Malformed multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "resume" => {
                    let file_name = field
                        .file_name()
                        .map(str::to_string)
                        .ok_or_else(|| {
                            AppError::Validation("'resume' must be a file upload".to_string())
                        })?;
                    let kind = DocumentKind::from_path(&file_name)?;
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read resume upload", e))?;
                    form.resume = Some(ResumeUpload {
                        file_name,
                        kind,
                        data,
                    });
                }
                "job_description" | "ai_provider" | "job_url" => {
                    let value = field.text().await.map_err(|e| {
                        multipart_error(&format!("Failed to read field '{name}'"), e)
                    })?;
                    match name.as_str() {
                        "job_description" => form.job_description = Some(value),
                        "ai_provider" => form.ai_provider = Some(value),
                        _ => form.job_url = Some(value),
                    }
                }
                other => debug!("Ignoring unknown multipart field '{other}'"),
            }
        }

        Ok(form)
    }

    pub fn take_resume(&mut self) -> Result<ResumeUpload, AppError> {
        self.resume
            .take()
            .ok_or_else(|| AppError::Validation("Missing 'resume' file".to_string()))
    }

    pub fn job_description(&self) -> Result<&str, AppError> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
            .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))
    }
}

/// Body-limit overruns are 413; every other multipart failure is a bad request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// Writes the upload to a uniquely named temp file, extracts its text, and
/// removes the file again when the handle drops.
pub async fn extract_upload(upload: &ResumeUpload) -> Result<String, AppError> {
    let temp = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&format!(".{}", upload.kind.extension()))
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp file: {e}")))?;

    tokio::fs::write(temp.path(), &upload.data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save upload: {e}")))?;
    info!("Saved resume to: {}", temp.path().display());

    let text = extract_text(temp.path()).await?;
    drop(temp);
    info!("Temporary file removed");

    if text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "{} contains no extractable text",
            upload.file_name
        )));
    }
    Ok(text)
}
