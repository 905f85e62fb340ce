//! Axum route handlers for the resume endpoints.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::preview;
use crate::matching::pipeline::{prepare_application, tailor_for_job, ApplicationPackage};
use crate::models::application::TailoredBullets;
use crate::models::resume::ResumeRecord;
use crate::resume::parser::parse_resume_text;
use crate::routes::upload::{extract_upload, UploadForm};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub tailored_bullets: TailoredBullets,
}

/// POST /parse-resume
///
/// Multipart `resume` file → parsed resume record.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeRecord>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_resume()?;
    info!("Received resume file: {}", upload.file_name);

    let text = extract_upload(&upload).await?;
    let provider = state.provider(form.ai_provider.as_deref());
    let record = parse_resume_text(provider.as_ref(), &text).await?;

    Ok(Json(record))
}

/// POST /apply
///
/// Multipart `resume` + `job_description` (+ optional `ai_provider`, `job_url`)
/// → tailored bullet points. `job_url` is only logged.
pub async fn handle_apply(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApplyResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_resume()?;
    let job_description = form.job_description()?;
    info!("Received resume file: {}", upload.file_name);
    if let Some(url) = form.job_url.as_deref().filter(|u| !u.trim().is_empty()) {
        info!("Job URL: {url}");
    }

    let text = extract_upload(&upload).await?;
    let provider = state.provider(form.ai_provider.as_deref());
    let outcome = tailor_for_job(provider.as_ref(), &text, job_description).await?;

    info!(
        "Tailored bullets: {}",
        preview(
            &serde_json::to_string(&outcome.tailored_bullets).unwrap_or_default(),
            500
        )
    );
    Ok(Json(ApplyResponse {
        tailored_bullets: outcome.tailored_bullets,
    }))
}

/// POST /application-responses
///
/// Same fields as `/apply` → parsed resume, job match analysis and the
/// generated application form answers.
pub async fn handle_application_responses(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApplicationPackage>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_resume()?;
    let job_description = form.job_description()?;
    info!("Received resume file: {}", upload.file_name);

    let text = extract_upload(&upload).await?;
    let provider = state.provider(form.ai_provider.as_deref());
    let package = prepare_application(provider.as_ref(), &text, job_description).await?;

    Ok(Json(package))
}
