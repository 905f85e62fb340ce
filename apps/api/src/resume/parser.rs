//! Resume Parser: turns extracted resume text into a validated `ResumeRecord`.

use std::path::Path;

use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::llm_client::prompts::{fill_template, json_system_prompt};
use crate::llm_client::{call_json, CompletionProvider, LlmError};
use crate::models::resume::ResumeRecord;
use crate::resume::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_ROLE};

/// Builds the parse prompt for one resume.
pub fn build_parse_prompt(resume_text: &str) -> String {
    fill_template(RESUME_PARSE_PROMPT_TEMPLATE, &[("resume_text", resume_text)])
}

/// Sends resume text to the completion endpoint and validates the record it returns.
pub async fn parse_resume_text(
    provider: &dyn CompletionProvider,
    resume_text: &str,
) -> Result<ResumeRecord, LlmError> {
    let prompt = build_parse_prompt(resume_text);
    let record: ResumeRecord =
        call_json(provider, &prompt, &json_system_prompt(RESUME_PARSE_ROLE)).await?;

    record.validate().map_err(|reason| LlmError::InvalidRecord {
        record: "resume record",
        reason,
    })?;

    info!(
        "Parsed resume via {}: {} experiences, {} bullets, {} skills",
        provider.name(),
        record.work_experience.len(),
        record.bullet_count(),
        record.skills.len()
    );
    Ok(record)
}

/// Extracts text from a PDF/DOCX file, then parses it.
pub async fn parse_resume_file(
    provider: &dyn CompletionProvider,
    path: &Path,
) -> Result<ResumeRecord, AppError> {
    let text = extract_text(path).await?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "{} contains no extractable text",
            path.display()
        )));
    }
    Ok(parse_resume_text(provider, &text).await?)
}
