//! Orchestration: fixed sequences of completion calls whose outputs feed each other.
//!
//! Tailoring:   parse resume → tailor bullets
//! Application: parse resume → analyze job match → generate responses
//!
//! Calls run strictly in order; the first failure aborts the sequence.

use serde::Serialize;
use tracing::info;

use crate::llm_client::{preview, CompletionProvider, LlmError};
use crate::matching::analyzer::{analyze_job_match, generate_application_responses};
use crate::matching::tailoring::tailor_bullet_points;
use crate::models::application::{AnalysisRecord, ApplicationResponses, TailoredBullets};
use crate::models::resume::ResumeRecord;
use crate::resume::parser::parse_resume_text;

#[derive(Debug, Clone, Serialize)]
pub struct TailoringOutcome {
    pub resume: ResumeRecord,
    pub tailored_bullets: TailoredBullets,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPackage {
    pub resume: ResumeRecord,
    pub analysis: AnalysisRecord,
    pub responses: ApplicationResponses,
}

pub async fn tailor_for_job(
    provider: &dyn CompletionProvider,
    resume_text: &str,
    job_description: &str,
) -> Result<TailoringOutcome, LlmError> {
    info!("Job description: {}", preview(job_description, 100));

    info!("Step 1/2: parsing resume");
    let resume = parse_resume_text(provider, resume_text).await?;

    info!("Step 2/2: tailoring bullet points");
    let tailored_bullets = tailor_bullet_points(provider, job_description, &resume).await?;

    Ok(TailoringOutcome {
        resume,
        tailored_bullets,
    })
}

pub async fn prepare_application(
    provider: &dyn CompletionProvider,
    resume_text: &str,
    job_description: &str,
) -> Result<ApplicationPackage, LlmError> {
    info!("Job description: {}", preview(job_description, 100));

    info!("Step 1/3: parsing resume");
    let resume = parse_resume_text(provider, resume_text).await?;

    info!("Step 2/3: analyzing job match");
    let analysis = analyze_job_match(provider, job_description, &resume).await?;

    info!("Step 3/3: generating application responses");
    let responses = generate_application_responses(provider, &analysis).await?;

    Ok(ApplicationPackage {
        resume,
        analysis,
        responses,
    })
}
