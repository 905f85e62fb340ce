//! Job Analyzer: maps job requirements to resume evidence and drafts
//! application form answers from that mapping.

use tracing::info;

use crate::llm_client::prompts::{fill_template, json_system_prompt};
use crate::llm_client::{call_json, CompletionProvider, LlmError};
use crate::matching::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_ROLE, RESPONSES_PROMPT_TEMPLATE, RESPONSES_ROLE,
};
use crate::models::application::{AnalysisRecord, ApplicationResponses};
use crate::models::resume::ResumeRecord;

pub fn build_analysis_prompt(
    job_description: &str,
    resume: &ResumeRecord,
) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    Ok(fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_json", &resume_json),
        ],
    ))
}

pub fn build_responses_prompt(analysis: &AnalysisRecord) -> Result<String, LlmError> {
    let analysis_json = serde_json::to_string_pretty(analysis)?;
    Ok(fill_template(
        RESPONSES_PROMPT_TEMPLATE,
        &[("analysis_json", &analysis_json)],
    ))
}

/// Produces the requirement-to-evidence mapping for one job.
pub async fn analyze_job_match(
    provider: &dyn CompletionProvider,
    job_description: &str,
    resume: &ResumeRecord,
) -> Result<AnalysisRecord, LlmError> {
    let prompt = build_analysis_prompt(job_description, resume)?;
    let analysis: AnalysisRecord =
        call_json(provider, &prompt, &json_system_prompt(ANALYSIS_ROLE)).await?;

    info!(
        "Job match analysis: {} experience, {} skill, {} education matches",
        analysis.experience_matches.len(),
        analysis.skill_matches.len(),
        analysis.education_matches.len()
    );
    Ok(analysis)
}

/// Drafts the text for each application form section.
pub async fn generate_application_responses(
    provider: &dyn CompletionProvider,
    analysis: &AnalysisRecord,
) -> Result<ApplicationResponses, LlmError> {
    let prompt = build_responses_prompt(analysis)?;
    let responses: ApplicationResponses =
        call_json(provider, &prompt, &json_system_prompt(RESPONSES_ROLE)).await?;

    if let Some((section, _)) = responses
        .sections()
        .into_iter()
        .find(|(_, text)| text.trim().is_empty())
    {
        return Err(LlmError::InvalidRecord {
            record: "application responses",
            reason: format!("section '{section}' is empty"),
        });
    }
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedProvider;
    use crate::models::application::SkillMatch;

    const RESPONSES: &str = r#"{
        "summary_of_qualifications": "Backend engineer with 3 years of Python.",
        "work_experience": "Built REST APIs at Acme.",
        "education": "BS Computer Science.",
        "skills": "Python, Django, PostgreSQL",
        "additional_information": "Open-source contributor."
    }"#;

    #[test]
    fn test_responses_prompt_embeds_analysis() {
        let analysis = AnalysisRecord {
            skill_matches: vec![SkillMatch {
                required_skill: "Django".into(),
                matching_skill: "Django".into(),
                evidence: "Acme billing service".into(),
            }],
            ..Default::default()
        };
        let prompt = build_responses_prompt(&analysis).unwrap();
        assert!(prompt.contains("Acme billing service"));
        assert!(prompt.contains("\"additional_information\""));
    }

    #[tokio::test]
    async fn test_analyze_job_match_parses_record() {
        let provider = ScriptedProvider::new([r#"```json
        {"experience_matches": [], "skill_matches": [{"required_skill": "Python", "matching_skill": "Python", "evidence": "3 years"}],
         "education_matches": [], "additional_qualifications": ["Docker"]}
        ```"#]);
        let analysis = analyze_job_match(&provider, "Python role", &ResumeRecord::default())
            .await
            .unwrap();
        assert_eq!(analysis.skill_matches[0].evidence, "3 years");
        assert_eq!(analysis.additional_qualifications, vec!["Docker"]);
    }

    #[tokio::test]
    async fn test_generate_application_responses() {
        let provider = ScriptedProvider::new([RESPONSES]);
        let responses = generate_application_responses(&provider, &AnalysisRecord::default())
            .await
            .unwrap();
        assert_eq!(responses.skills, "Python, Django, PostgreSQL");
    }

    #[tokio::test]
    async fn test_blank_section_is_rejected() {
        let provider = ScriptedProvider::new([RESPONSES.replace("Open-source contributor.", " ")]);
        let err = generate_application_responses(&provider, &AnalysisRecord::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, LlmError::InvalidRecord { reason, .. } if reason.contains("additional_information"))
        );
    }
}
