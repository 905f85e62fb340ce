// All LLM prompt templates for the matching module.
// System prompts are built with `llm_client::prompts::json_system_prompt`.

pub const TAILOR_ROLE: &str = "You are an expert resume writer who rephrases resume bullet \
    points to match a job description without changing any facts.";

/// Bullet tailoring prompt. Replace `{job_description}` and `{resume_json}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Rephrase the responsibility bullets of every work experience in the resume below so they speak to the job description.

Job Description:
{job_description}

Resume Data:
{resume_json}

Return a JSON object with this EXACT structure, one entry per work experience, in resume order:
{
  "experiences": [
    {
      "company": "Company Name",
      "title": "Job Title",
      "dates": "Start Date - End Date",
      "original_bullets": ["bullet exactly as it appears in the resume"],
      "tailored_bullets": ["rephrased bullet"]
    }
  ]
}

HARD RULES:
1. `original_bullets` must repeat the resume's responsibilities character for character
2. Produce one tailored bullet per original bullet, in the same order
3. Never change company names, job titles, or dates
4. Keep every number, percentage, dollar amount and count from the original bullet
5. Do not invent tools, results, or responsibilities that the original bullet does not state
6. Use the job description's vocabulary only where the original bullet supports it"#;

pub const ANALYSIS_ROLE: &str =
    "You are an expert job application analyzer that matches resumes to job descriptions.";

/// Job match analysis prompt. Replace `{job_description}` and `{resume_json}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and resume data to prepare tailored answers for a job application form.
Focus on matching skills, experiences, and qualifications.

Job Description:
{job_description}

Resume Data:
{resume_json}

Provide the analysis as a JSON object with this structure:
{
  "experience_matches": [
    {
      "job_requirement": "requirement from job description",
      "matching_experience": "relevant experience from resume",
      "tailored_response": "tailored response highlighting the match"
    }
  ],
  "skill_matches": [
    {
      "required_skill": "skill from job description",
      "matching_skill": "skill from resume",
      "evidence": "example of skill usage from experience"
    }
  ],
  "education_matches": [
    {
      "requirement": "education requirement from job description",
      "qualification": "matching education from resume",
      "relevance": "explanation of relevance"
    }
  ],
  "additional_qualifications": [
    "additional qualification from the resume that could be relevant"
  ]
}"#;

pub const RESPONSES_ROLE: &str =
    "You are an expert at crafting professional job application responses.";

/// Application response prompt. Replace `{analysis_json}`.
pub const RESPONSES_PROMPT_TEMPLATE: &str = r#"Based on the following analysis, write the answers for a job application form.
Keep them concise and professional, and lead with the strongest matches.

Analysis:
{analysis_json}

Return a JSON object with exactly these keys, each holding plain text:
{
  "summary_of_qualifications": "...",
  "work_experience": "...",
  "education": "...",
  "skills": "...",
  "additional_information": "..."
}"#;
