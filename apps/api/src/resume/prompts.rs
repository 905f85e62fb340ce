// Resume parsing prompt templates.

/// Role description for the resume parse call. See `llm_client::prompts::json_system_prompt`.
pub const RESUME_PARSE_ROLE: &str =
    "You are a resume parser that extracts structured information from resumes.";

/// Resume parsing prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and extract its information into this JSON format:
{
  "personal_information": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "phone number",
    "location": "city, state"
  },
  "work_experience": [
    {
      "company": "Company Name",
      "title": "Job Title",
      "dates": "Start Date - End Date",
      "responsibilities": ["Responsibility 1", "Responsibility 2"]
    }
  ],
  "education": [
    {
      "institution": "School Name",
      "degree": "Degree Name",
      "dates": "Start Date - End Date"
    }
  ],
  "skills": ["Skill 1", "Skill 2"],
  "projects": [
    {
      "name": "Project Name",
      "description": "Project Description"
    }
  ],
  "certifications": ["Certification 1", "Certification 2"]
}

RULES:
1. Copy each responsibility bullet exactly as written in the resume; do not rephrase it
2. Use null for personal information fields that are not present
3. Use an empty list for sections the resume does not contain
4. Every value must have the type shown above

Resume text:
{resume_text}

Return ONLY the JSON object, with no additional text or explanation."#;
