use serde::{Deserialize, Serialize};

use super::null_as_default;

/// AI-produced mapping of job requirements to resume evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub experience_matches: Vec<ExperienceMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub skill_matches: Vec<SkillMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub education_matches: Vec<EducationMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub additional_qualifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub job_requirement: String,
    #[serde(deserialize_with = "null_as_default")]
    pub matching_experience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tailored_response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub required_skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub matching_skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub requirement: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qualification: String,
    #[serde(deserialize_with = "null_as_default")]
    pub relevance: String,
}

/// Generated text for each application form section.
/// Every section is required; a response missing one is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationResponses {
    pub summary_of_qualifications: String,
    pub work_experience: String,
    pub education: String,
    pub skills: String,
    pub additional_information: String,
}

impl ApplicationResponses {
    /// (form-section name, content) pairs in form order.
    pub fn sections(&self) -> [(&'static str, &str); 5] {
        [
            ("summary_of_qualifications", &self.summary_of_qualifications),
            ("work_experience", &self.work_experience),
            ("education", &self.education),
            ("skills", &self.skills),
            ("additional_information", &self.additional_information),
        ]
    }
}

/// Original and rephrased bullets for every work experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredBullets {
    #[serde(deserialize_with = "null_as_default")]
    pub experiences: Vec<TailoredExperience>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredExperience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
    /// Byte-identical copy of the input resume's responsibilities.
    #[serde(deserialize_with = "null_as_default")]
    pub original_bullets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tailored_bullets: Vec<String>,
}
