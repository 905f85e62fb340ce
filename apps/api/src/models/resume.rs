use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Structured resume produced by the AI parse step.
///
/// Field types are enforced on deserialization. Missing sections default to
/// empty so a resume without, say, certifications still validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub personal_information: PersonalInformation,
    #[serde(deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInformation {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Free text, e.g. "Jan 2021 - Present". Never reinterpreted.
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

impl PersonalInformation {
    /// Present fields as (key, value) pairs, in declaration order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("location", &self.location),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

impl ResumeRecord {
    /// Rejects a record in which the model recognized nothing at all.
    pub fn validate(&self) -> Result<(), String> {
        let is_empty = self.personal_information.fields().is_empty()
            && self.work_experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty();
        if is_empty {
            return Err("no recognizable resume content in the parsed record".to_string());
        }
        Ok(())
    }

    pub fn bullet_count(&self) -> usize {
        self.work_experience
            .iter()
            .map(|e| e.responsibilities.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_deserializes() {
        let value = json!({
            "personal_information": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": null,
                "location": "Austin, TX"
            },
            "work_experience": [{
                "company": "Acme",
                "title": "Backend Engineer",
                "dates": "2021 - Present",
                "responsibilities": ["Built billing APIs", "Cut p99 latency by 40%"]
            }],
            "education": [{"institution": "UT Austin", "degree": "BS CS", "dates": "2017 - 2021"}],
            "skills": ["Rust", "Python"],
            "projects": [{"name": "Ledger", "description": "Double-entry ledger"}],
            "certifications": ["AWS SAA"]
        });
        let record: ResumeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.personal_information.name.as_deref(), Some("Jane Doe"));
        assert!(record.personal_information.phone.is_none());
        assert_eq!(record.bullet_count(), 2);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let record: ResumeRecord =
            serde_json::from_value(json!({"skills": ["Go"], "extra_key": 1})).unwrap();
        assert!(record.work_experience.is_empty());
        assert!(record.certifications.is_empty());
        assert_eq!(record.skills, vec!["Go"]);
    }

    #[test]
    fn test_null_values_read_as_empty() {
        let record: ResumeRecord = serde_json::from_value(json!({
            "personal_information": {"name": "Jane Doe", "email": null},
            "work_experience": [{
                "company": "Acme",
                "title": null,
                "dates": null,
                "responsibilities": ["Built billing APIs"]
            }],
            "education": null,
            "skills": ["Rust"],
            "projects": null,
            "certifications": null
        }))
        .unwrap();
        assert_eq!(record.work_experience[0].dates, "");
        assert_eq!(record.work_experience[0].title, "");
        assert!(record.education.is_empty());
        assert!(record.projects.is_empty());
        assert!(record.validate().is_ok());

        let bare: ResumeRecord =
            serde_json::from_value(json!({"personal_information": null, "skills": ["Go"]})).unwrap();
        assert!(bare.personal_information.fields().is_empty());
    }

    #[test]
    fn test_mistyped_section_is_rejected() {
        let result: Result<ResumeRecord, _> =
            serde_json::from_value(json!({"skills": "Rust, Python"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_record_fails_validation() {
        assert!(ResumeRecord::default().validate().is_err());
    }

    #[test]
    fn test_personal_fields_skip_missing_values() {
        let info = PersonalInformation {
            name: Some("Jane".into()),
            email: None,
            phone: Some("555-0100".into()),
            location: None,
        };
        assert_eq!(info.fields(), vec![("name", "Jane"), ("phone", "555-0100")]);
    }
}
