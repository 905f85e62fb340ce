//! Form Filler: drives a browser through a third-party job application form.
//!
//! Flow: open URL → log in → wait for the form → personal info → work
//! experience entries → education entries → skills → additional info →
//! submit → wait for confirmation.
//!
//! Login and the form container are hard requirements. Past that point a
//! field that never appears is logged and recorded in the `FillReport` as
//! skipped; the run carries on.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod session;
pub mod webdriver;

use self::session::{BrowserSession, Selector};
use crate::models::application::ApplicationResponses;
use crate::models::resume::ResumeRecord;

/// Upper bound for every individual wait.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

const LOGIN_USERNAME_ID: &str = "username";
const LOGIN_PASSWORD_ID: &str = "password";
const LOGIN_SUBMIT_ID: &str = "submit";
const FORM_CONTAINER_CLASS: &str = "application-form";
const SKILLS_FIELD_NAME: &str = "skills";
const SUBMIT_CLASS: &str = "submit-application";
const CONFIRMATION_CLASS: &str = "application-submitted";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Timed out after {waited:?} waiting for {selector}")]
    Timeout { selector: String, waited: Duration },

    /// The element matched by `selector` left the DOM mid-command.
    #[error("Element {selector} is no longer attached to the page")]
    Stale { selector: String },

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("Failed to start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),
}

impl FormError {
    /// Selector of an element that never became usable. Past the login and
    /// form container, such an element is skipped rather than fatal.
    fn unusable_selector(&self) -> Option<&str> {
        match self {
            FormError::Timeout { selector, .. } | FormError::Stale { selector } => Some(selector),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One form input, addressed by its `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Everything the filler types into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationData {
    pub personal_info: Vec<FormField>,
    pub work_experience: Vec<Vec<FormField>>,
    pub education: Vec<Vec<FormField>>,
    pub skills: Vec<String>,
    pub additional_info: Vec<FormField>,
}

impl ApplicationData {
    /// Maps a parsed resume, plus optional generated answers, onto form fields.
    /// Empty values are left out.
    pub fn from_resume(resume: &ResumeRecord, responses: Option<&ApplicationResponses>) -> Self {
        let personal_info = resume
            .personal_information
            .fields()
            .into_iter()
            .map(|(name, value)| FormField::new(name, value))
            .collect();

        let work_experience = resume
            .work_experience
            .iter()
            .map(|e| {
                non_empty(vec![
                    FormField::new("company", e.company.as_str()),
                    FormField::new("title", e.title.as_str()),
                    FormField::new("dates", e.dates.as_str()),
                    FormField::new("responsibilities", e.responsibilities.join("\n")),
                ])
            })
            .collect();

        let education = resume
            .education
            .iter()
            .map(|e| {
                non_empty(vec![
                    FormField::new("institution", e.institution.as_str()),
                    FormField::new("degree", e.degree.as_str()),
                    FormField::new("dates", e.dates.as_str()),
                ])
            })
            .collect();

        let additional_info = responses
            .map(|r| {
                non_empty(
                    r.sections()
                        .into_iter()
                        .map(|(name, text)| FormField::new(name, text))
                        .collect(),
                )
            })
            .unwrap_or_default();

        Self {
            personal_info,
            work_experience,
            education,
            skills: resume.skills.clone(),
            additional_info,
        }
    }
}

fn non_empty(fields: Vec<FormField>) -> Vec<FormField> {
    fields
        .into_iter()
        .filter(|f| !f.value.trim().is_empty())
        .collect()
}

/// What actually made it into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub filled: Vec<String>,
    pub skipped: Vec<String>,
    pub submitted: bool,
}

impl FillReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.submitted
    }
}

/// Repeatable list sections of the form.
#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Experience,
    Education,
}

impl EntryKind {
    fn section(self) -> &'static str {
        match self {
            EntryKind::Experience => "work_experience",
            EntryKind::Education => "education",
        }
    }

    fn add_button(self) -> Selector {
        match self {
            EntryKind::Experience => Selector::class("add-experience"),
            EntryKind::Education => Selector::class("add-education"),
        }
    }

    fn save_button(self) -> Selector {
        match self {
            EntryKind::Experience => Selector::class("save-experience"),
            EntryKind::Education => Selector::class("save-education"),
        }
    }

    /// Field used to name an entry in logs.
    fn label_field(self) -> &'static str {
        match self {
            EntryKind::Experience => "company",
            EntryKind::Education => "institution",
        }
    }
}

/// Owns one browser session for the duration of one submission.
pub struct FormFiller<S: BrowserSession> {
    session: S,
    wait: Duration,
}

impl<S: BrowserSession> FormFiller<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            wait: DEFAULT_WAIT,
        }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Logs in, fills and submits. The session is closed on every path.
    pub async fn run(
        &mut self,
        url: &str,
        credentials: &Credentials,
        data: &ApplicationData,
    ) -> Result<FillReport, FormError> {
        let result = self.login_fill_submit(url, credentials, data).await;
        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session: {e}");
        }
        result
    }

    async fn login_fill_submit(
        &mut self,
        url: &str,
        credentials: &Credentials,
        data: &ApplicationData,
    ) -> Result<FillReport, FormError> {
        self.login(url, credentials).await?;
        let mut report = self.fill_application_form(data).await?;
        report.submitted = self.submit_application().await?;
        Ok(report)
    }

    pub async fn login(&mut self, url: &str, credentials: &Credentials) -> Result<(), FormError> {
        info!("Opening {url}");
        self.session.goto(url).await?;

        let username = Selector::id(LOGIN_USERNAME_ID);
        self.session.wait_present(&username, self.wait).await?;
        self.session.fill(&username, &credentials.username).await?;
        self.session
            .fill(&Selector::id(LOGIN_PASSWORD_ID), &credentials.password)
            .await?;
        self.session.click(&Selector::id(LOGIN_SUBMIT_ID)).await?;
        info!("Submitted login form as {}", credentials.username);
        Ok(())
    }

    pub async fn fill_application_form(
        &mut self,
        data: &ApplicationData,
    ) -> Result<FillReport, FormError> {
        self.session
            .wait_present(&Selector::class(FORM_CONTAINER_CLASS), self.wait)
            .await?;

        let mut report = FillReport::default();

        for field in &data.personal_info {
            self.fill_field("personal_info", field, &mut report).await?;
        }
        self.fill_entries(EntryKind::Experience, &data.work_experience, &mut report)
            .await?;
        self.fill_entries(EntryKind::Education, &data.education, &mut report)
            .await?;
        if !data.skills.is_empty() {
            let skills = FormField::new(SKILLS_FIELD_NAME, data.skills.join(", "));
            self.fill_field("skills", &skills, &mut report).await?;
        }
        for field in &data.additional_info {
            self.fill_field("additional_info", field, &mut report).await?;
        }

        info!(
            "Form filled: {} items filled, {} skipped",
            report.filled.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Returns whether the confirmation element appeared.
    pub async fn submit_application(&mut self) -> Result<bool, FormError> {
        match self.click_submit_and_confirm().await {
            Ok(()) => {
                info!("Application submitted successfully");
                Ok(true)
            }
            Err(e) if e.unusable_selector().is_some() => {
                warn!("Could not submit application: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn click_submit_and_confirm(&mut self) -> Result<(), FormError> {
        let submit = Selector::class(SUBMIT_CLASS);
        self.session.wait_clickable(&submit, self.wait).await?;
        self.session.click(&submit).await?;
        self.session
            .wait_present(&Selector::class(CONFIRMATION_CLASS), self.wait)
            .await
    }

    async fn fill_field(
        &mut self,
        section: &str,
        field: &FormField,
        report: &mut FillReport,
    ) -> Result<(), FormError> {
        let item = format!("{section}.{}", field.name);
        match self.type_into(&Selector::name(&field.name), &field.value).await {
            Ok(()) => report.filled.push(item),
            Err(e) if e.unusable_selector().is_some() => {
                warn!("Could not find field: {}", field.name);
                report.skipped.push(item);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn fill_entries(
        &mut self,
        kind: EntryKind,
        entries: &[Vec<FormField>],
        report: &mut FillReport,
    ) -> Result<(), FormError> {
        for (index, entry) in entries.iter().enumerate() {
            let item = format!("{}[{index}]", kind.section());
            match self.add_entry(kind, entry).await {
                Ok(()) => report.filled.push(item),
                Err(e) if e.unusable_selector().is_some() => {
                    let label = entry
                        .iter()
                        .find(|f| f.name == kind.label_field())
                        .map(|f| f.value.as_str())
                        .unwrap_or("Unknown");
                    warn!("Could not add {} entry '{label}': {e}", kind.section());
                    report.skipped.push(item);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn add_entry(&mut self, kind: EntryKind, entry: &[FormField]) -> Result<(), FormError> {
        let add = kind.add_button();
        self.session.wait_clickable(&add, self.wait).await?;
        self.session.click(&add).await?;

        for field in entry {
            self.type_into(&Selector::name(&field.name), &field.value)
                .await?;
        }

        let save = kind.save_button();
        self.session.wait_clickable(&save, self.wait).await?;
        self.session.click(&save).await?;
        // The entry is stored once its editor closes.
        match self.session.wait_gone(&save, self.wait).await {
            Err(FormError::Stale { .. }) => Ok(()),
            other => other,
        }
    }

    async fn type_into(&mut self, selector: &Selector, value: &str) -> Result<(), FormError> {
        self.session.wait_present(selector, self.wait).await?;
        self.session.fill(selector, value).await
    }

    #[cfg(test)]
    fn into_session(self) -> S {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, PersonalInformation, WorkExperience};
    use async_trait::async_trait;
    use std::collections::HashSet;

    /// Records every command. Elements listed in `present` exist; everything
    /// else times out. Elements in `stuck` never disappear. Elements in
    /// `detached` leave the DOM as soon as they are touched.
    #[derive(Default)]
    struct ScriptedSession {
        present: HashSet<String>,
        stuck: HashSet<String>,
        detached: HashSet<String>,
        log: Vec<String>,
        closed: bool,
    }

    impl ScriptedSession {
        fn with(selectors: &[&str]) -> Self {
            Self {
                present: selectors.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn check(&self, selector: &Selector, timeout: Duration) -> Result<(), FormError> {
            if self.present.contains(&selector.css()) {
                Ok(())
            } else {
                Err(FormError::Timeout {
                    selector: selector.css(),
                    waited: timeout,
                })
            }
        }
    }

    #[async_trait]
    impl BrowserSession for ScriptedSession {
        async fn goto(&mut self, url: &str) -> Result<(), FormError> {
            self.log.push(format!("goto {url}"));
            Ok(())
        }

        async fn wait_present(
            &mut self,
            selector: &Selector,
            timeout: Duration,
        ) -> Result<(), FormError> {
            self.check(selector, timeout)
        }

        async fn wait_clickable(
            &mut self,
            selector: &Selector,
            timeout: Duration,
        ) -> Result<(), FormError> {
            self.check(selector, timeout)
        }

        async fn wait_gone(
            &mut self,
            selector: &Selector,
            timeout: Duration,
        ) -> Result<(), FormError> {
            if self.stuck.contains(&selector.css()) {
                return Err(FormError::Timeout {
                    selector: selector.css(),
                    waited: timeout,
                });
            }
            if self.detached.contains(&selector.css()) {
                return Err(FormError::Stale {
                    selector: selector.css(),
                });
            }
            self.log.push(format!("gone {selector}"));
            Ok(())
        }

        async fn fill(&mut self, selector: &Selector, value: &str) -> Result<(), FormError> {
            if self.detached.contains(&selector.css()) {
                return Err(FormError::Stale {
                    selector: selector.css(),
                });
            }
            self.log.push(format!("fill {selector}={value}"));
            Ok(())
        }

        async fn click(&mut self, selector: &Selector) -> Result<(), FormError> {
            self.log.push(format!("click {selector}"));
            Ok(())
        }

        async fn close(&mut self) -> Result<(), FormError> {
            self.closed = true;
            Ok(())
        }
    }

    const LOGIN: &[&str] = &["#username", "#password", "#submit"];

    fn credentials() -> Credentials {
        Credentials {
            username: "jane".into(),
            password: "hunter2".into(),
        }
    }

    fn resume() -> ResumeRecord {
        ResumeRecord {
            personal_information: PersonalInformation {
                name: Some("Jane Doe".into()),
                email: Some("jane@example.com".into()),
                ..Default::default()
            },
            work_experience: vec![WorkExperience {
                company: "Acme".into(),
                title: "Engineer".into(),
                dates: "2021 - 2023".into(),
                responsibilities: vec!["Built APIs".into(), "Wrote tests".into()],
            }],
            education: vec![Education {
                institution: "State U".into(),
                degree: "BS CS".into(),
                dates: String::new(),
            }],
            skills: vec!["Rust".into(), "Python".into()],
            ..Default::default()
        }
    }

    fn full_form() -> Vec<&'static str> {
        let mut selectors = LOGIN.to_vec();
        selectors.extend([
            ".application-form",
            "[name=\"name\"]",
            "[name=\"email\"]",
            ".add-experience",
            ".save-experience",
            "[name=\"company\"]",
            "[name=\"title\"]",
            "[name=\"dates\"]",
            "[name=\"responsibilities\"]",
            ".add-education",
            ".save-education",
            "[name=\"institution\"]",
            "[name=\"degree\"]",
            "[name=\"skills\"]",
            ".submit-application",
            ".application-submitted",
        ]);
        selectors
    }

    #[test]
    fn test_application_data_from_resume() {
        let data = ApplicationData::from_resume(&resume(), None);
        assert_eq!(
            data.personal_info,
            vec![
                FormField::new("name", "Jane Doe"),
                FormField::new("email", "jane@example.com")
            ]
        );
        assert_eq!(
            data.work_experience[0][3],
            FormField::new("responsibilities", "Built APIs\nWrote tests")
        );
        // Empty dates are not typed into the form
        assert_eq!(data.education[0].len(), 2);
        assert!(data.additional_info.is_empty());
    }

    #[test]
    fn test_application_data_includes_generated_sections() {
        let responses = ApplicationResponses {
            summary_of_qualifications: "Summary".into(),
            work_experience: "Experience".into(),
            education: "Education".into(),
            skills: "Skills".into(),
            additional_information: "Extra".into(),
        };
        let data = ApplicationData::from_resume(&resume(), Some(&responses));
        assert_eq!(data.additional_info.len(), 5);
        assert_eq!(data.additional_info[4], FormField::new("additional_information", "Extra"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_full_run_fills_everything_in_order() {
        let data = ApplicationData::from_resume(&resume(), None);
        let mut filler = FormFiller::new(ScriptedSession::with(&full_form()));

        let report = filler
            .run("https://jobs.example.com/apply", &credentials(), &data)
            .await
            .unwrap();

        assert!(report.is_complete(), "{report:?}");
        assert!(report.filled.contains(&"work_experience[0]".to_string()));
        assert!(report.filled.contains(&"skills.skills".to_string()));

        let session = filler.into_session();
        assert!(session.closed);
        assert_eq!(session.log[0], "goto https://jobs.example.com/apply");
        assert_eq!(session.log[1], "fill #username=jane");
        assert!(session.log.contains(&"fill [name=\"skills\"]=Rust, Python".to_string()));

        let add = session.log.iter().position(|l| l == "click .add-experience").unwrap();
        let company = session.log.iter().position(|l| l == "fill [name=\"company\"]=Acme").unwrap();
        let save = session.log.iter().position(|l| l == "click .save-experience").unwrap();
        let saved = session.log.iter().position(|l| l == "gone .save-experience").unwrap();
        assert!(add < company && company < save && save < saved);
        assert_eq!(session.log.last().unwrap(), "click .submit-application");
    }

    #[tokio::test]
    async fn test_missing_field_is_skipped_and_run_continues() {
        let selectors: Vec<_> = full_form()
            .into_iter()
            .filter(|s| *s != "[name=\"email\"]")
            .collect();
        let data = ApplicationData::from_resume(&resume(), None);
        let mut filler = FormFiller::new(ScriptedSession::with(&selectors));

        let report = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap();

        assert_eq!(report.skipped, vec!["personal_info.email"]);
        assert!(report.submitted);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_entry_that_never_saves_is_skipped() {
        let data = ApplicationData::from_resume(&resume(), None);
        let mut session = ScriptedSession::with(&full_form());
        session.stuck.insert(".save-education".to_string());
        let mut filler = FormFiller::new(session);

        let report = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap();

        assert_eq!(report.skipped, vec!["education[0]"]);
        assert!(report.filled.contains(&"work_experience[0]".to_string()));
        assert!(report.submitted);
    }

    #[tokio::test]
    async fn test_save_button_detached_after_click_counts_as_saved() {
        let data = ApplicationData::from_resume(&resume(), None);
        let mut session = ScriptedSession::with(&full_form());
        session.detached.insert(".save-experience".to_string());
        let mut filler = FormFiller::new(session);

        let report = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap();

        assert!(report.is_complete(), "{report:?}");
        assert!(report.filled.contains(&"work_experience[0]".to_string()));
        let session = filler.into_session();
        assert_eq!(session.log.last().unwrap(), "click .submit-application");
    }

    #[tokio::test]
    async fn test_field_detached_while_typing_is_skipped() {
        let data = ApplicationData::from_resume(&resume(), None);
        let mut session = ScriptedSession::with(&full_form());
        session.detached.insert("[name=\"email\"]".to_string());
        let mut filler = FormFiller::new(session);

        let report = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap();

        assert_eq!(report.skipped, vec!["personal_info.email"]);
        assert!(report.submitted);
    }

    #[tokio::test]
    async fn test_missing_form_container_aborts_and_closes_session() {
        let selectors: Vec<_> = full_form()
            .into_iter()
            .filter(|s| *s != ".application-form")
            .collect();
        let data = ApplicationData::from_resume(&resume(), None);
        let mut filler = FormFiller::new(ScriptedSession::with(&selectors));

        let err = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap_err();

        assert!(matches!(err, FormError::Timeout { selector, .. } if selector == ".application-form"));
        assert!(filler.into_session().closed);
    }

    #[tokio::test]
    async fn test_missing_confirmation_reports_unsubmitted() {
        let selectors: Vec<_> = full_form()
            .into_iter()
            .filter(|s| *s != ".application-submitted")
            .collect();
        let data = ApplicationData::from_resume(&resume(), None);
        let mut filler = FormFiller::new(ScriptedSession::with(&selectors));

        let report = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap();

        assert!(report.skipped.is_empty());
        assert!(!report.submitted);
    }

    #[tokio::test]
    async fn test_missing_login_form_is_fatal() {
        let data = ApplicationData::default();
        let mut filler =
            FormFiller::new(ScriptedSession::default()).with_wait(Duration::from_millis(5));

        let err = filler.run("https://jobs.example.com", &credentials(), &data).await.unwrap_err();

        assert!(matches!(err, FormError::Timeout { selector, waited } if selector == "#username" && waited == Duration::from_millis(5)));
    }
}
