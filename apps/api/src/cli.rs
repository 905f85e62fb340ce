//! Command-line entry points. `serve` runs the HTTP API; the other commands run
//! one pipeline against a local file and print the result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::extraction::{extract_text, DocumentKind};
use crate::form_filler::webdriver::WebDriverSession;
use crate::form_filler::{ApplicationData, Credentials, FormFiller};
use crate::llm_client::CompletionProvider;
use crate::matching::pipeline::{prepare_application, tailor_for_job};
use crate::models::resume::ResumeRecord;
use crate::resume::parser::parse_resume_file;

#[derive(Parser, Debug)]
#[command(name = "application-assistant")]
#[command(about = "Parse resumes, tailor them to job postings and fill application forms", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Parse a PDF/DOCX resume and save the structured record as JSON
    Parse {
        /// Resume file (.pdf, .doc, .docx)
        file: PathBuf,
        /// Where to write the JSON (default: parsed_resume_<stem>.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Tailor the resume's bullet points to a job description
    Tailor {
        file: PathBuf,
        /// Path to file containing the job description
        #[arg(long, value_name = "FILE")]
        job_description: PathBuf,
    },
    /// Generate application answers and submit them through the web form
    FillForm {
        file: PathBuf,
        #[arg(long, value_name = "FILE")]
        job_description: PathBuf,
        /// Application form URL
        #[arg(long, value_name = "URL")]
        url: String,
        /// Run the browser without a window
        #[arg(long)]
        headless: bool,
    },
}

pub async fn run_parse(
    provider: &dyn CompletionProvider,
    file: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    check_resume_path(file)?;
    let record = parse_resume_file(provider, file)
        .await
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    print_sections(&record)?;

    let output = output.unwrap_or_else(|| default_output_path(file));
    let json = serde_json::to_string_pretty(&record)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("\nParsed resume saved to {}", output.display());
    Ok(())
}

pub async fn run_tailor(
    provider: &dyn CompletionProvider,
    file: &Path,
    job_description: &Path,
) -> Result<()> {
    let text = read_resume(file).await?;
    let jd = read_job_description(job_description).await?;

    let outcome = tailor_for_job(provider, &text, &jd)
        .await
        .context("Failed to tailor resume")?;

    print_json("PARSED RESUME", &outcome.resume)?;
    print_json("TAILORED BULLETS", &outcome.tailored_bullets)?;
    Ok(())
}

pub async fn run_fill_form(
    provider: &dyn CompletionProvider,
    config: &Config,
    file: &Path,
    job_description: &Path,
    url: &str,
    headless: bool,
) -> Result<()> {
    let (username, password) = config.form_credentials()?;
    let text = read_resume(file).await?;
    let jd = read_job_description(job_description).await?;

    let package = prepare_application(provider, &text, &jd)
        .await
        .context("Failed to prepare application")?;
    let data = ApplicationData::from_resume(&package.resume, Some(&package.responses));

    let session = WebDriverSession::connect(&config.webdriver_url, headless)
        .await
        .with_context(|| format!("Failed to connect to WebDriver at {}", config.webdriver_url))?;
    let mut filler =
        FormFiller::new(session).with_wait(Duration::from_secs(config.form_wait_secs));
    let report = filler
        .run(url, &Credentials { username, password }, &data)
        .await
        .context("Form filling failed")?;

    print_json("FILL REPORT", &report)?;
    if !report.is_complete() {
        info!(
            "Application incomplete: {} skipped, submitted: {}",
            report.skipped.len(),
            report.submitted
        );
    }
    Ok(())
}

/// Validates the path before anything is sent upstream.
fn check_resume_path(file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }
    DocumentKind::from_path(file)?;
    Ok(())
}

async fn read_resume(file: &Path) -> Result<String> {
    check_resume_path(file)?;
    let text = extract_text(file)
        .await
        .with_context(|| format!("Failed to extract text from {}", file.display()))?;
    if text.trim().is_empty() {
        bail!("{} contains no extractable text", file.display());
    }
    Ok(text)
}

async fn read_job_description(path: &Path) -> Result<String> {
    let jd = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job description {}", path.display()))?;
    if jd.trim().is_empty() {
        bail!("Job description {} is empty", path.display());
    }
    Ok(jd)
}

pub fn default_output_path(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    PathBuf::from(format!("parsed_resume_{stem}.json"))
}

fn print_sections(record: &ResumeRecord) -> Result<()> {
    println!("\nParsed Resume Information:");
    print_json("PERSONAL INFORMATION", &record.personal_information)?;
    print_json("WORK EXPERIENCE", &record.work_experience)?;
    print_json("EDUCATION", &record.education)?;
    print_json("SKILLS", &record.skills)?;
    print_json("PROJECTS", &record.projects)?;
    print_json("CERTIFICATIONS", &record.certifications)?;
    Ok(())
}

fn print_json<T: Serialize>(heading: &str, value: &T) -> Result<()> {
    println!("\n{heading}:");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
