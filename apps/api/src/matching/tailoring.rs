//! Bullet Tailoring: rephrases resume bullets for a job description.
//!
//! The model only ever contributes the rephrased text. Company, title, dates
//! and the original bullets are copied from the input resume, so the
//! `original_bullets` of the result are byte-identical to the input no matter
//! what the model returned.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, json_system_prompt};
use crate::llm_client::{call_json, CompletionProvider, LlmError};
use crate::matching::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_ROLE};
use crate::models::application::{TailoredBullets, TailoredExperience};
use crate::models::resume::{ResumeRecord, WorkExperience};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("number pattern is a valid regex"));

pub fn build_tailor_prompt(
    job_description: &str,
    resume: &ResumeRecord,
) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    Ok(fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_json", &resume_json),
        ],
    ))
}

/// Asks the model for tailored bullets, then reconciles them against `resume`.
pub async fn tailor_bullet_points(
    provider: &dyn CompletionProvider,
    job_description: &str,
    resume: &ResumeRecord,
) -> Result<TailoredBullets, LlmError> {
    let prompt = build_tailor_prompt(job_description, resume)?;
    let draft: TailoredBullets =
        call_json(provider, &prompt, &json_system_prompt(TAILOR_ROLE)).await?;

    let tailored = reconcile(resume, draft);
    info!(
        "Tailored {} experiences via {}",
        tailored.experiences.len(),
        provider.name()
    );
    Ok(tailored)
}

/// Rebuilds the model's draft on top of the input resume.
///
/// One output entry per input work experience, in input order. Draft entries
/// are matched by company and title first, then by position.
pub fn reconcile(resume: &ResumeRecord, draft: TailoredBullets) -> TailoredBullets {
    let mut drafts: Vec<Option<TailoredExperience>> =
        draft.experiences.into_iter().map(Some).collect();

    let experiences = resume
        .work_experience
        .iter()
        .enumerate()
        .map(|(index, experience)| {
            let matched = take_matching_draft(&mut drafts, index, experience);
            reconcile_experience(experience, matched)
        })
        .collect();

    let unmatched = drafts.iter().filter(|d| d.is_some()).count();
    if unmatched > 0 {
        warn!("Dropped {unmatched} tailored experiences with no counterpart in the resume");
    }

    TailoredBullets { experiences }
}

fn take_matching_draft(
    drafts: &mut [Option<TailoredExperience>],
    index: usize,
    experience: &WorkExperience,
) -> Option<TailoredExperience> {
    let by_identity = drafts.iter().position(|d| {
        d.as_ref().is_some_and(|d| {
            same_text(&d.company, &experience.company) && same_text(&d.title, &experience.title)
        })
    });
    match by_identity {
        Some(position) => drafts[position].take(),
        None => drafts.get_mut(index).and_then(Option::take),
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn reconcile_experience(
    experience: &WorkExperience,
    draft: Option<TailoredExperience>,
) -> TailoredExperience {
    let original = &experience.responsibilities;

    let tailored = match draft {
        _ if original.is_empty() => Vec::new(),
        None => {
            warn!(
                "No tailored bullets for {} at {}; keeping originals",
                experience.title, experience.company
            );
            original.clone()
        }
        Some(draft) => preserve_quantities(experience, original, draft.tailored_bullets),
    };

    TailoredExperience {
        company: experience.company.clone(),
        title: experience.title.clone(),
        dates: experience.dates.clone(),
        original_bullets: original.clone(),
        tailored_bullets: tailored,
    }
}

/// Reverts any rephrasing that lost a number present in the original.
fn preserve_quantities(
    experience: &WorkExperience,
    original: &[String],
    tailored: Vec<String>,
) -> Vec<String> {
    if tailored.is_empty() {
        warn!(
            "Empty tailored bullets for {} at {}; keeping originals",
            experience.title, experience.company
        );
        return original.to_vec();
    }

    if tailored.len() == original.len() {
        return original
            .iter()
            .zip(tailored)
            .map(|(original, tailored)| {
                let lost = missing_numbers(original, &tailored);
                if lost.is_empty() {
                    tailored
                } else {
                    warn!("Tailored bullet dropped {lost:?}; reverting to original: {original}");
                    original.clone()
                }
            })
            .collect();
    }

    let lost = missing_numbers(&original.join("\n"), &tailored.join("\n"));
    if lost.is_empty() {
        tailored
    } else {
        warn!(
            "Tailored bullets for {} at {} dropped {lost:?}; keeping originals",
            experience.title, experience.company
        );
        original.to_vec()
    }
}

/// Numbers in `original` that do not appear in `tailored`. Thousands
/// separators are ignored, so "1,000" and "1000" count as the same claim.
pub fn missing_numbers(original: &str, tailored: &str) -> Vec<String> {
    let present: HashSet<String> = numbers(tailored).collect();
    let mut seen = HashSet::new();
    numbers(original)
        .filter(|n| !present.contains(n) && seen.insert(n.clone()))
        .collect()
}

fn numbers(text: &str) -> impl Iterator<Item = String> + '_ {
    NUMBER.find_iter(text).map(|m| m.as_str().replace(',', ""))
}
