//! Model-driven skill extraction with a deterministic fallback.
//!
//! One `generate_json` call returns both skill lists. Any failure (transport,
//! malformed JSON, missing arrays) falls back to a fixed keyword regex, so this
//! path never fails the score.

use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::prompts::SKILL_EXTRACTION_PROMPT;
use super::SkillSet;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::GenerativeProvider;
use crate::telemetry::record_llm_latency;

static FALLBACK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:python|java|javascript|node\.?js|react|vue|angular|docker|kubernetes|aws|gcp|azure|sql|mongodb|redis|kafka)\b",
    )
    .expect("fallback skill pattern must compile")
});

/// Where a pair of skill sets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ExtractedSkills {
    pub resume: SkillSet,
    pub job: SkillSet,
    pub source: SkillSource,
}

#[derive(Debug, Deserialize)]
struct SkillExtractionResponse {
    resume_skills: Vec<String>,
    job_skills: Vec<String>,
}

/// Asks the model for both skill lists. `resume_text` and `job_text` are
/// expected to be prepared (normalized and truncated) already.
pub async fn extract_with_llm(
    llm: &dyn GenerativeProvider,
    resume_text: &str,
    job_text: &str,
) -> ExtractedSkills {
    let prompt = fill_template(
        SKILL_EXTRACTION_PROMPT,
        &[
            ("resume_text", resume_text),
            ("job_text", job_text),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let started = Instant::now();
    let reply = llm.generate_json(&prompt).await;
    record_llm_latency(started.elapsed());

    let parsed = match reply {
        Ok(value) => serde_json::from_value::<SkillExtractionResponse>(value)
            .map_err(|e| format!("unexpected response shape: {e}")),
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(response) => {
            let extracted = ExtractedSkills {
                resume: dedupe_case_insensitive(response.resume_skills),
                job: dedupe_case_insensitive(response.job_skills),
                source: SkillSource::Llm,
            };
            debug!(
                "LLM skill extraction: resume={}, job={}",
                extracted.resume.len(),
                extracted.job.len()
            );
            extracted
        }
        Err(reason) => {
            warn!("LLM skill extraction failed, using keyword fallback: {reason}");
            ExtractedSkills {
                resume: fallback_extract(resume_text),
                job: fallback_extract(job_text),
                source: SkillSource::Fallback,
            }
        }
    }
}

/// Fixed keyword regex with no generative dependency. Names are lowercase;
/// `nodejs` is reported as `node.js`.
pub fn fallback_extract(text: &str) -> SkillSet {
    FALLBACK_PATTERN
        .find_iter(text)
        .map(|m| {
            let skill = m.as_str().to_lowercase();
            if skill == "nodejs" {
                "node.js".to_string()
            } else {
                skill
            }
        })
        .collect()
}

/// Trims names, drops blanks, and keeps the first spelling of each name
/// under case-insensitive comparison.
fn dedupe_case_insensitive(names: Vec<String>) -> SkillSet {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
        .collect()
}

/// Case-insensitive intersection and difference: `(matched, missing)`.
/// Matched names use the resume's spelling.
pub fn compare_case_insensitive(resume: &SkillSet, job: &SkillSet) -> (SkillSet, SkillSet) {
    let job_keys: std::collections::HashSet<String> = job.iter().map(|s| s.to_lowercase()).collect();
    let resume_keys: std::collections::HashSet<String> =
        resume.iter().map(|s| s.to_lowercase()).collect();

    let matched = resume
        .iter()
        .filter(|s| job_keys.contains(&s.to_lowercase()))
        .cloned()
        .collect();
    let missing = job
        .iter()
        .filter(|s| !resume_keys.contains(&s.to_lowercase()))
        .cloned()
        .collect();
    (matched, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedLlm, UnreachableLlm};

    fn set(names: &[&str]) -> SkillSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fallback_vocabulary() {
        assert_eq!(
            fallback_extract("NodeJS and Node.js services on AWS, Java not JavaScript"),
            set(&["aws", "java", "javascript", "node.js"])
        );
        assert!(fallback_extract("Rust and Elixir").is_empty());
    }

    #[test]
    fn test_fallback_is_word_bounded() {
        assert!(fallback_extract("mysql, postgresql").is_empty());
    }

    #[tokio::test]
    async fn test_llm_lists_are_used_and_deduped() {
        let llm = ScriptedLlm::replying(
            r#"```json
{"resume_skills": ["Rust", "rust", " Docker ", ""], "job_skills": ["docker", "Kubernetes"]}
```"#,
        );
        let extracted = extract_with_llm(&llm, "resume", "job").await;

        assert_eq!(extracted.source, SkillSource::Llm);
        assert_eq!(extracted.resume, set(&["Docker", "Rust"]));
        assert_eq!(extracted.job, set(&["Kubernetes", "docker"]));
        assert!(llm.prompts()[0].contains("Respond with valid JSON only"));
    }

    #[tokio::test]
    async fn test_resume_text_with_placeholder_is_sent_verbatim() {
        let llm = ScriptedLlm::replying(r#"{"resume_skills": [], "job_skills": []}"#);
        extract_with_llm(&llm, "templating: {job_text} {json_only}", "Go services").await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("templating: {job_text} {json_only}"));
        assert_eq!(prompt.matches("Go services").count(), 1);
        assert_eq!(prompt.matches(JSON_ONLY_INSTRUCTION).count(), 1);
    }

    #[tokio::test]
    async fn test_missing_array_falls_back() {
        let llm = ScriptedLlm::replying(r#"{"resume_skills": ["Python"]}"#);
        let extracted = extract_with_llm(&llm, "python and docker", "docker, kafka").await;

        assert_eq!(extracted.source, SkillSource::Fallback);
        assert_eq!(extracted.resume, set(&["docker", "python"]));
        assert_eq!(extracted.job, set(&["docker", "kafka"]));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let extracted = extract_with_llm(&UnreachableLlm, "react", "react vue").await;
        assert_eq!(extracted.source, SkillSource::Fallback);
        assert_eq!(extracted.job, set(&["react", "vue"]));
    }

    #[test]
    fn test_compare_case_insensitive() {
        let (matched, missing) =
            compare_case_insensitive(&set(&["docker", "Rust"]), &set(&["Docker", "Kafka"]));
        assert_eq!(matched, set(&["docker"]));
        assert_eq!(missing, set(&["Kafka"]));
    }
}
