//! Experience gap: a constrained single-word model query and its score lookup.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::EXPERIENCE_GAP_PROMPT;
use crate::llm_client::prompts::{fill_template, SINGLE_WORD_INSTRUCTION};
use crate::llm_client::GenerativeProvider;
use crate::telemetry::record_llm_latency;

/// Ordinal mismatch between demonstrated experience and role expectations.
/// `Unknown` means the assessment failed, not that it came back neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceGap {
    None,
    Minor,
    Moderate,
    Major,
    Unknown,
}

/// Labels the model may answer with, in matching order.
const ALLOWED: [ExperienceGap; 4] = [
    ExperienceGap::None,
    ExperienceGap::Minor,
    ExperienceGap::Moderate,
    ExperienceGap::Major,
];

impl ExperienceGap {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceGap::None => "None",
            ExperienceGap::Minor => "Minor",
            ExperienceGap::Moderate => "Moderate",
            ExperienceGap::Major => "Major",
            ExperienceGap::Unknown => "Unknown",
        }
    }

    /// None 100, Minor 75, Moderate 50, Major 25, anything else 50.
    pub fn score(self) -> f64 {
        gap_score(self.label())
    }

    /// Interprets a raw model reply. The reply is lowercased and each allowed
    /// label is tried as a substring in order; no hit yields `Moderate`.
    pub fn from_response(raw: &str) -> Self {
        let reply = raw.trim().to_lowercase();
        ALLOWED
            .into_iter()
            .find(|gap| reply.contains(&gap.label().to_lowercase()))
            .unwrap_or(ExperienceGap::Moderate)
    }
}

impl fmt::Display for ExperienceGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score lookup by label. Labels outside the table score 50.
pub fn gap_score(label: &str) -> f64 {
    match label {
        "None" => 100.0,
        "Minor" => 75.0,
        "Moderate" => 50.0,
        "Major" => 25.0,
        _ => 50.0,
    }
}

/// Runs the single-word query. Provider failure degrades to `Unknown` and is
/// never returned as an error.
pub async fn assess_gap(
    llm: &dyn GenerativeProvider,
    resume_text: &str,
    job_description: &str,
    job_requirements: &str,
) -> ExperienceGap {
    let requirements = if job_requirements.is_empty() {
        "No additional requirements provided"
    } else {
        job_requirements
    };
    let prompt = fill_template(
        EXPERIENCE_GAP_PROMPT,
        &[
            ("resume_text", resume_text),
            ("job_description", job_description),
            ("job_requirements", requirements),
            ("single_word", SINGLE_WORD_INSTRUCTION),
        ],
    );

    let started = Instant::now();
    let reply = llm.generate(&prompt).await;
    record_llm_latency(started.elapsed());

    match reply {
        Ok(reply) => {
            let gap = ExperienceGap::from_response(&reply);
            debug!("Experience gap reply {:?} -> {}", reply.trim(), gap);
            gap
        }
        Err(e) => {
            warn!("Experience gap assessment failed, reporting Unknown: {e}");
            ExperienceGap::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedLlm, UnreachableLlm};

    #[test]
    fn test_score_lookup() {
        assert_eq!(ExperienceGap::None.score(), 100.0);
        assert_eq!(ExperienceGap::Minor.score(), 75.0);
        assert_eq!(ExperienceGap::Moderate.score(), 50.0);
        assert_eq!(ExperienceGap::Major.score(), 25.0);
        assert_eq!(ExperienceGap::Unknown.score(), 50.0);
        assert_eq!(gap_score("Severe"), 50.0);
    }

    #[test]
    fn test_response_matching() {
        assert_eq!(ExperienceGap::from_response("Minor"), ExperienceGap::Minor);
        assert_eq!(ExperienceGap::from_response("  MAJOR.\n"), ExperienceGap::Major);
        assert_eq!(
            ExperienceGap::from_response("The gap is moderate"),
            ExperienceGap::Moderate
        );
        assert_eq!(ExperienceGap::from_response("N/A"), ExperienceGap::Moderate);
        assert_eq!(ExperienceGap::from_response(""), ExperienceGap::Moderate);
    }

    #[test]
    fn test_first_allowed_label_wins() {
        // "none" is checked before "major".
        assert_eq!(
            ExperienceGap::from_response("None, not Major"),
            ExperienceGap::None
        );
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&ExperienceGap::Unknown).unwrap(),
            "\"Unknown\""
        );
    }

    #[tokio::test]
    async fn test_assess_gap_uses_reply() {
        let llm = ScriptedLlm::replying("Major");
        let gap = assess_gap(&llm, "junior dev", "staff engineer", "").await;
        assert_eq!(gap, ExperienceGap::Major);

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("junior dev"));
        assert!(prompt.contains("No additional requirements provided"));
        assert!(prompt.contains("None, Minor, Moderate, Major"));
    }

    #[tokio::test]
    async fn test_placeholders_inside_resume_stay_literal() {
        let llm = ScriptedLlm::replying("None");
        let resume = "I wrote the {job_description} parser and {single_word} docs";
        assess_gap(&llm, resume, "Compiler engineer", "").await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains(resume));
        assert_eq!(prompt.matches("Compiler engineer").count(), 1);
        assert_eq!(prompt.matches(SINGLE_WORD_INSTRUCTION).count(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_unknown() {
        let gap = assess_gap(&UnreachableLlm, "a", "b", "c").await;
        assert_eq!(gap, ExperienceGap::Unknown);
    }
}
