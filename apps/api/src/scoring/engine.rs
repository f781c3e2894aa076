//! Scoring Engine: hybrid resume/job match score.
//!
//! Combines four signals with fixed weights:
//!
//! | signal     | weight | source                                        |
//! |------------|--------|-----------------------------------------------|
//! | skills     | 0.40   | skill extraction, matched / job skills        |
//! | semantic   | 0.30   | cosine similarity of embeddings, 0–100        |
//! | experience | 0.20   | single-word experience-gap query              |
//! | keywords   | 0.10   | role keywords present in both texts           |
//!
//! Failure handling differs per signal. The semantic score has no fallback,
//! so an embedding failure fails the call. The experience query degrades to
//! `Unknown`, and model-driven skill extraction falls back to a keyword regex.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::experience::{assess_gap, ExperienceGap};
use super::keywords::{keyword_score, ROLE_KEYWORDS};
use super::summary::summarize;
use super::text::prepare;
use crate::config::{
    Config, SkillExtractionMode, TruncationLimits, DEFAULT_MAX_BATCH_COMPARISONS,
};
use crate::embedding::{build_backend, CacheStats, EmbeddingCache, EmbeddingProvider};
use crate::errors::AppError;
use crate::llm_client::{build_provider, GenerativeProvider};
use crate::skills::extract_skills;
use crate::skills::llm_extraction::{compare_case_insensitive, extract_with_llm};
use crate::telemetry::{record_scoring, ActiveScoring};

pub const SKILL_WEIGHT: f64 = 0.40;
pub const SEMANTIC_WEIGHT: f64 = 0.30;
pub const EXPERIENCE_WEIGHT: f64 = 0.20;
pub const KEYWORD_WEIGHT: f64 = 0.10;

/// Upper bound on each skill list in a result.
pub const MAX_LISTED_SKILLS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Final result of one resume/job comparison.
///
/// The skill lists hold the first five names in set order (alphabetical),
/// not the five most important.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub match_score: f64, // 0 – 100, two decimals
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_gap: ExperienceGap,
    pub summary: String,
}

/// Per-signal scores behind a result, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub semantic: f64,
    pub experience: f64,
    pub keyword: f64,
}

impl ScoreBreakdown {
    /// Weighted total rounded to two decimals and held to 0 – 100.
    pub fn total(&self) -> f64 {
        let raw = SKILL_WEIGHT * self.skill
            + SEMANTIC_WEIGHT * self.semantic
            + EXPERIENCE_WEIGHT * self.experience
            + KEYWORD_WEIGHT * self.keyword;
        round2(raw).clamp(0.0, 100.0)
    }
}

/// `100 · matched / job_total`, or 50 when the job names no skills.
pub fn skill_score(matched: usize, job_total: usize) -> f64 {
    if job_total == 0 {
        return 50.0;
    }
    matched as f64 / job_total as f64 * 100.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoringEngine {
    embeddings: EmbeddingProvider,
    llm: Arc<dyn GenerativeProvider>,
    skill_extraction: SkillExtractionMode,
    limits: TruncationLimits,
    pub(super) max_batch_comparisons: usize,
}

impl ScoringEngine {
    pub fn new(
        embeddings: EmbeddingProvider,
        llm: Arc<dyn GenerativeProvider>,
        skill_extraction: SkillExtractionMode,
        limits: TruncationLimits,
    ) -> Self {
        Self {
            embeddings,
            llm,
            skill_extraction,
            limits,
            max_batch_comparisons: DEFAULT_MAX_BATCH_COMPARISONS,
        }
    }

    pub fn with_max_batch_comparisons(mut self, max: usize) -> Self {
        self.max_batch_comparisons = max;
        self
    }

    /// Builds both backends from configuration with a fresh cache.
    /// An unreachable backend is an error here; there is no degraded engine.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let backend = build_backend(&config.embedding).await?;
        let llm = build_provider(&config.llm).await?;
        let cache = EmbeddingCache::shared(config.cache_capacity);

        info!(
            "Scoring engine ready: cache_capacity={}, skill_extraction={:?}, max_batch_comparisons={}",
            config.cache_capacity, config.skill_extraction, config.max_batch_comparisons
        );
        Ok(Self::new(
            EmbeddingProvider::new(backend, cache),
            llm,
            config.skill_extraction,
            config.truncation,
        )
        .with_max_batch_comparisons(config.max_batch_comparisons))
    }

    /// Scores one resume against one job posting.
    pub async fn score_match(
        &self,
        resume_text: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<ScoreResult, AppError> {
        self.evaluate(resume_text, job_description, job_requirements)
            .await
            .map(|(result, _)| result)
    }

    pub(crate) async fn evaluate(
        &self,
        resume_text: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<(ScoreResult, ScoreBreakdown), AppError> {
        let _active = ActiveScoring::start();
        let started = Instant::now();
        let outcome = self
            .compute(resume_text, job_description, job_requirements)
            .await;
        let status = if outcome.is_ok() { "success" } else { "error" };
        record_scoring(status, started.elapsed());
        outcome
    }

    async fn compute(
        &self,
        resume_text: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<(ScoreResult, ScoreBreakdown), AppError> {
        let limits = &self.limits;

        // 1–2. Skills
        let (matched, missing, job_total) = match self.skill_extraction {
            SkillExtractionMode::Deterministic => {
                let resume_skills = extract_skills(resume_text);
                let job_skills = extract_skills(&format!("{job_description} {job_requirements}"));
                let (matched, missing) = compare_case_insensitive(&resume_skills, &job_skills);
                (matched, missing, job_skills.len())
            }
            SkillExtractionMode::Llm => {
                let resume_prompt = prepare(resume_text, limits.prompt_text_chars);
                let job_prompt = join_job_text(
                    &prepare(job_description, limits.prompt_text_chars),
                    &prepare(job_requirements, limits.prompt_requirements_chars),
                );
                let extracted = extract_with_llm(self.llm.as_ref(), &resume_prompt, &job_prompt).await;
                debug!("Skills extracted via {:?}", extracted.source);
                let (matched, missing) = compare_case_insensitive(&extracted.resume, &extracted.job);
                (matched, missing, extracted.job.len())
            }
        };
        let skill = skill_score(matched.len(), job_total);

        // 3. Semantic similarity (embedding errors propagate)
        let resume_embed = prepare(resume_text, limits.resume_embed_chars);
        let job_embed = join_job_text(
            &prepare(job_description, limits.job_embed_chars),
            &prepare(job_requirements, limits.requirements_embed_chars),
        );
        let semantic = self
            .embeddings
            .get_semantic_similarity(&resume_embed, &job_embed)
            .await?;

        // 4. Experience gap (never fails)
        let experience_gap = assess_gap(
            self.llm.as_ref(),
            &prepare(resume_text, limits.prompt_text_chars),
            &prepare(job_description, limits.prompt_text_chars),
            &prepare(job_requirements, limits.prompt_requirements_chars),
        )
        .await;

        // 5. Role keywords
        let keyword = keyword_score(resume_text, job_description, ROLE_KEYWORDS);

        let breakdown = ScoreBreakdown {
            skill,
            semantic,
            experience: experience_gap.score(),
            keyword,
        };
        let match_score = breakdown.total();
        debug!(
            "Scored match: total={match_score}, skill={skill:.2}, semantic={semantic:.2}, experience={}, keyword={keyword:.2}",
            experience_gap
        );

        let result = ScoreResult {
            match_score,
            summary: summarize(skill, matched.len(), missing.len()),
            matched_skills: matched.into_iter().take(MAX_LISTED_SKILLS).collect(),
            missing_skills: missing.into_iter().take(MAX_LISTED_SKILLS).collect(),
            experience_gap,
        };
        Ok((result, breakdown))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.embeddings.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.embeddings.clear_cache();
    }
}

fn join_job_text(description: &str, requirements: &str) -> String {
    format!("{description} {requirements}").trim().to_string()
}
