//! Batch scoring over the Cartesian product of resumes and jobs.
//!
//! Pairs run one after another so repeated texts are served from the shared
//! embedding cache. There is no per-pair isolation: the first failed pair
//! aborts the batch. The number of pairs is capped by the engine's
//! `max_batch_comparisons`, checked before any work or allocation.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use super::engine::{round2, ScoringEngine};
use super::experience::ExperienceGap;
use crate::errors::AppError;

/// One resume/job pair in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub resume_index: usize,
    pub job_index: usize,
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_gap: ExperienceGap,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Ordered by resume index, then job index.
    pub results: Vec<BatchItem>,
    pub total_comparisons: usize,
    pub processing_time_seconds: f64,
}

/// `resumes × jobs`, rejected when it overflows or exceeds `max`.
pub fn comparison_count(resumes: usize, jobs: usize, max: usize) -> Result<usize, AppError> {
    match resumes.checked_mul(jobs) {
        Some(total) if total <= max => Ok(total),
        _ => Err(AppError::Validation(format!(
            "batch of {resumes} resumes x {jobs} jobs exceeds the limit of {max} comparisons"
        ))),
    }
}

impl ScoringEngine {
    pub fn check_batch_size(&self, resumes: usize, jobs: usize) -> Result<usize, AppError> {
        comparison_count(resumes, jobs, self.max_batch_comparisons)
    }

    /// Scores every resume against every job. `requirements[j]` belongs to
    /// `jobs[j]`; a missing entry means no requirements.
    pub async fn batch_score(
        &self,
        resumes: &[String],
        jobs: &[String],
        requirements: &[String],
    ) -> Result<BatchResult, AppError> {
        let total_comparisons = self.check_batch_size(resumes.len(), jobs.len())?;
        let started = Instant::now();
        let mut results = Vec::with_capacity(total_comparisons);

        for (resume_index, resume) in resumes.iter().enumerate() {
            for (job_index, job) in jobs.iter().enumerate() {
                let reqs = requirements.get(job_index).map(String::as_str).unwrap_or("");
                let scored = self.score_match(resume, job, reqs).await?;
                results.push(BatchItem {
                    resume_index,
                    job_index,
                    match_score: scored.match_score,
                    matched_skills: scored.matched_skills,
                    missing_skills: scored.missing_skills,
                    experience_gap: scored.experience_gap,
                });
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        info!(
            "Batch scored {} comparisons ({} resumes x {} jobs) in {:.2}s",
            total_comparisons,
            resumes.len(),
            jobs.len(),
            elapsed
        );

        Ok(BatchResult {
            results,
            total_comparisons,
            processing_time_seconds: round2(elapsed),
        })
    }
}
