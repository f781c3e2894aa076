// Role keyword heuristic: seniority, role and domain terms found in both texts.

/// Seniority, role and domain terms, checked as lowercase substrings.
pub const ROLE_KEYWORDS: &[&str] = &[
    // seniority
    "senior",
    "lead",
    "principal",
    "staff",
    // role
    "engineer",
    "developer",
    "specialist",
    // domain
    "api",
    "rest",
    "microservices",
    "docker",
    "kubernetes",
    "ci/cd",
];

/// Share of `vocabulary` terms present in both texts, scaled to 0–100.
/// An empty vocabulary scores 50.
pub fn keyword_score(resume_text: &str, job_text: &str, vocabulary: &[&str]) -> f64 {
    if vocabulary.is_empty() {
        return 50.0;
    }

    let resume = resume_text.to_lowercase();
    let job = job_text.to_lowercase();
    let matches = vocabulary
        .iter()
        .filter(|term| job.contains(*term) && resume.contains(*term))
        .count();

    matches as f64 / vocabulary.len() as f64 * 100.0
}
