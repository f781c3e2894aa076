/// One-line summary keyed on the skill score: ≥80 excellent, ≥60 good,
/// ≥40 partial, otherwise low.
pub fn summarize(skill_score: f64, matched: usize, missing: usize) -> String {
    let band = if skill_score >= 80.0 {
        "Excellent"
    } else if skill_score >= 60.0 {
        "Good"
    } else if skill_score >= 40.0 {
        "Partial"
    } else {
        "Low"
    };
    format!("{band} skill alignment: {matched} matched, {missing} missing.")
}
