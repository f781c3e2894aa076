// Shared prompt fragments.
// Each feature that calls the LLM keeps its own prompts.rs; this file only
// holds instructions reused across them, plus the placeholder filler.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern must compile"));

/// Appended to prompts whose response goes through `generate_json`.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts that expect exactly one word back.
pub const SINGLE_WORD_INSTRUCTION: &str =
    "Respond with exactly one word and nothing else: no punctuation, no explanation.";

/// Substitutes `{name}` placeholders in one pass over `template`.
///
/// Inserted values are never rescanned, so user text that happens to contain
/// `{job_description}` stays literal. Unknown placeholders are left as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_each_placeholder() {
        let filled = fill_template(
            "A={a} B={b} again {a}",
            &[("a", "one"), ("b", "two")],
        );
        assert_eq!(filled, "A=one B=two again one");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let filled = fill_template(
            "R: {resume_text}\nJ: {job_text}",
            &[("resume_text", "see {job_text} and {json_only}"), ("job_text", "Rust")],
        );
        assert_eq!(filled, "R: see {job_text} and {json_only}\nJ: Rust");
    }

    #[test]
    fn test_unknown_placeholders_and_json_braces_survive() {
        let filled = fill_template(
            r#"{"resume_skills": []} {missing} {a}"#,
            &[("a", "x")],
        );
        assert_eq!(filled, r#"{"resume_skills": []} {missing} x"#);
    }
}
