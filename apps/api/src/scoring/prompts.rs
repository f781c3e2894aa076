// Prompt templates for the scoring engine.
// Placeholders are filled with `fill_template`; inputs arrive pre-truncated.

/// Placeholders: {resume_text}, {job_description}, {job_requirements}, {single_word}
pub const EXPERIENCE_GAP_PROMPT: &str = "You are an expert technical recruiter comparing a candidate's experience with a role.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

JOB REQUIREMENTS:
{job_requirements}

Rate the gap between the candidate's demonstrated experience (years, seniority, domain) and what the role expects.
Answer with one of: None, Minor, Moderate, Major.
- None: meets or exceeds every expectation
- Minor: small shortfall easily closed on the job
- Moderate: noticeable shortfall in level or domain
- Major: substantially under-qualified

{single_word}";
