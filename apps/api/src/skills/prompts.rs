// Prompt for model-driven skill extraction.
// Placeholders: {resume_text}, {job_text}, {json_only}

pub const SKILL_EXTRACTION_PROMPT: &str = r#"You are an expert technical recruiter.

Extract the concrete technical skills (languages, frameworks, databases, cloud platforms, tools, methodologies) named in the resume and in the job posting below. Use short canonical names ("Node.js", "PostgreSQL", "Kubernetes"). Do not infer skills that are not stated.

RESUME:
{resume_text}

JOB POSTING:
{job_text}

Return this exact shape:
{"resume_skills": ["..."], "job_skills": ["..."]}

{json_only}"#;
