pub mod extractor;
pub mod llm_extraction;
mod prompts;

pub use extractor::{extract_skills, SkillSet};
