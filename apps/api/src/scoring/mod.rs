// Hybrid match scoring: skills, semantic similarity, experience gap, keywords.
// All generative calls go through llm_client and all vectors through embedding.

pub mod batch;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod keywords;
mod prompts;
pub mod summary;
pub mod text;
