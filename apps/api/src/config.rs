use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::errors::AppError;

/// Which embedding backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    /// Hosted OpenAI embeddings API.
    OpenAi,
    /// Ollama model server on the local network.
    Ollama,
    /// In-process model (requires the `local-embeddings` feature).
    Local,
}

impl FromStr for EmbeddingProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "local" => Ok(Self::Local),
            other => Err(AppError::UnknownProvider(format!(
                "embedding provider '{other}' (expected openai, ollama or local)"
            ))),
        }
    }
}

/// Which generative backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    OpenAi,
    Ollama,
    /// Any OpenAI-compatible chat completions endpoint (Groq, Together, LocalAI, ...).
    Custom,
}

impl FromStr for LlmProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::UnknownProvider(format!(
                "LLM provider '{other}' (expected openai, ollama or custom)"
            ))),
        }
    }
}

/// How resume and job skills are extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillExtractionMode {
    /// Pattern table only. No generative dependency.
    #[default]
    Deterministic,
    /// Ask the generative model, falling back to keyword regexes on failure.
    Llm,
}

impl FromStr for SkillExtractionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deterministic" => Ok(Self::Deterministic),
            "llm" => Ok(Self::Llm),
            other => Err(AppError::Validation(format!(
                "SKILL_EXTRACTION must be 'deterministic' or 'llm', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub local_model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub custom_api_url: Option<String>,
    pub custom_api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Character budgets for text sent to the backends.
/// These bound cost and latency; they are not part of the scoring contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationLimits {
    pub resume_embed_chars: usize,
    pub job_embed_chars: usize,
    pub requirements_embed_chars: usize,
    pub prompt_text_chars: usize,
    pub prompt_requirements_chars: usize,
}

impl Default for TruncationLimits {
    fn default() -> Self {
        Self {
            resume_embed_chars: 1000,
            job_embed_chars: 1000,
            requirements_embed_chars: 500,
            prompt_text_chars: 2000,
            prompt_requirements_chars: 1000,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Static for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub cache_capacity: usize,
    pub skill_extraction: SkillExtractionMode,
    pub truncation: TruncationLimits,
    /// Upper bound on `resumes × jobs` for one batch request.
    pub max_batch_comparisons: usize,
    pub metrics_enabled: bool,
}

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_BATCH_COMPARISONS: usize = 10_000;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openai_api_key = optional_env("OPENAI_API_KEY");
        let openai_base_url = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        let ollama_base_url = env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL);

        let embedding = EmbeddingConfig {
            provider: env_or("EMBEDDING_PROVIDER", "ollama").parse()?,
            openai_api_key: openai_api_key.clone(),
            openai_base_url: openai_base_url.clone(),
            openai_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            ollama_base_url: ollama_base_url.clone(),
            ollama_model: env_or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
            local_model: env_or("LOCAL_EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
            timeout: Duration::from_secs(parse_env("EMBEDDING_TIMEOUT", 30)?),
        };

        let llm = LlmConfig {
            provider: env_or("LLM_PROVIDER", "ollama").parse()?,
            openai_api_key,
            openai_base_url,
            openai_model: env_or("OPENAI_MODEL", "gpt-4-turbo"),
            ollama_base_url,
            ollama_model: env_or("OLLAMA_MODEL", "llama3.1"),
            custom_api_url: optional_env("CUSTOM_API_URL"),
            custom_api_key: optional_env("CUSTOM_API_KEY"),
            temperature: parse_env("LLM_TEMPERATURE", 0.3)?,
            max_tokens: parse_env("LLM_MAX_TOKENS", 500)?,
            timeout: Duration::from_secs(parse_env("LLM_TIMEOUT", 30)?),
        };

        let defaults = TruncationLimits::default();
        let truncation = TruncationLimits {
            resume_embed_chars: parse_env("RESUME_EMBED_CHARS", defaults.resume_embed_chars)?,
            job_embed_chars: parse_env("JOB_EMBED_CHARS", defaults.job_embed_chars)?,
            requirements_embed_chars: parse_env(
                "REQUIREMENTS_EMBED_CHARS",
                defaults.requirements_embed_chars,
            )?,
            prompt_text_chars: parse_env("PROMPT_TEXT_CHARS", defaults.prompt_text_chars)?,
            prompt_requirements_chars: parse_env(
                "PROMPT_REQUIREMENTS_CHARS",
                defaults.prompt_requirements_chars,
            )?,
        };

        let cache_capacity: usize = parse_env("EMBEDDING_CACHE_SIZE", 1000)?;
        if cache_capacity == 0 {
            bail!("EMBEDDING_CACHE_SIZE must be at least 1");
        }

        let max_batch_comparisons: usize =
            parse_env("MAX_BATCH_COMPARISONS", DEFAULT_MAX_BATCH_COMPARISONS)?;
        if max_batch_comparisons == 0 {
            bail!("MAX_BATCH_COMPARISONS must be at least 1");
        }

        Ok(Config {
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            embedding,
            llm,
            cache_capacity,
            skill_extraction: env_or("SKILL_EXTRACTION", "deterministic").parse()?,
            truncation,
            max_batch_comparisons,
            metrics_enabled: parse_env("METRICS_ENABLED", true)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Returns `None` for unset or blank variables.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
