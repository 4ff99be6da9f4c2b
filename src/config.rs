use crate::types::{PipelineError, Result, Source};
use std::env;
use url::Url;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Entries kept per source by default.
const DEFAULT_MAX_ENTRIES: usize = 2;

/// Runtime configuration, resolved once at process start and passed by
/// reference into each component. A missing required value fails here,
/// not on first use.
#[derive(Debug, Clone)]
pub struct Config {
    /// Post-by-email address of the blog gateway.
    pub post_email: String,
    /// Sender account used for SMTP login.
    pub sender_email: String,
    pub sender_password: String,
    /// Bearer token for the generation backends.
    pub api_token: String,
    pub smtp_host: String,
    pub inference_base_url: String,
    pub sources: Vec<Source>,
    /// Generation backends in order of preference.
    pub models: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            post_email: require("WP_POST_EMAIL")?,
            sender_email: require("GMAIL_USER")?,
            sender_password: require("GMAIL_APP_PASSWORD")?,
            api_token: require("HF_API_TOKEN")?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            inference_base_url: DEFAULT_INFERENCE_BASE_URL.to_string(),
            sources: default_sources(),
            models: default_models(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for source in &self.sources {
            Url::parse(source.url.trim())?;
        }
        if self.models.is_empty() {
            return Err(PipelineError::General(
                "no generation backends configured".to_string(),
            ));
        }
        Ok(())
    }
}

fn require(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PipelineError::MissingConfig { name }),
    }
}

fn default_sources() -> Vec<Source> {
    [
        "https://www.reddit.com/r/GeminiAI/top/.rss?limit=5&t=week",
        "https://www.reddit.com/r/OpenAI/top/.rss?limit=5&t=week",
        "https://www.reddit.com/r/ClaudeAI/top/.rss?limit=5&t=week",
        "https://www.reddit.com/r/DeepSeek/top/.rss?limit=5&t=week",
        "https://www.reddit.com/r/Qwen_AI/top/.rss?limit=5&t=week",
        "https://techcrunch.com/feed/",
    ]
    .into_iter()
    .map(|url| Source::new(url, DEFAULT_MAX_ENTRIES))
    .collect()
}

fn default_models() -> Vec<String> {
    [
        "Qwen/Qwen2.5-0.5B-Instruct",
        "TinyLlama/TinyLlama-1.1B-Chat-v1.0",
        "google/gemma-2b-it",
        "microsoft/phi-2",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
