use crate::types::{Digest, GeneratedArticle, PipelineError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_NEW_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.7;
/// Per-attempt deadline; a slow backend counts as failed for that attempt only.
const GENERATION_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedPayload {
    generated_text: String,
}

/// Backends answer either with a bare object or with a list whose first
/// element holds the text; both normalize to the same extraction path.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<GeneratedPayload>),
    One(GeneratedPayload),
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            GenerationResponse::One(payload) => Some(payload.generated_text),
            GenerationResponse::Many(list) => list.into_iter().next().map(|p| p.generated_text),
        }
    }
}

/// Outcome of a single backend attempt. Transient and failed attempts both
/// advance the chain; they differ only in what gets logged.
enum Attempt {
    Success(String),
    Transient(u16),
    Failed(String),
}

/// Submits the digest to a prioritized chain of generation backends,
/// stopping at the first success.
pub struct Summarizer {
    client: Client,
    base_url: String,
    api_token: String,
    models: Vec<String>,
}

impl Summarizer {
    pub fn new(base_url: String, api_token: String, models: Vec<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token,
            models,
        })
    }

    /// Tries each backend in preference order. The only failure this
    /// reports is an exhausted chain, carrying the last observed status.
    pub async fn generate_summary(&self, digest: &Digest) -> Result<GeneratedArticle> {
        let prompt = build_prompt(&digest.text);
        let mut last_status = "no backends attempted".to_string();

        for model in &self.models {
            debug!("trying model: {}", model);
            match self.attempt(model, &prompt).await {
                Attempt::Success(text) => {
                    info!("model working: {}", model);
                    return Ok(GeneratedArticle {
                        raw: text,
                        model: model.clone(),
                    });
                }
                Attempt::Transient(status) => {
                    warn!("model {} unavailable (HTTP {}), trying next", model, status);
                    last_status = format!("HTTP {}", status);
                }
                Attempt::Failed(reason) => {
                    warn!("model {} failed ({}), trying next", model, reason);
                    last_status = reason;
                }
            }
        }

        Err(PipelineError::BackendsExhausted { last_status })
    }

    async fn attempt(&self, model: &str, prompt: &str) -> Attempt {
        let url = format!("{}/{}", self.base_url, model);
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                return_full_text: false,
            },
        };

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Failed(e.to_string()),
        };

        let status = response.status();
        // 503 = model still loading, 410 = model gone; both mean "try next".
        if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::GONE {
            return Attempt::Transient(status.as_u16());
        }
        if !status.is_success() {
            return Attempt::Failed(format!("HTTP {}", status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Failed(e.to_string()),
        };

        match serde_json::from_str::<GenerationResponse>(&body) {
            Ok(parsed) => match parsed.into_text() {
                Some(text) => Attempt::Success(text),
                None => Attempt::Failed("empty generation response".to_string()),
            },
            Err(e) => Attempt::Failed(format!("malformed generation response: {}", e)),
        }
    }
}

/// Fixed instruction prompt embedding the digest verbatim.
pub fn build_prompt(digest: &str) -> String {
    format!(
        "You are an expert editor for a niche AI blog.\n\
         Summarize the following news items into a coherent, engaging 500-word article.\n\
         \n\
         FORMAT REQUIREMENTS:\n\
         1. The first line must be the Title only.\n\
         2. The rest of the text is the body.\n\
         3. Include an Affiliate Disclosure at the very bottom.\n\
         4. Do not use Markdown headers (###) for the title, just plain text.\n\
         \n\
         News Items:\n\
         {digest}"
    )
}
