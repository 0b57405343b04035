use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
// Generous bound; large prompts against slow models take a while.
const MODEL_TIMEOUT: Duration = Duration::from_secs(300);

// Deterministic generation settings. Extraction must yield the same JSON
// for the same page content.
const TEMPERATURE: f32 = 0.0;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 64;
const MAX_OUTPUT_TOKENS: u32 = 500;
const RESPONSE_MIME_TYPE: &str = "application/json";

/// Errors surfaced by structured extraction, from the model call itself
/// through parsing its answer.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("model call failed: {0}")]
    Api(String),
    #[error("model returned no text")]
    EmptyResponse,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Opaque text-completion capability: prompt in, JSON text out.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<String, ExtractionError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .timeout(MODEL_TIMEOUT)
            .build()?;

        Ok(GeminiClient {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn request_body<'a>(prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String, ExtractionError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_ENDPOINT, self.model, self.api_key
        );

        debug!("Calling {} with a {}-char prompt", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| ExtractionError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Api(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ExtractionError::EmptyResponse)
    }
}
