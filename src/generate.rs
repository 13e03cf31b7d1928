//! Generation client: one call to the remote text-generation endpoint.
//!
//! We only hit the generate endpoint with a fixed-template prompt and use the
//! first returned generation as raw text. Calls are instrumented and log the
//! model, latency, and response size (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::{GenerationConfig, Prompts};
use crate::error::GenerateError;
use crate::util::{fill_template, trunc_for_log};

/// Boundary trait so the orchestrator can be exercised without the network.
#[async_trait]
pub trait GenerationClient: Send + Sync {
  /// Request raw exercise text for a (non-empty, pre-trimmed) topic.
  /// No retry happens at this layer.
  async fn generate_raw(&self, topic: &str) -> Result<String, GenerateError>;
}

#[derive(Clone)]
pub struct CohereClient {
  client: reqwest::Client,
  cfg: GenerationConfig,
  prompts: Prompts,
}

impl CohereClient {
  /// The reqwest client is shared process-wide and injected, never rebuilt
  /// per call site.
  pub fn new(client: reqwest::Client, cfg: GenerationConfig, prompts: Prompts) -> Self {
    Self { client, cfg, prompts }
  }

  fn build_prompt(&self, topic: &str) -> String {
    fill_template(&self.prompts.generation_template, &[("subject", topic)])
  }
}

#[async_trait]
impl GenerationClient for CohereClient {
  #[instrument(level = "info", skip(self), fields(model = %self.cfg.model, topic_len = topic.len()))]
  async fn generate_raw(&self, topic: &str) -> Result<String, GenerateError> {
    let req = GenerateRequest {
      model: self.cfg.model.clone(),
      prompt: self.build_prompt(topic),
      max_tokens: self.cfg.max_tokens,
      temperature: self.cfg.temperature,
      p: self.cfg.top_p,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&self.cfg.endpoint_url)
      .header(USER_AGENT, "exogen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.cfg.credential))
      .json(&req).send().await
      .map_err(|e| GenerateError::Network(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let detail = extract_api_error(&body).unwrap_or(body);
      error!(target: "generation", %status, detail = %trunc_for_log(&detail, 200), "Generation endpoint returned an error");
      return Err(match status.as_u16() {
        401 | 403 => GenerateError::Auth,
        429 => GenerateError::RateLimited,
        code => GenerateError::UnexpectedResponse { status: Some(code), detail },
      });
    }

    let body: GenerateResponse = res.json().await.map_err(|e| {
      GenerateError::UnexpectedResponse { status: Some(status.as_u16()), detail: e.to_string() }
    })?;
    let text = body.generations.into_iter().next().map(|g| g.text).unwrap_or_default();

    info!(
      target: "generation",
      elapsed = ?start.elapsed(),
      text_len = text.len(),
      "Generation response received"
    );
    Ok(text)
  }
}

// --- Generate DTOs ---

#[derive(Serialize)]
struct GenerateRequest {
  model: String,
  prompt: String,
  max_tokens: u32,
  temperature: f32,
  p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
  generations: Vec<Generation>,
}
#[derive(Deserialize)]
struct Generation {
  text: String,
}

/// Try to extract a clean error message from the endpoint's error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.message),
    Err(_) => None,
  }
}
