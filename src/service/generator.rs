//! Text-generation adapter
//!
//! Wraps the local inference runtime behind a uniform prompt-in, text-out
//! interface so the assist services stay independent of how the pretrained
//! model is actually served.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ModelConfig;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Model runtime is not available: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse runtime response: {0}")]
    ParseError(String),

    #[error("Invalid runtime base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Sampling parameters for a generation call
///
/// Each endpoint defines its own constant set of these; they are never
/// derived from user input except for `max_length` on `/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub max_length: u32,
    pub num_return_sequences: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub do_sample: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_length: 200,
            num_return_sequences: 1,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.3,
            no_repeat_ngram_size: 3,
            do_sample: true,
        }
    }
}

/// Uniform interface to the pretrained text-generation model
///
/// Implementations return one generated candidate per requested sequence,
/// in order, or an error when the runtime cannot be reached.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Vec<String>, GeneratorError>;

    fn model_name(&self) -> &str;
}

/// Lifecycle of the shared model handle
///
/// Built once at startup and injected into handlers; there is no global
/// mutable model state.
#[derive(Clone)]
pub enum ModelState {
    /// Runtime probe succeeded, generation calls may be attempted
    Ready(Arc<dyn TextGenerator>),
    /// Runtime probe failed at startup; all endpoints degrade to fallback
    Failed(String),
    /// Adapter disabled by configuration
    Disabled,
}

impl ModelState {
    pub fn generator(&self) -> Option<&Arc<dyn TextGenerator>> {
        match self {
            ModelState::Ready(generator) => Some(generator),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    pub fn model_name(&self) -> Option<&str> {
        self.generator().map(|g| g.model_name())
    }
}

/// Request body for the runtime's generate endpoint
#[derive(Debug, Serialize)]
struct RuntimeRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: RuntimeOptions,
}

/// Sampling knobs understood by the runtime
///
/// The runtime exposes no n-gram blocking parameter, so
/// `no_repeat_ngram_size` is approximated by the repeat-penalty window.
#[derive(Debug, Serialize)]
struct RuntimeOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    repeat_last_n: u32,
}

#[derive(Debug, Deserialize)]
struct RuntimeResponse {
    response: String,
}

/// Client for a local Ollama-compatible inference runtime
pub struct RuntimeClient {
    client: Client,
    base_url: String,
    model: String,
}

impl RuntimeClient {
    /// Create a new runtime client from configuration
    pub fn new(config: &ModelConfig) -> Result<Self, GeneratorError> {
        let base = Url::parse(&config.runtime_url)
            .map_err(|e| GeneratorError::InvalidBaseUrl(format!("{}: {}", config.runtime_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            model: config.model_name.clone(),
        })
    }

    /// Check that the runtime answers before declaring the adapter ready
    pub async fn probe(&self) -> Result<(), GeneratorError> {
        let url = format!("{}/api/tags", self.base_url);

        tracing::debug!(url = %url, "Probing model runtime");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeneratorError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::Unavailable(format!(
                "Runtime probe returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn generate_one(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, GeneratorError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = RuntimeRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: RuntimeOptions {
                num_predict: options.max_length,
                // Greedy decoding when sampling is off
                temperature: if options.do_sample {
                    options.temperature
                } else {
                    0.0
                },
                top_p: options.top_p,
                repeat_penalty: options.repetition_penalty,
                repeat_last_n: options.no_repeat_ngram_size.max(1) * 16,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let parsed: RuntimeResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::ParseError(e.to_string()))?;

        Ok(parsed.response)
    }
}

#[async_trait]
impl TextGenerator for RuntimeClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Vec<String>, GeneratorError> {
        // The runtime yields one candidate per call; sequential calls
        // realize num_return_sequences.
        let sequences = options.num_return_sequences.max(1);
        let mut candidates = Vec::with_capacity(sequences as usize);

        for sequence in 0..sequences {
            tracing::debug!(
                sequence = sequence,
                prompt_len = prompt.len(),
                max_length = options.max_length,
                "Requesting generation from runtime"
            );
            candidates.push(self.generate_one(prompt, options).await?);
        }

        Ok(candidates)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
