/*!
 * Remote lexicon provider backed by an Ollama server.
 *
 * Each paragraph's distinct characters are sent in one `/api/generate`
 * request with `format: "json"`; the model answers with an object mapping
 * every character to `{ "pinyin": ..., "translation": ... }`. Characters
 * missing from the answer fail individually.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::app_config::OllamaConfig;
use crate::errors::ProviderError;
use crate::providers::{LexiconEntry, LexiconProvider};

const SYSTEM_PROMPT: &str = "You are a Chinese dictionary. For every character you are given, \
reply with its Hanyu Pinyin (with tone marks) and a short English gloss. \
Answer with a single JSON object whose keys are the characters and whose values are \
objects with the fields \"pinyin\" and \"translation\". Do not add any other text.";

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Format to return a response in
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            format: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }

    /// Set the format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Ollama-backed lexicon provider
#[derive(Debug)]
pub struct OllamaLexicon {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model used for lookups
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl OllamaLexicon {
    /// Create a new provider from its configuration
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                // Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    /// Build the prompt listing the requested units
    fn build_prompt(units: &[String]) -> String {
        let listed = units
            .iter()
            .map(|unit| format!("\"{}\"", unit))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Characters: [{}]", listed)
    }

    /// Generate text from the Ollama API with retry logic
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .text()
                            .await
                            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
                        return serde_json::from_str::<GenerationResponse>(&body)
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    let error = ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message,
                    };

                    if !status.is_server_error() {
                        // Client error - don't retry
                        error!("Ollama API error: {}", error);
                        return Err(error);
                    }

                    error!("Ollama API error: {} - attempt {}/{}", error, attempt + 1, self.max_retries + 1);
                    last_error = Some(error);
                }
                Err(e) => {
                    let error = if e.is_timeout() {
                        ProviderError::Timeout(e.to_string())
                    } else if e.is_connect() {
                        ProviderError::ConnectionError(e.to_string())
                    } else {
                        ProviderError::RequestFailed(e.to_string())
                    };
                    error!("Ollama API network error: {} - attempt {}/{}", error, attempt + 1, self.max_retries + 1);
                    last_error = Some(error);
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                tokio::time::sleep(backoff_delay(self.backoff_base_ms, attempt)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

/// Delay before retry number `attempt` (1-based): `base_ms * 2^(attempt - 1)`, saturating
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Split the model's JSON answer into one result per requested unit
pub fn parse_entries(units: &[String], response: &str) -> Vec<Result<LexiconEntry, ProviderError>> {
    let parsed: HashMap<String, LexiconEntry> = match serde_json::from_str(response.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            let error = ProviderError::ParseError(e.to_string());
            return units.iter().map(|_| Err(error.clone())).collect();
        }
    };

    units
        .iter()
        .map(|unit| {
            parsed
                .get(unit)
                .cloned()
                .ok_or_else(|| ProviderError::NotFound(unit.clone()))
        })
        .collect()
}

#[async_trait]
impl LexiconProvider for OllamaLexicon {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        let units = [unit.to_string()];
        self.lookup_batch(&units)
            .await
            .pop()
            .unwrap_or_else(|| Err(ProviderError::NotFound(unit.to_string())))
    }

    async fn lookup_batch(&self, units: &[String]) -> Vec<Result<LexiconEntry, ProviderError>> {
        if units.is_empty() {
            return Vec::new();
        }

        let request = GenerationRequest::new(&self.model, Self::build_prompt(units))
            .system(SYSTEM_PROMPT)
            .temperature(self.temperature)
            .format("json");

        debug!("Requesting {} lexicon entries from Ollama model {}", units.len(), self.model);

        match self.generate(&request).await {
            Ok(response) => parse_entries(units, &response.response),
            Err(error) => units.iter().map(|_| Err(error.clone())).collect(),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Ollama version check failed".to_string(),
            })
        }
    }
}
