use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::annotation::concurrency::ProviderProfile;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Lexicon provider config
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Idiom catalog config
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Lexicon provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LexiconProviderKind {
    // @provider: In-memory JSON dictionary
    #[default]
    Table,
    // @provider: Synthetic entries, for demos and tests
    Mock,
    // @provider: Ollama
    Ollama,
}

impl LexiconProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Table => "Dictionary table",
            Self::Mock => "Mock",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Table => "table".to_string(),
            Self::Mock => "mock".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for LexiconProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for LexiconProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "mock" => Ok(Self::Mock),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Lexicon provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LexiconConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: LexiconProviderKind,

    /// Dictionary file for the table provider; the bundled dictionary is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<String>,

    /// Ollama settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model name (e.g., "qwen2.5:7b")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Idiom catalog configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Catalog file, one idiom per line; the bundled catalog is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Idioms appended after the catalog file's entries
    #[serde(default)]
    pub extra_idioms: Vec<String>,
}

/// Engine tuning
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Maximum paragraphs annotated at once; the provider profile decides when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_paragraphs: Option<usize>,

    /// Whether repeated units are looked up once per call
    #[serde(default = "default_true")]
    pub cache_lookups: bool,

    /// Pinyin used when a lookup fails
    #[serde(default = "default_placeholder")]
    pub placeholder_pinyin: String,

    /// Translation used when a lookup fails
    #[serde(default = "default_placeholder")]
    pub placeholder_translation: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_paragraphs: None,
            cache_lookups: true,
            placeholder_pinyin: default_placeholder(),
            placeholder_translation: default_placeholder(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "?".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5:7b".to_string()
}

/// Upper bound for `OllamaConfig::retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

impl Config {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_concurrent_paragraphs == Some(0) {
            return Err(anyhow!("engine.max_concurrent_paragraphs must be at least 1"));
        }

        if self.lexicon.provider == LexiconProviderKind::Ollama {
            let ollama = &self.lexicon.ollama;
            Url::parse(&ollama.endpoint)
                .with_context(|| format!("Invalid Ollama endpoint: {}", ollama.endpoint))?;
            if ollama.model.trim().is_empty() {
                return Err(anyhow!("A model name is required for the Ollama provider"));
            }
            if ollama.retry_count > MAX_RETRY_COUNT {
                return Err(anyhow!(
                    "lexicon.ollama.retry_count must be at most {} (got {})",
                    MAX_RETRY_COUNT,
                    ollama.retry_count
                ));
            }
        }

        Ok(())
    }

    /// Effective paragraph concurrency for the configured provider
    pub fn max_concurrent_paragraphs(&self) -> usize {
        ProviderProfile::for_provider(self.lexicon.provider)
            .effective_concurrent_paragraphs(self.engine.max_concurrent_paragraphs)
    }
}
