/*!
 * Lexicon provider implementations.
 *
 * A lexicon provider resolves a unit of text (a single character, or a span
 * when the provider supports it) to its pinyin and gloss. The engine only
 * talks to the `LexiconProvider` trait, so providers can be swapped freely:
 * - `table`: In-memory dictionary loaded from JSON
 * - `mock`: Behaviour-scripted provider for tests
 * - `ollama`: Remote lookups answered by a local Ollama server
 * - `cached`: Read-through cache decorator around any provider
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use crate::app_config::{LexiconConfig, LexiconProviderKind};
use crate::errors::ProviderError;

/// Pronunciation and gloss for one lexicon unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Romanized pronunciation
    pub pinyin: String,
    /// Short gloss
    pub translation: String,
}

impl LexiconEntry {
    /// Create a new entry
    pub fn new(pinyin: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            pinyin: pinyin.into(),
            translation: translation.into(),
        }
    }
}

/// Common trait for all lexicon providers
///
/// Synchronous providers implement the async methods without ever
/// suspending, so the engine runs one pipeline regardless of the
/// provider's nature.
#[async_trait]
pub trait LexiconProvider: Send + Sync + Debug {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Resolve a single unit
    ///
    /// # Arguments
    /// * `unit` - The character or span to resolve
    ///
    /// # Returns
    /// * `Result<LexiconEntry, ProviderError>` - The entry or the reason it is unavailable
    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError>;

    /// Resolve several units at once
    ///
    /// The returned vector has the same length and order as `units`.
    /// Providers with a bulk endpoint override this; the default performs
    /// one lookup per unit.
    async fn lookup_batch(&self, units: &[String]) -> Vec<Result<LexiconEntry, ProviderError>> {
        let mut results = Vec::with_capacity(units.len());
        for unit in units {
            results.push(self.lookup(unit).await);
        }
        results
    }

    /// Test that the provider can answer lookups at all
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Build the provider selected in the configuration
pub fn from_config(config: &LexiconConfig) -> Result<Arc<dyn LexiconProvider>> {
    debug!("Creating {} lexicon provider", config.provider.display_name());

    let provider: Arc<dyn LexiconProvider> = match config.provider {
        LexiconProviderKind::Table => match &config.dictionary_path {
            Some(path) => Arc::new(TableLexicon::from_file(Path::new(path))?),
            None => Arc::new(TableLexicon::builtin()),
        },
        LexiconProviderKind::Mock => Arc::new(MockLexicon::working().with_table(TableLexicon::builtin())),
        LexiconProviderKind::Ollama => Arc::new(OllamaLexicon::new(&config.ollama)),
    };

    Ok(provider)
}

pub mod cached;
pub mod mock;
pub mod ollama;
pub mod table;

pub use cached::CachedLexicon;
pub use mock::{MockBehavior, MockLexicon};
pub use ollama::OllamaLexicon;
pub use table::TableLexicon;
