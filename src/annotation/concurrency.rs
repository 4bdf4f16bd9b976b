/*!
 * Provider-specific concurrency tuning.
 *
 * Paragraphs are independent, so the engine annotates several at once.
 * How many is worth running depends on the provider: an in-memory table
 * never suspends, while a remote model server is bounded by its own
 * parallelism.
 */

use crate::app_config::LexiconProviderKind;

/// Provider-specific concurrency profile with tuned defaults
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Maximum paragraphs annotated concurrently
    pub max_concurrent_paragraphs: usize,
}

impl ProviderProfile {
    /// Get the optimal profile for a given provider
    pub fn for_provider(provider: LexiconProviderKind) -> Self {
        match provider {
            LexiconProviderKind::Table => Self {
                max_concurrent_paragraphs: 16,
            },
            LexiconProviderKind::Mock => Self {
                max_concurrent_paragraphs: 8,
            },
            LexiconProviderKind::Ollama => Self {
                // A local model server handles few generations at once
                max_concurrent_paragraphs: 4,
            },
        }
    }

    /// Get effective concurrency, respecting any user override
    pub fn effective_concurrent_paragraphs(&self, user_override: Option<usize>) -> usize {
        user_override.unwrap_or(self.max_concurrent_paragraphs).max(1)
    }
}
