/*!
 * Lookup caching.
 *
 * `LexiconCache` stores successful lookups keyed by unit so repeated
 * characters are only sent to the underlying provider once.
 * `CachedLexicon` wraps any provider with such a cache. The engine creates
 * one per `annotate` call, so no cached state is shared between calls.
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{LexiconEntry, LexiconProvider};

/// Lookup cache for storing and retrieving lexicon entries
#[derive(Debug)]
pub struct LexiconCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<String, LexiconEntry>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl LexiconCache {
    /// Create a new lookup cache
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Get an entry from the cache
    pub fn get(&self, unit: &str) -> Option<LexiconEntry> {
        let cache = self.cache.read();

        match cache.get(unit) {
            Some(entry) => {
                *self.hits.write() += 1;
                debug!("Cache hit for '{}'", unit);
                Some(entry.clone())
            }
            None => {
                *self.misses.write() += 1;
                None
            }
        }
    }

    /// Store an entry in the cache
    pub fn store(&self, unit: &str, entry: &LexiconEntry) {
        self.cache.write().insert(unit.to_string(), entry.clone());
    }

    /// Get cache statistics as `(hits, misses, hit_rate)`
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Lexicon cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for LexiconCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LexiconCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}

/// Provider decorator that answers repeated units from a `LexiconCache`
#[derive(Debug, Clone)]
pub struct CachedLexicon {
    inner: Arc<dyn LexiconProvider>,
    cache: LexiconCache,
}

impl CachedLexicon {
    /// Wrap a provider with a fresh cache
    pub fn new(inner: Arc<dyn LexiconProvider>) -> Self {
        Self {
            inner,
            cache: LexiconCache::new(),
        }
    }

    /// The cache backing this provider
    pub fn cache(&self) -> &LexiconCache {
        &self.cache
    }
}

#[async_trait]
impl LexiconProvider for CachedLexicon {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        if let Some(entry) = self.cache.get(unit) {
            return Ok(entry);
        }

        let entry = self.inner.lookup(unit).await?;
        self.cache.store(unit, &entry);
        Ok(entry)
    }

    async fn lookup_batch(&self, units: &[String]) -> Vec<Result<LexiconEntry, ProviderError>> {
        let mut results: Vec<Option<Result<LexiconEntry, ProviderError>>> =
            units.iter().map(|unit| self.cache.get(unit).map(Ok)).collect();

        let missing: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, result)| result.is_none())
            .map(|(idx, _)| idx)
            .collect();

        if !missing.is_empty() {
            let pending: Vec<String> = missing.iter().map(|&idx| units[idx].clone()).collect();
            let fetched = self.inner.lookup_batch(&pending).await;

            for (idx, result) in missing.into_iter().zip(fetched) {
                if let Ok(entry) = &result {
                    self.cache.store(&units[idx], entry);
                }
                results[idx] = Some(result);
            }
        }

        results
            .into_iter()
            .enumerate()
            .map(|(idx, result)| {
                result.unwrap_or_else(|| {
                    Err(ProviderError::ParseError(format!(
                        "Provider returned no result for '{}'",
                        units[idx]
                    )))
                })
            })
            .collect()
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.inner.test_connection().await
    }
}
