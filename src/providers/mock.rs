/*!
 * Mock lexicon provider for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockLexicon::working()` - Always succeeds
 * - `MockLexicon::fail_on(..)` - Fails only for the listed units
 * - `MockLexicon::failing()` - Always fails with a server error
 * - `MockLexicon::unreachable()` - Always fails with a connection error
 * - `MockLexicon::unparseable()` - Always answers with a reply it cannot parse
 *
 * Units found in the backing table resolve to the table entry; any other
 * unit resolves to a synthetic `pinyin(x)` / `gloss(x)` entry so tests do
 * not need a full dictionary.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::table::TableLexicon;
use crate::providers::{LexiconEntry, LexiconProvider};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails with a server error for the listed units only
    FailOn(Vec<String>),
    /// Fails intermittently (every Nth lookup)
    Intermittent { fail_every: usize },
    /// Always fails with a server error
    Failing,
    /// Always fails with a connection error
    Unreachable,
    /// Always fails with a parse error
    Unparseable,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
    /// Succeeds, but the listed units are delayed
    SlowOn { units: Vec<String>, delay_ms: u64 },
}

/// Mock provider for testing annotation behavior
#[derive(Debug)]
pub struct MockLexicon {
    behavior: MockBehavior,
    table: TableLexicon,
    /// Lookup counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Batch call counter, shared between clones
    batch_count: Arc<AtomicUsize>,
}

impl MockLexicon {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            table: TableLexicon::default(),
            request_count: Arc::new(AtomicUsize::new(0)),
            batch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that fails for the given units only
    pub fn fail_on<'a>(units: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(MockBehavior::FailOn(units.into_iter().map(str::to_string).collect()))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider that can never be reached
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Create a mock provider whose replies can never be parsed
    pub fn unparseable() -> Self {
        Self::new(MockBehavior::Unparseable)
    }

    /// Create a mock provider that delays the listed units
    pub fn slow_on<'a>(units: impl IntoIterator<Item = &'a str>, delay_ms: u64) -> Self {
        Self::new(MockBehavior::SlowOn {
            units: units.into_iter().map(str::to_string).collect(),
            delay_ms,
        })
    }

    /// Answer from the given table instead of synthetic entries where possible
    pub fn with_table(mut self, table: TableLexicon) -> Self {
        self.table = table;
        self
    }

    /// Number of single-unit lookups served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of batch calls served so far
    pub fn batch_count(&self) -> usize {
        self.batch_count.load(Ordering::SeqCst)
    }

    /// Entry returned on success
    fn entry_for(&self, unit: &str) -> LexiconEntry {
        self.table
            .get(unit)
            .cloned()
            .unwrap_or_else(|| LexiconEntry::new(format!("pinyin({})", unit), format!("gloss({})", unit)))
    }
}

impl Clone for MockLexicon {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            table: self.table.clone(),
            request_count: Arc::clone(&self.request_count),
            batch_count: Arc::clone(&self.batch_count),
        }
    }
}

#[async_trait]
impl LexiconProvider for MockLexicon {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(self.entry_for(unit)),

            MockBehavior::FailOn(units) => {
                if units.iter().any(|u| u == unit) {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("Simulated failure for '{}'", unit),
                    })
                } else {
                    Ok(self.entry_for(unit))
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                let fail_every = (*fail_every).max(1);
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    Ok(self.entry_for(unit))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "Simulated connection refused".to_string(),
            )),

            MockBehavior::Unparseable => Err(ProviderError::ParseError(
                "Simulated reply without JSON".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(self.entry_for(unit))
            }

            MockBehavior::SlowOn { units, delay_ms } => {
                if units.iter().any(|u| u == unit) {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                }
                Ok(self.entry_for(unit))
            }
        }
    }

    async fn lookup_batch(&self, units: &[String]) -> Vec<Result<LexiconEntry, ProviderError>> {
        self.batch_count.fetch_add(1, Ordering::SeqCst);
        let mut results = Vec::with_capacity(units.len());
        for unit in units {
            results.push(self.lookup(unit).await);
        }
        results
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "Simulated connection refused".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
