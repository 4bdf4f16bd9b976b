/*!
 * Test-only lexicon providers
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hanzi_annotator::errors::ProviderError;
use hanzi_annotator::providers::{LexiconEntry, LexiconProvider};

/// Minimal provider: only implements single-unit lookup, answers
/// `(unit, "pin-" + unit)` and records every unit it was asked for.
#[derive(Debug, Default, Clone)]
pub struct RecordingLexicon {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl LexiconProvider for RecordingLexicon {
    fn name(&self) -> &str {
        "recording"
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        self.seen.lock().push(unit.to_string());
        Ok(LexiconEntry::new(format!("pin-{}", unit), format!("def-{}", unit)))
    }
}

/// Provider with per-unit delays, used to make paragraphs finish out of order
#[derive(Debug, Default, Clone)]
pub struct DelayedLexicon {
    delays_ms: HashMap<String, u64>,
}

impl DelayedLexicon {
    pub fn new(delays: &[(&str, u64)]) -> Self {
        Self {
            delays_ms: delays.iter().map(|(u, d)| (u.to_string(), *d)).collect(),
        }
    }
}

#[async_trait]
impl LexiconProvider for DelayedLexicon {
    fn name(&self) -> &str {
        "delayed"
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        if let Some(delay) = self.delays_ms.get(unit) {
            tokio::time::sleep(Duration::from_millis(*delay)).await;
        }
        Ok(LexiconEntry::new(unit, unit))
    }
}
