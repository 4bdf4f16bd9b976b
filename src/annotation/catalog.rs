/*!
 * Idiom catalog.
 *
 * An ordered, de-duplicated list of idioms. Declaration order matters: it is
 * the last tie-break when the matcher resolves overlapping candidates.
 */

use std::path::Path;

use crate::errors::CatalogError;

static BUILTIN_CATALOG: &str = include_str!("../../data/chengyu.txt");

/// One catalog idiom with its characters pre-split for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub idiom: String,
    pub chars: Vec<char>,
}

/// Ordered set of known idioms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdiomCatalog {
    entries: Vec<CatalogEntry>,
}

impl IdiomCatalog {
    /// Build a catalog from idioms in declaration order.
    ///
    /// Entries are trimmed; duplicates keep their first position. An entry
    /// that is empty after trimming is rejected.
    pub fn new<I, S>(idioms: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for (position, idiom) in idioms.into_iter().enumerate() {
            let idiom = idiom.as_ref().trim();
            if idiom.is_empty() {
                return Err(CatalogError::EmptyIdiom { position });
            }
            catalog.push(idiom);
        }
        Ok(catalog)
    }

    /// Parse a catalog with one idiom per line; blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Self {
        let mut catalog = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            catalog.push(line);
        }
        catalog
    }

    /// Load a catalog file in the `from_text` format.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_text(BUILTIN_CATALOG)
    }

    /// Append idioms after the existing entries.
    pub fn extend<I, S>(&mut self, idioms: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let offset = self.entries.len();
        for (position, idiom) in idioms.into_iter().enumerate() {
            let idiom = idiom.as_ref().trim();
            if idiom.is_empty() {
                return Err(CatalogError::EmptyIdiom { position: offset + position });
            }
            self.push(idiom);
        }
        Ok(())
    }

    fn push(&mut self, idiom: &str) {
        if self.contains(idiom) {
            return;
        }
        self.entries.push(CatalogEntry {
            idiom: idiom.to_string(),
            chars: idiom.chars().collect(),
        });
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Idioms in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.idiom.as_str())
    }

    pub fn contains(&self, idiom: &str) -> bool {
        self.entries.iter().any(|e| e.idiom == idiom)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
