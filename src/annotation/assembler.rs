/*!
 * Token assembly.
 *
 * The assembler resolves every distinct character of a paragraph through the
 * lexicon provider (one batch per paragraph), then walks the paragraph by
 * character index and emits exactly one token per character. Output order
 * comes from that index walk alone, so repeated characters keep their
 * positions and the token texts always concatenate back to the paragraph.
 *
 * The annotation unit is the character, also inside idioms: an idiom span
 * produces one token per character, each tagged with the idiom group.
 * There is no word segmentation beyond idiom matching.
 */

use log::warn;
use std::collections::HashMap;

use crate::annotation::document::{IdiomGroup, IdiomPosition, IdiomSpan, Token};
use crate::errors::ProviderError;
use crate::providers::{LexiconEntry, LexiconProvider};

/// Lookup outcome counters for one or more paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Distinct units looked up
    pub lookups: usize,
    /// Lookups that failed
    pub failures: usize,
    /// Failures other than a missing entry
    pub unavailable: usize,
    /// Message of the first failure
    pub first_error: Option<String>,
}

impl LookupStats {
    /// Fold another set of counters into this one
    pub fn merge(&mut self, other: &LookupStats) {
        self.lookups += other.lookups;
        self.failures += other.failures;
        self.unavailable += other.unavailable;
        if self.first_error.is_none() {
            self.first_error = other.first_error.clone();
        }
    }

    /// Whether every lookup failed for a reason other than a missing entry
    pub fn provider_unavailable(&self) -> bool {
        self.lookups > 0 && self.unavailable == self.lookups
    }

    fn record(&mut self, result: &Result<LexiconEntry, ProviderError>) {
        self.lookups += 1;
        if let Err(error) = result {
            self.failures += 1;
            if error.is_unavailable() {
                self.unavailable += 1;
            }
            if self.first_error.is_none() {
                self.first_error = Some(error.to_string());
            }
        }
    }
}

/// Tokens of one paragraph plus the lookup counters that produced them
#[derive(Debug, Clone)]
pub struct AssembledParagraph {
    pub tokens: Vec<Token>,
    pub stats: LookupStats,
}

/// Builds token sequences from paragraph text, idiom spans and a lexicon
#[derive(Debug, Clone)]
pub struct Assembler {
    placeholder: LexiconEntry,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(LexiconEntry::new("?", "?"))
    }
}

impl Assembler {
    /// Create an assembler substituting `placeholder` for failed lookups
    pub fn new(placeholder: LexiconEntry) -> Self {
        Self { placeholder }
    }

    pub fn placeholder(&self) -> &LexiconEntry {
        &self.placeholder
    }

    /// Annotate one paragraph.
    ///
    /// `spans` must be the matcher's output for `text`: sorted by start and
    /// non-overlapping.
    pub async fn assemble(
        &self,
        text: &str,
        spans: &[IdiomSpan],
        lexicon: &dyn LexiconProvider,
    ) -> AssembledParagraph {
        let chars: Vec<char> = text.chars().collect();

        let mut units: Vec<String> = Vec::new();
        let mut seen: HashMap<char, usize> = HashMap::new();
        for &c in &chars {
            if !seen.contains_key(&c) {
                seen.insert(c, units.len());
                units.push(c.to_string());
            }
        }

        let results = lexicon.lookup_batch(&units).await;

        let mut stats = LookupStats::default();
        let mut resolved: HashMap<char, Result<LexiconEntry, ProviderError>> = HashMap::with_capacity(units.len());
        for (unit, result) in units.iter().zip(results) {
            stats.record(&result);
            if let Err(error) = &result {
                warn!("Using placeholder for '{}': {}", unit, error);
            }
            if let Some(c) = unit.chars().next() {
                resolved.insert(c, result);
            }
        }

        AssembledParagraph {
            tokens: self.build_tokens(&chars, spans, &resolved),
            stats,
        }
    }

    /// Single ordered pass over character indices.
    pub fn build_tokens(
        &self,
        chars: &[char],
        spans: &[IdiomSpan],
        resolved: &HashMap<char, Result<LexiconEntry, ProviderError>>,
    ) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(chars.len());
        let mut pending = spans.iter().enumerate().peekable();
        let mut index = 0;

        while index < chars.len() {
            // Drop spans that cannot apply here
            while pending
                .next_if(|(_, span)| span.start < index || span.end() > chars.len() || span.length == 0)
                .is_some()
            {}

            let next_span = pending.peek().copied();
            match next_span {
                Some((id, span)) if span.start == index => {
                    for offset in 0..span.length {
                        let group = IdiomGroup {
                            id,
                            idiom: span.idiom.clone(),
                            position: IdiomPosition::at(offset, span.length),
                            offset,
                        };
                        tokens.push(self.token(chars[index + offset], Some(group), resolved));
                    }
                    index += span.length;
                    pending.next();
                }
                _ => {
                    tokens.push(self.token(chars[index], None, resolved));
                    index += 1;
                }
            }
        }

        tokens
    }

    fn token(
        &self,
        c: char,
        idiom_group: Option<IdiomGroup>,
        resolved: &HashMap<char, Result<LexiconEntry, ProviderError>>,
    ) -> Token {
        let (entry, fallback) = match resolved.get(&c) {
            Some(Ok(entry)) => (entry.clone(), false),
            _ => (self.placeholder.clone(), true),
        };

        Token {
            text: c.to_string(),
            pinyin: entry.pinyin,
            translation: entry.translation,
            idiom_group,
            fallback,
        }
    }
}
