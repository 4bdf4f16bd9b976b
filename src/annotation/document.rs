/*!
 * Annotated document model.
 *
 * These types are the engine's output. They serialise to the JSON shape
 * consumed by renderers:
 * `{ "original": ..., "paragraphs": [{ "text": ..., "tokens": [...] }] }`.
 */

use serde::{Deserialize, Serialize};

/// Result of annotating one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// The raw input, unchanged
    pub original: String,

    /// Paragraphs in order of appearance
    pub paragraphs: Vec<Paragraph>,
}

impl AnnotatedDocument {
    /// Summary counts over the whole document.
    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            paragraphs: self.paragraphs.len(),
            ..DocumentStats::default()
        };

        for paragraph in &self.paragraphs {
            stats.tokens += paragraph.tokens.len();
            stats.idioms += paragraph.idiom_count();
            for token in &paragraph.tokens {
                if token.idiom_group.is_some() {
                    stats.idiom_tokens += 1;
                }
                if token.fallback {
                    stats.fallbacks += 1;
                }
            }
        }

        stats
    }
}

/// Summary counts of an annotated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub paragraphs: usize,
    pub tokens: usize,
    pub idiom_tokens: usize,
    pub idioms: usize,
    pub fallbacks: usize,
}

/// One annotated paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed paragraph text
    pub text: String,

    /// One token per character, in text order
    pub tokens: Vec<Token>,
}

impl Paragraph {
    /// Concatenation of the token texts; always equal to `text`.
    pub fn reconstructed_text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Number of idiom groups in the paragraph.
    pub fn idiom_count(&self) -> usize {
        self.tokens
            .iter()
            .filter_map(|t| t.idiom_group.as_ref())
            .filter(|g| g.offset == 0)
            .count()
    }

    /// Reassemble the idiom groups from the token sequence.
    pub fn idiom_groups(&self) -> Vec<IdiomGroupView<'_>> {
        let mut groups: Vec<IdiomGroupView<'_>> = Vec::new();

        for (index, token) in self.tokens.iter().enumerate() {
            let Some(group) = &token.idiom_group else {
                continue;
            };

            match groups.last_mut() {
                Some(view) if view.id == group.id => view.tokens.push(token),
                _ => groups.push(IdiomGroupView {
                    id: group.id,
                    idiom: &group.idiom,
                    start: index,
                    tokens: vec![token],
                }),
            }
        }

        groups
    }
}

/// Borrowed view of one reassembled idiom group.
#[derive(Debug, Clone, PartialEq)]
pub struct IdiomGroupView<'a> {
    pub id: usize,
    pub idiom: &'a str,
    /// Character index of the group's first token
    pub start: usize,
    pub tokens: Vec<&'a Token>,
}

/// The minimal annotated unit: one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// The character
    pub text: String,

    /// Pronunciation, or the placeholder when the lookup failed
    pub pinyin: String,

    /// Gloss, or the placeholder when the lookup failed
    pub translation: String,

    /// Idiom membership, if the character is part of an accepted idiom span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idiom_group: Option<IdiomGroup>,

    /// Whether the placeholder was substituted for a failed lookup
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl Token {
    /// Whether this token belongs to an idiom.
    pub fn is_idiom(&self) -> bool {
        self.idiom_group.is_some()
    }
}

/// Membership of a token in an idiom group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdiomGroup {
    /// Index of the accepted span within its paragraph
    pub id: usize,

    /// The complete idiom
    pub idiom: String,

    pub position: IdiomPosition,

    /// Character offset inside the idiom
    pub offset: usize,
}

/// Where a token sits inside its idiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdiomPosition {
    Single,
    First,
    Middle,
    Last,
}

impl IdiomPosition {
    /// Position of the character at `offset` in an idiom of `length` characters.
    pub fn at(offset: usize, length: usize) -> Self {
        if length <= 1 {
            Self::Single
        } else if offset == 0 {
            Self::First
        } else if offset + 1 == length {
            Self::Last
        } else {
            Self::Middle
        }
    }
}

/// An accepted idiom occurrence. Offsets are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdiomSpan {
    pub idiom: String,
    pub start: usize,
    pub length: usize,
}

impl IdiomSpan {
    /// One past the last character of the span.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Whether two spans share at least one character.
    pub fn overlaps(&self, other: &IdiomSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}
