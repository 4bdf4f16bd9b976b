/*!
 * Paragraph segmentation.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Any run of line breaks; `\r` is included so CRLF input splits like LF.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Split raw text into trimmed, non-empty paragraphs in order of appearance.
///
/// Interior whitespace of a paragraph is kept as is.
pub fn segment(raw: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(raw)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
