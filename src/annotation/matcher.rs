/*!
 * Idiom matching with overlap resolution.
 *
 * Every occurrence of every catalog idiom is collected as a candidate. The
 * candidates are then accepted greedily, leftmost-longest:
 *
 * 1. lower start index first,
 * 2. then the longer idiom,
 * 3. then the idiom declared earlier in the catalog.
 *
 * A candidate is accepted only if it shares no character with an already
 * accepted span, so a character can never belong to two idioms. Offsets are
 * in characters, and nothing assumes idioms are four characters long.
 */

use std::cmp::Reverse;

use crate::annotation::catalog::IdiomCatalog;
use crate::annotation::document::IdiomSpan;

/// A possible idiom occurrence before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    start: usize,
    length: usize,
    /// Declaration index in the catalog
    rank: usize,
}

/// Find the accepted, non-overlapping idiom spans of a paragraph, sorted by start.
pub fn find_spans(text: &str, catalog: &IdiomCatalog) -> Vec<IdiomSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut candidates = collect_candidates(&chars, catalog);

    order_candidates(&mut candidates);

    let mut accepted: Vec<IdiomSpan> = Vec::new();
    // Candidates arrive sorted by start, so an overlap can only be with the
    // last accepted span.
    let mut next_free = 0;

    for candidate in candidates {
        if candidate.start < next_free {
            continue;
        }
        let entry = &catalog.entries()[candidate.rank];
        accepted.push(IdiomSpan {
            idiom: entry.idiom.clone(),
            start: candidate.start,
            length: candidate.length,
        });
        next_free = candidate.start + candidate.length;
    }

    accepted
}

/// Acceptance order: start, then longer first, then catalog declaration order.
fn order_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| (c.start, Reverse(c.length), c.rank));
}

/// Every occurrence of every catalog entry, overlapping ones included.
fn collect_candidates(chars: &[char], catalog: &IdiomCatalog) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (rank, entry) in catalog.entries().iter().enumerate() {
        let length = entry.chars.len();
        if length == 0 || length > chars.len() {
            continue;
        }

        for (start, window) in chars.windows(length).enumerate() {
            if window == entry.chars.as_slice() {
                candidates.push(Candidate { start, length, rank });
            }
        }
    }

    candidates
}
