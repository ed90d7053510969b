//! Case-insensitive substring filtering of the candidate list.
//!
//! The filter keeps the candidates whose lowercase form contains the lowercase query, in their
//! original order. There is no ranking and no de-duplication: the first `max` matches are what
//! the suggestion list renders.

use std::fmt::{Display, Error, Formatter};

/// Matches candidates against a query by lowercase substring containment
#[derive(Debug, Clone, Default)]
pub struct SubstringFilter {
    query: String,
    lowered: String,
}

impl SubstringFilter {
    /// Creates a filter for the given query
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            lowered: query.to_lowercase(),
        }
    }

    /// The raw query this filter was built from
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether `text` contains the query, ignoring case
    ///
    /// The empty query matches every text.
    pub fn matches(&self, text: &str) -> bool {
        self.lowered.is_empty() || text.to_lowercase().contains(&self.lowered)
    }

    /// Byte range of the first match in the original `text`, for highlighting
    ///
    /// Returns `None` on an empty query, on no match, and when lowercasing changes the number of
    /// chars in `text` (the lowered offsets would not map back onto the original).
    pub fn match_range(&self, text: &str) -> Option<(usize, usize)> {
        if self.lowered.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        if lowered.chars().count() != text.chars().count() {
            return None;
        }
        let start = lowered.find(&self.lowered)?;
        let start_char = lowered[..start].chars().count();
        let len_chars = self.lowered.chars().count();

        let byte_at = |char_idx: usize| {
            text.char_indices()
                .nth(char_idx)
                .map(|(b, _)| b)
                .unwrap_or(text.len())
        };
        Some((byte_at(start_char), byte_at(start_char + len_chars)))
    }

    /// Filters `candidates`, preserving their relative order
    pub fn apply(&self, candidates: &[String]) -> Vec<String> {
        candidates.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

impl Display for SubstringFilter {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "(Substring|{})", self.lowered)
    }
}

/// Returns the candidates containing `query`, ignoring case, in their original order
///
/// An empty query returns every candidate.
pub fn filter_candidates(candidates: &[String], query: &str) -> Vec<String> {
    SubstringFilter::new(query).apply(candidates)
}

/// The rows that actually get rendered: the first `max` entries of the filtered list
pub fn visible_rows(filtered: &[String], max: usize) -> &[String] {
    &filtered[..filtered.len().min(max)]
}
