//! Word and character statistics
//!
//! Char counts are raw. Word counts first strip fenced code regions
//! (non-greedy triple-backtick pairs, which may span lines) and then count
//! maximal non-whitespace runs; code samples do not inflate the word
//! count of prose.

use std::sync::LazyLock;

use regex::Regex;
use ropey::Rope;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("fenced code pattern is valid"));

/// Derived document statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Non-whitespace runs outside fenced code regions
    pub word_count: usize,
    /// Raw char length, fenced code included
    pub char_count: usize,
}

impl TextStats {
    /// Compute statistics for the given text.
    pub fn of(text: &str) -> Self {
        let prose = FENCED_CODE.replace_all(text, "");
        Self {
            word_count: prose.split_whitespace().count(),
            char_count: text.chars().count(),
        }
    }
}

/// Memoizes [`TextStats`] on the session's content version.
///
/// Same version-counter change detection the rest of the engine uses: the
/// session bumps its version on every text mutation, so an unchanged
/// version means the cached value is still valid.
#[derive(Clone, Debug, Default)]
pub struct StatsCache {
    cached: Option<(u64, TextStats)>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stats for `text`, recomputing only when `version` moved.
    pub fn get(&mut self, text: &Rope, version: u64) -> TextStats {
        if let Some((cached_version, stats)) = self.cached {
            if cached_version == version {
                return stats;
            }
        }
        let stats = TextStats::of(&text.to_string());
        self.cached = Some((version, stats));
        stats
    }
}
