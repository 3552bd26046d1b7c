//! # Fuzzy Title Suggestions
//!
//! Fallback for titles that miss the exact index: scores every known key
//! against the query and keeps the best candidates above a cutoff.
//!
//! This is a linear scan over the corpus. It is fine for catalogs of a few
//! tens of thousands of titles; larger corpora need an indexed approximate
//! matcher instead.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::index::TitleIndex;
use crate::matching::sequence::SequenceMatcher;
use crate::types::Suggestion;

/// Default number of suggestions returned.
pub const DEFAULT_LIMIT: usize = 5;

/// Default minimum score for a suggestion.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// String similarity measure used to score candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMetric {
    /// Longest-matching-block ratio (Ratcliff/Obershelp).
    #[default]
    BlockRatio,
    /// Jaro-Winkler similarity.
    JaroWinkler,
    /// `1 - levenshtein / max_len`.
    NormalizedLevenshtein,
}

/// Configuration for fuzzy suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Maximum number of suggestions.
    pub limit: usize,
    /// Minimum score in `[0.0, 1.0]` a candidate must reach.
    pub cutoff: f64,
    /// Similarity measure.
    pub metric: MatchMetric,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            cutoff: DEFAULT_CUTOFF,
            metric: MatchMetric::default(),
        }
    }
}

impl SuggestConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of suggestions.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the minimum score, clamped to `[0.0, 1.0]`.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    /// Set the similarity measure.
    pub fn with_metric(mut self, metric: MatchMetric) -> Self {
        self.metric = metric;
        self
    }
}

/// Suggests close index keys for an unresolved query.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: SuggestConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: SuggestConfig) -> Self {
        Self { config }
    }

    /// Get the matcher configuration.
    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// Suggests up to `config.limit` keys from `index` for `key`.
    #[must_use]
    pub fn suggest(&self, index: &TitleIndex, key: &str) -> Vec<Suggestion> {
        self.suggest_with(index, key, self.config.limit, self.config.cutoff)
    }

    /// Like [`suggest`](Self::suggest) with an explicit limit and cutoff.
    #[must_use]
    pub fn suggest_with(
        &self,
        index: &TitleIndex,
        key: &str,
        limit: usize,
        cutoff: f64,
    ) -> Vec<Suggestion> {
        close_matches(key, index.keys(), limit, cutoff, self.config.metric)
    }
}

/// Returns up to `limit` candidates scoring at least `cutoff` against `key`,
/// best first. Equal scores keep the order of `candidates`.
///
/// # Examples
/// ```
/// use reelmatch_core::matching::{close_matches, MatchMetric};
///
/// let titles = ["the godfather", "the father", "goodfellas"];
/// let found = close_matches("the godfater", titles, 5, 0.6, MatchMetric::BlockRatio);
/// assert_eq!(found[0].title, "the godfather");
/// ```
pub fn close_matches<I, S>(
    key: &str,
    candidates: I,
    limit: usize,
    cutoff: f64,
    metric: MatchMetric,
) -> Vec<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if limit == 0 {
        return Vec::new();
    }
    let cutoff = cutoff.clamp(0.0, 1.0);

    let mut scored: Vec<Suggestion> = match metric {
        MatchMetric::BlockRatio => {
            let matcher = SequenceMatcher::new(key);
            candidates
                .into_iter()
                .filter_map(|candidate| {
                    let candidate = candidate.as_ref();
                    // Upper bounds first; most candidates fail these.
                    if matcher.real_quick_ratio(candidate) < cutoff
                        || matcher.quick_ratio(candidate) < cutoff
                    {
                        return None;
                    }
                    let score = matcher.ratio(candidate);
                    (score >= cutoff).then(|| Suggestion {
                        title: candidate.to_string(),
                        score,
                    })
                })
                .collect()
        }
        MatchMetric::JaroWinkler | MatchMetric::NormalizedLevenshtein => candidates
            .into_iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                let score = match metric {
                    MatchMetric::JaroWinkler => strsim::jaro_winkler(key, candidate),
                    _ => strsim::normalized_levenshtein(key, candidate),
                };
                (score >= cutoff).then(|| Suggestion {
                    title: candidate.to_string(),
                    score,
                })
            })
            .collect(),
    };

    // Stable: ties stay in corpus order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);

    trace!(query = key, matches = scored.len(), "fuzzy suggestions");
    scored
}
