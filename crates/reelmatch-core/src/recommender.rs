//! # Recommender
//!
//! The single initialization point for query-time state. A `Recommender`
//! owns the catalog, the title index and the similarity engine, is built
//! once at startup and is then shared read-only (typically behind an `Arc`).

use std::path::Path;

use tracing::debug;

use crate::artifacts::Artifacts;
use crate::error::{ReelmatchError, Result};
use crate::index::{normalize, TitleIndex};
use crate::matching::{FuzzyMatcher, SuggestConfig};
use crate::similarity::{EmbeddingTable, EngineConfig, SimilarityEngine};
use crate::types::{CatalogRecord, RecommendOutcome, Recommendation, Suggestion};

/// Number of recommendations returned when the caller has no preference.
pub const DEFAULT_TOP_N: usize = 12;

/// Configuration for the recommender.
#[derive(Debug, Clone, Default)]
pub struct RecommenderConfig {
    /// Similarity engine settings.
    pub engine: EngineConfig,
    /// Fuzzy suggestion settings for unresolved titles.
    pub suggest: SuggestConfig,
}

impl RecommenderConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity engine settings.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set the fuzzy suggestion settings.
    pub fn with_suggest(mut self, suggest: SuggestConfig) -> Self {
        self.suggest = suggest;
        self
    }
}

/// Immutable recommendation context.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Vec<CatalogRecord>,
    index: TitleIndex,
    engine: SimilarityEngine,
    matcher: FuzzyMatcher,
}

impl Recommender {
    /// Builds a recommender from a loaded artifact bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the embeddings are ragged, the catalog is not
    /// aligned with them, or an explicit title map is invalid.
    pub fn new(artifacts: Artifacts, config: RecommenderConfig) -> Result<Self> {
        let Artifacts {
            catalog,
            embeddings,
            title_to_index,
        } = artifacts;

        let table = EmbeddingTable::from_rows(embeddings)?;
        let index = match title_to_index {
            Some(map) => TitleIndex::from_entries(map, table.len())?,
            None => TitleIndex::from_titles(catalog.iter().map(|r| r.title.as_str())),
        };

        Self::from_parts(catalog, table, index, config)
    }

    /// Loads the artifact bundle at `path` and builds a recommender from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be read or fails validation.
    pub fn load(path: impl AsRef<Path>, config: RecommenderConfig) -> Result<Self> {
        Self::new(Artifacts::load(path)?, config)
    }

    /// Assembles a recommender from prebuilt parts, validating that they agree.
    ///
    /// # Errors
    ///
    /// Returns `ReelmatchError::MisalignedCatalog` if `catalog` and `table`
    /// differ in length, and `ReelmatchError::RowOutOfBounds` if `index`
    /// points outside the table.
    pub fn from_parts(
        catalog: Vec<CatalogRecord>,
        table: EmbeddingTable,
        index: TitleIndex,
        config: RecommenderConfig,
    ) -> Result<Self> {
        if catalog.len() != table.len() {
            return Err(ReelmatchError::MisalignedCatalog {
                records: catalog.len(),
                embeddings: table.len(),
            });
        }
        if let Some((title, row)) = index.iter().find(|&(_, row)| row >= table.len()) {
            return Err(ReelmatchError::RowOutOfBounds {
                title: title.to_string(),
                row,
                rows: table.len(),
            });
        }

        Ok(Self {
            catalog,
            index,
            engine: SimilarityEngine::new(table, config.engine),
            matcher: FuzzyMatcher::new(config.suggest),
        })
    }

    /// Resolves a raw title to its row.
    #[must_use]
    pub fn resolve(&self, title: &str) -> Option<usize> {
        self.index.lookup(title)
    }

    /// Ranks catalog items similar to `title`.
    ///
    /// Unknown titles produce [`RecommendOutcome::NotFound`] carrying fuzzy
    /// suggestions rather than an error.
    ///
    /// # Examples
    /// ```
    /// use reelmatch_core::{Artifacts, CatalogRecord, Recommender, RecommenderConfig};
    ///
    /// let artifacts = Artifacts {
    ///     catalog: ["a", "b", "c", "d"].into_iter().map(CatalogRecord::new).collect(),
    ///     embeddings: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]],
    ///     title_to_index: None,
    /// };
    /// let recommender = Recommender::new(artifacts, RecommenderConfig::default()).unwrap();
    ///
    /// let outcome = recommender.recommend("A", 2);
    /// let titles: Vec<&str> = outcome.results().iter().map(|r| r.title.as_str()).collect();
    /// assert_eq!(titles, vec!["c", "d"]);
    /// ```
    #[must_use]
    pub fn recommend(&self, title: &str, top_n: usize) -> RecommendOutcome {
        let query = normalize(title);

        let Some(row) = self.index.resolve(&query) else {
            let suggestions = self
                .matcher
                .suggest(&self.index, &query)
                .into_iter()
                .map(|s| s.title)
                .collect::<Vec<_>>();
            debug!(query = %query, suggestions = suggestions.len(), "title not found");
            return RecommendOutcome::NotFound { query, suggestions };
        };

        let results = self
            .engine
            .recommend(row, top_n)
            .into_iter()
            .map(|scored| Recommendation::from_record(scored, &self.catalog[scored.row]))
            .collect();

        RecommendOutcome::Found { query, results }
    }

    /// Fuzzy suggestions for `title` using the configured limit and cutoff.
    #[must_use]
    pub fn suggest(&self, title: &str) -> Vec<Suggestion> {
        self.matcher.suggest(&self.index, &normalize(title))
    }

    /// Fuzzy suggestions with an explicit limit and cutoff.
    #[must_use]
    pub fn suggest_with(&self, title: &str, limit: usize, cutoff: f64) -> Vec<Suggestion> {
        self.matcher
            .suggest_with(&self.index, &normalize(title), limit, cutoff)
    }

    /// Catalog record at `row`, if in bounds.
    #[must_use]
    pub fn record(&self, row: usize) -> Option<&CatalogRecord> {
        self.catalog.get(row)
    }

    /// All catalog records in row order.
    #[must_use]
    pub fn catalog(&self) -> &[CatalogRecord] {
        &self.catalog
    }

    /// The title index.
    #[must_use]
    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    /// The similarity engine.
    #[must_use]
    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Number of catalog items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
