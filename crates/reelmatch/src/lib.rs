//! # Reelmatch
//!
//! Free-text title in, similar titles out. Exact title hits are ranked by
//! embedding similarity, misses come back with fuzzy suggestions, and any
//! title can be decorated with cached external metadata.
//!
//! [`Reelmatch`] ties a shared [`Recommender`] to an [`EnrichmentClient`].
#![warn(missing_docs)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use reelmatch_core::{
    Artifacts, CatalogRecord, RecommendOutcome, Recommendation, Recommender, RecommenderConfig,
    ReelmatchError, Suggestion, DEFAULT_TOP_N,
};
pub use reelmatch_enrich::{
    CacheConfig, CacheStats, EnrichmentClient, EnrichmentRecord, MetadataProvider, TmdbConfig,
    TmdbProvider,
};

/// A recommendation together with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecommendation {
    /// The ranked catalog item; serialized inline.
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Display metadata. Fields are absent when the lookup found nothing.
    pub details: EnrichmentRecord,
}

/// [`RecommendOutcome`] with every result enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichedOutcome {
    /// The title resolved; results keep the similarity ranking.
    Found {
        /// Normalized query.
        query: String,
        /// Ranked recommendations with their metadata.
        results: Vec<EnrichedRecommendation>,
    },
    /// The title is unknown; nothing was enriched.
    NotFound {
        /// Normalized query.
        query: String,
        /// Suggested index keys, best first. May be empty.
        suggestions: Vec<String>,
    },
}

/// Recommendation and enrichment behind one handle.
pub struct Reelmatch<P> {
    recommender: Arc<Recommender>,
    enrichment: EnrichmentClient<P>,
}

impl<P: MetadataProvider> Reelmatch<P> {
    /// Combines a shared recommender with an enrichment client.
    pub fn new(recommender: Arc<Recommender>, enrichment: EnrichmentClient<P>) -> Self {
        Self {
            recommender,
            enrichment,
        }
    }

    /// The shared recommender.
    pub fn recommender(&self) -> &Arc<Recommender> {
        &self.recommender
    }

    /// The enrichment client.
    pub fn enrichment(&self) -> &EnrichmentClient<P> {
        &self.enrichment
    }

    /// Ranked similar titles, or suggestions when `title` is unknown.
    pub fn recommend(&self, title: &str, top_n: usize) -> RecommendOutcome {
        self.recommender.recommend(title, top_n)
    }

    /// Display metadata for `title`. Never fails.
    pub fn enrich(&self, title: &str) -> EnrichmentRecord {
        self.enrichment.lookup(title)
    }

    /// Like [`recommend`](Self::recommend), with each result enriched.
    ///
    /// Enrichment failures leave fields absent; they never change the ranking.
    pub fn recommend_enriched(&self, title: &str, top_n: usize) -> EnrichedOutcome {
        match self.recommend(title, top_n) {
            RecommendOutcome::Found { query, results } => EnrichedOutcome::Found {
                query,
                results: results
                    .into_iter()
                    .map(|recommendation| EnrichedRecommendation {
                        details: self.enrich(&recommendation.title),
                        recommendation,
                    })
                    .collect(),
            },
            RecommendOutcome::NotFound { query, suggestions } => {
                EnrichedOutcome::NotFound { query, suggestions }
            }
        }
    }
}
