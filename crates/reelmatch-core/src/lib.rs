//! # Reelmatch Core
//!
//! Title resolution and similarity ranking over a static catalog of
//! precomputed embeddings. Exact title hits are ranked by brute-force cosine
//! similarity; misses fall back to fuzzy title suggestions.
//!
//! ## Quick Start
//!
//! ```rust
//! use reelmatch_core::{Artifacts, CatalogRecord, RecommendOutcome, Recommender, RecommenderConfig};
//!
//! let artifacts = Artifacts {
//!     catalog: vec![
//!         CatalogRecord::new("The Godfather"),
//!         CatalogRecord::new("Paddington"),
//!         CatalogRecord::new("Goodfellas"),
//!     ],
//!     embeddings: vec![vec![1.0, 0.1], vec![0.0, 1.0], vec![0.9, 0.2]],
//!     title_to_index: None,
//! };
//! let recommender = Recommender::new(artifacts, RecommenderConfig::default()).unwrap();
//!
//! let outcome = recommender.recommend("The Godfather", 1);
//! assert_eq!(outcome.results()[0].title, "Goodfellas");
//!
//! let outcome = recommender.recommend("the godfater", 1);
//! assert!(matches!(outcome, RecommendOutcome::NotFound { .. }));
//! assert_eq!(outcome.suggestions()[0], "the godfather");
//! ```
pub mod artifacts;
pub mod error;
pub mod index;
pub mod matching;
pub mod recommender;
pub mod similarity;
pub mod types;

// Re-export primary API
pub use artifacts::Artifacts;
pub use error::{ReelmatchError, Result};
pub use index::{normalize, TitleIndex};
pub use matching::{close_matches, FuzzyMatcher, MatchMetric, SequenceMatcher, SuggestConfig};
pub use recommender::{Recommender, RecommenderConfig, DEFAULT_TOP_N};
pub use similarity::{cosine_similarity, EmbeddingTable, EngineConfig, SimilarityEngine};
pub use types::{CatalogRecord, RecommendOutcome, Recommendation, ScoredRow, Suggestion};
