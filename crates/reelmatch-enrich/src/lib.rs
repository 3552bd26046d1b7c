//! # Reelmatch Enrich
//!
//! Display metadata for recommended titles: poster, rating, runtime,
//! synopsis and cast, looked up through an external provider (TMDB by
//! default) with a movie-then-series fallback and an LRU cache in front.
//!
//! Lookups never fail. Anything that goes wrong upstream is logged and
//! surfaces as an [`EnrichmentRecord`] with absent fields.
//!
//! ```rust,no_run
//! use reelmatch_enrich::{CacheConfig, EnrichmentClient, TmdbConfig, TmdbProvider};
//!
//! let provider = TmdbProvider::new(TmdbConfig::from_env()).unwrap();
//! let client = EnrichmentClient::new(provider, CacheConfig::default());
//!
//! let record = client.lookup("The Irishman");
//! println!("{:?} {:?}", record.runtime, record.cast);
//! ```
pub mod client;
pub mod error;
pub mod provider;
pub mod record;

pub use client::{CacheConfig, CacheStats, EnrichmentClient, DEFAULT_CACHE_CAPACITY};
pub use error::{EnrichError, Result};
pub use provider::{Category, Detail, MetadataProvider, TmdbConfig, TmdbProvider};
pub use record::EnrichmentRecord;
