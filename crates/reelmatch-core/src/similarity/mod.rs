pub mod cosine;
pub mod engine;
pub mod table;

pub use cosine::{cosine_similarity, cosine_similarity_with_norms, l2_norm};
pub use engine::{EngineConfig, SimilarityEngine};
pub use table::EmbeddingTable;
