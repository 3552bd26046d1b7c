pub mod catalog;
pub mod outcome;

pub use catalog::CatalogRecord;
pub use outcome::{RecommendOutcome, Recommendation, ScoredRow, Suggestion};
