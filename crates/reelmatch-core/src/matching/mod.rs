pub mod fuzzy;
pub mod sequence;

pub use fuzzy::{close_matches, FuzzyMatcher, MatchMetric, SuggestConfig};
pub use sequence::SequenceMatcher;
