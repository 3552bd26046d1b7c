use serde::{Deserialize, Serialize};

use super::catalog::CatalogRecord;

/// A row of the embedding table paired with its similarity to the query row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    /// Row position in the embedding table.
    pub row: usize,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub score: f64,
}

/// A ranked recommendation decorated with its catalog fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Row position in the embedding table.
    pub row: usize,
    /// Display title.
    pub title: String,
    /// Category tags of the recommended item.
    pub listed_in: Option<String>,
    /// Content rating of the recommended item.
    pub rating: Option<String>,
    /// Cosine similarity to the query item.
    pub score: f64,
}

impl Recommendation {
    /// Builds a recommendation from a scored row and its catalog record.
    #[must_use]
    pub fn from_record(scored: ScoredRow, record: &CatalogRecord) -> Self {
        Self {
            row: scored.row,
            title: record.title.clone(),
            listed_in: record.listed_in.clone(),
            rating: record.rating.clone(),
            score: scored.score,
        }
    }
}

/// A fuzzy-match candidate for an unresolved query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Normalized title key from the index.
    pub title: String,
    /// Match ratio in `[0.0, 1.0]`.
    pub score: f64,
}

/// Result of resolving a free-text title into recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendOutcome {
    /// The title resolved; results are ranked by descending similarity.
    Found {
        /// Normalized query.
        query: String,
        /// Ranked recommendations, never including the query item.
        results: Vec<Recommendation>,
    },
    /// The title is unknown; carries close orthographic matches instead.
    NotFound {
        /// Normalized query.
        query: String,
        /// Suggested index keys, best first. May be empty.
        suggestions: Vec<String>,
    },
}

impl RecommendOutcome {
    /// Returns `true` if the query resolved to a catalog item.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Returns the recommended titles, or an empty slice for `NotFound`.
    #[must_use]
    pub fn results(&self) -> &[Recommendation] {
        match self {
            Self::Found { results, .. } => results,
            Self::NotFound { .. } => &[],
        }
    }

    /// Returns the suggestions, or an empty slice for `Found`.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Found { .. } => &[],
            Self::NotFound { suggestions, .. } => suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_serializes_with_status_tag() {
        let outcome = RecommendOutcome::NotFound {
            query: "the godfater".into(),
            suggestions: vec!["the godfather".into()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["suggestions"][0], "the godfather");
    }

    #[test]
    fn accessors_match_variant() {
        let found = RecommendOutcome::Found {
            query: "a".into(),
            results: vec![Recommendation::from_record(
                ScoredRow { row: 2, score: 1.0 },
                &CatalogRecord::new("c"),
            )],
        };
        assert!(found.is_found());
        assert_eq!(found.results()[0].title, "c");
        assert!(found.suggestions().is_empty());

        let missing = RecommendOutcome::NotFound {
            query: "zzz".into(),
            suggestions: Vec::new(),
        };
        assert!(!missing.is_found());
        assert!(missing.results().is_empty());
    }
}
